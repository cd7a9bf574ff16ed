//! 元数据扫描器抽象接口

use data_common::{ConfigurationResult, MetadataContext};

/// 实体元数据扫描器 trait
///
/// 启动时运行一次，扫描结果为只读的元数据注册表。
pub trait EntityScanner: Send + Sync {
    /// 扫描命名空间并构建注册表
    fn scan(&self, namespaces: &[&str]) -> ConfigurationResult<MetadataContext>;

    /// 获取扫描器名称
    fn name(&self) -> &str;
}
