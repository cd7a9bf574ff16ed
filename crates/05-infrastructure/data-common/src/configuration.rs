//! 扫描配置

use serde::{Deserialize, Serialize};

/// 重复主键处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateKeyPolicy {
    /// 立即返回配置错误
    FailFast,
    /// 记录警告并注册名称最小的字段
    #[default]
    Lenient,
}

/// 元数据扫描配置
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// 重复主键处理策略
    pub policy: DuplicateKeyPolicy,
    /// 待扫描的命名空间
    pub namespaces: Vec<String>,
}

impl ScannerConfig {
    /// 创建默认配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 重复主键立即失败的配置
    pub fn fail_fast() -> Self {
        Self::new().with_policy(DuplicateKeyPolicy::FailFast)
    }

    /// 重复主键仅告警的配置
    pub fn lenient() -> Self {
        Self::new().with_policy(DuplicateKeyPolicy::Lenient)
    }

    /// 设置重复主键策略
    pub fn with_policy(mut self, policy: DuplicateKeyPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// 添加命名空间
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespaces.push(namespace.into());
        self
    }

    /// 是否为立即失败策略
    pub fn is_fail_fast(&self) -> bool {
        self.policy == DuplicateKeyPolicy::FailFast
    }
}
