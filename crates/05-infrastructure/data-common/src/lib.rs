//! # Data Common
//!
//! 这个 crate 提供了 Lorn ADSP 平台数据访问层的公共类型。
//!
//! ## 核心组件
//!
//! - [`KeyValue`] - 主键值的统一表示
//! - [`Entity`] / [`Persistable`] / [`IdBasedEntity`] - 实体 traits
//! - [`EntityCatalog`] - 实体发现目录
//! - [`MetadataContext`] - 主键元数据注册表
//! - [`ScannerConfig`] - 扫描配置
//!
//! ## 设计原则
//!
//! - 主键取值器在编译期生成，不依赖运行时反射
//! - 注册表构建后只读，可在线程间共享
//! - 错误按来源分类，存储错误原样透传

pub mod configuration;
pub mod context;
pub mod discovery;
pub mod entity;
pub mod errors;
pub mod key;
pub mod metadata;

pub use configuration::*;
pub use context::*;
pub use discovery::*;
pub use entity::*;
pub use errors::*;
pub use key::*;
pub use metadata::*;

use std::sync::Arc;

/// 全局实体目录
static GLOBAL_ENTITY_CATALOG: once_cell::sync::Lazy<Arc<EntityCatalog>> =
    once_cell::sync::Lazy::new(|| Arc::new(EntityCatalog::new()));

/// 获取全局实体目录
///
/// `#[derive(Entity)]` 生成的启动钩子会把实体登记到这里。
pub fn global_entity_catalog() -> Arc<EntityCatalog> {
    GLOBAL_ENTITY_CATALOG.clone()
}
