//! 主键解析策略

use data_common::{DaoResult, KeyValue, Persistable};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 主键解析方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyStrategy {
    /// 约定的代理主键字段
    Surrogate,
    /// 由元数据注册表决定的主键字段
    Registry,
}

impl fmt::Display for KeyStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyStrategy::Surrogate => write!(f, "surrogate"),
            KeyStrategy::Registry => write!(f, "registry"),
        }
    }
}

/// 主键解析器 trait
///
/// DAO 在构造时选定解析器，之后所有依赖主键的操作都经由它完成。
pub trait IdentityResolver<T: Persistable>: Send + Sync {
    /// 解析方式
    fn strategy(&self) -> KeyStrategy;

    /// 读取实体的主键值，未赋值时返回 `None`
    fn key_of(&self, entity: &T) -> DaoResult<Option<KeyValue>>;

    /// 主键字段名称
    fn key_field(&self) -> DaoResult<&'static str>;
}
