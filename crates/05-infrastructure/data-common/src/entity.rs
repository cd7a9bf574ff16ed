//! 实体 trait 定义
//!
//! 通常由 `#[derive(Entity)]` 生成实现，也可以手写。

use crate::errors::ExtractionError;
use crate::key::KeyValue;
use crate::metadata::{DeclaredField, EntityTypeInfo};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt::Debug;

/// 实体 trait
///
/// 所有可被扫描的实体类型必须实现此 trait
pub trait Entity: Any + Clone + Send + Sync + Debug {
    /// 获取实体类型信息
    fn type_info() -> EntityTypeInfo {
        EntityTypeInfo::of::<Self>()
    }

    /// 获取声明的字段列表
    fn declared_fields() -> Vec<DeclaredField>;
}

/// 标识生成策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdGenerator {
    /// 按实体表递增的整数序列
    Sequence,
    /// 随机 UUID
    Uuid,
    /// 由调用方赋值
    #[default]
    Assigned,
}

/// 可持久化实体 trait
///
/// 定义实体在存储中的标识映射
pub trait Persistable: Entity + Serialize + DeserializeOwned {
    /// 读取存储标识，未赋值时返回 `None`
    fn identity(&self) -> Option<KeyValue>;

    /// 回写存储生成的标识
    fn assign_identity(&mut self, key: KeyValue) -> Result<(), ExtractionError>;

    /// 标识字段名称
    fn identity_field() -> &'static str;

    /// 标识生成策略
    fn id_generator() -> IdGenerator {
        IdGenerator::Assigned
    }
}

/// 以约定整数 `id` 为标识的实体
pub trait IdBasedEntity: Persistable {
    /// 读取整数标识
    fn id(&self) -> Option<i64> {
        self.identity().and_then(|key| key.as_i64())
    }
}
