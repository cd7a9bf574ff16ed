//! 实体发现机制
//!
//! 替代运行时类路径扫描：实体类型在启动时显式登记到 [`EntityCatalog`]，
//! 扫描器再按命名空间向发现服务查询。

use crate::entity::Entity;
use crate::metadata::{DeclaredField, EntityTypeInfo};
use parking_lot::RwLock;
use std::any::TypeId;
use std::collections::HashMap;
use tracing::debug;

/// 实体发现服务 trait
pub trait EntityDiscovery: Send + Sync {
    /// 发现服务名称
    fn name(&self) -> &str;

    /// 列出命名空间下的实体类型
    fn list_types(&self, namespace: &str) -> Vec<EntityTypeInfo>;

    /// 获取实体类型声明的字段
    fn declared_fields(&self, type_info: &EntityTypeInfo) -> Vec<DeclaredField>;
}

#[derive(Debug, Clone)]
struct CatalogEntry {
    type_info: EntityTypeInfo,
    fields: fn() -> Vec<DeclaredField>,
}

/// 实体目录
///
/// 按类型保存实体的登记信息，重复登记同一类型会覆盖旧记录。
#[derive(Debug, Default)]
pub struct EntityCatalog {
    entries: RwLock<HashMap<TypeId, CatalogEntry>>,
}

impl EntityCatalog {
    /// 创建空目录
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记实体类型，返回是否为首次登记
    pub fn register<T: Entity>(&self) -> bool {
        self.register_with(T::type_info(), T::declared_fields)
    }

    /// 以显式的类型信息和字段列表登记
    pub fn register_with(
        &self,
        type_info: EntityTypeInfo,
        fields: fn() -> Vec<DeclaredField>,
    ) -> bool {
        debug!("登记实体类型: {} (命名空间: {})", type_info.name, type_info.namespace);
        self.entries
            .write()
            .insert(type_info.id, CatalogEntry { type_info, fields })
            .is_none()
    }

    /// 是否已登记指定类型
    pub fn contains<T: 'static>(&self) -> bool {
        self.entries.read().contains_key(&TypeId::of::<T>())
    }

    /// 已登记的类型数量
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// 目录是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// 所有已登记类型，按类型名称排序
    pub fn registered_types(&self) -> Vec<EntityTypeInfo> {
        let mut types: Vec<_> = self
            .entries
            .read()
            .values()
            .map(|entry| entry.type_info)
            .collect();
        types.sort_by_key(|info| info.name);
        types
    }
}

impl EntityDiscovery for EntityCatalog {
    fn name(&self) -> &str {
        "EntityCatalog"
    }

    fn list_types(&self, namespace: &str) -> Vec<EntityTypeInfo> {
        let mut types: Vec<_> = self
            .entries
            .read()
            .values()
            .filter(|entry| entry.type_info.belongs_to(namespace))
            .map(|entry| entry.type_info)
            .collect();
        types.sort_by_key(|info| info.name);
        types
    }

    fn declared_fields(&self, type_info: &EntityTypeInfo) -> Vec<DeclaredField> {
        // 先取出函数指针再调用，避免持锁执行用户代码
        let fields = self
            .entries
            .read()
            .get(&type_info.id)
            .map(|entry| entry.fields);
        fields.map(|fields| fields()).unwrap_or_default()
    }
}
