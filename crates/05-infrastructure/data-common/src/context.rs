//! 元数据注册表
//!
//! [`MetadataContext`] 由扫描器一次性构建，保存实体类型到主键字段的映射。
//! 构建后只读，可通过 `Arc<MetadataContext>` 在线程间无锁共享。

use crate::errors::ExtractionError;
use crate::key::{FromKeyValue, KeyValue};
use crate::metadata::{EntityTypeInfo, FieldDescriptor};
use std::any::{Any, TypeId};
use std::collections::HashMap;

/// 元数据注册表
#[derive(Debug, Clone, Default)]
pub struct MetadataContext {
    fields: HashMap<TypeId, FieldDescriptor>,
}

impl MetadataContext {
    /// 创建空注册表
    pub fn empty() -> Self {
        Self::default()
    }

    /// 从字段描述符构建注册表，同一类型以最后一个为准
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = FieldDescriptor>) -> Self {
        let fields = descriptors
            .into_iter()
            .map(|descriptor| (descriptor.owner().id, descriptor))
            .collect();
        Self { fields }
    }

    /// 获取实体类型的主键字段
    pub fn field_for<T: 'static>(&self) -> Option<&FieldDescriptor> {
        self.fields.get(&TypeId::of::<T>())
    }

    /// 按类型信息获取主键字段
    pub fn field_for_type(&self, type_info: &EntityTypeInfo) -> Option<&FieldDescriptor> {
        self.fields.get(&type_info.id)
    }

    /// 读取实体的主键值
    ///
    /// 类型未注册或主键尚未赋值时返回 `Ok(None)`。
    pub fn value_of<T: Any>(&self, entity: &T) -> Result<Option<KeyValue>, ExtractionError> {
        match self.field_for::<T>() {
            Some(descriptor) => descriptor.extract(entity),
            None => Ok(None),
        }
    }

    /// 读取实体的主键值并转换为调用方期望的类型
    pub fn value_of_as<K: FromKeyValue, T: Any>(
        &self,
        entity: &T,
    ) -> Result<Option<K>, ExtractionError> {
        self.value_of(entity)?.map(K::from_key_value).transpose()
    }

    /// 已注册的类型数量
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// 注册表是否为空
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// 类型是否已注册
    pub fn is_registered<T: 'static>(&self) -> bool {
        self.fields.contains_key(&TypeId::of::<T>())
    }

    /// 已注册的实体类型，按类型名称排序
    pub fn entity_types(&self) -> Vec<EntityTypeInfo> {
        let mut types: Vec<_> = self.fields.values().map(|d| *d.owner()).collect();
        types.sort_by_key(|info| info.name);
        types
    }

    /// 所有字段描述符
    pub fn descriptors(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.values()
    }
}
