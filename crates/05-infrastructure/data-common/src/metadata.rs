//! 元数据定义
//!
//! 提供实体类型与主键字段的元数据信息

use crate::errors::ExtractionError;
use crate::key::KeyValue;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// 实体类型信息
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityTypeInfo {
    /// 类型ID
    pub id: TypeId,
    /// 完整类型名称
    pub name: &'static str,
    /// 命名空间，默认为类型所在模块路径
    pub namespace: &'static str,
}

impl EntityTypeInfo {
    /// 从类型获取类型信息
    pub fn of<T: 'static>() -> Self {
        let name = std::any::type_name::<T>();
        let namespace = name.rsplit_once("::").map(|(ns, _)| ns).unwrap_or("");
        Self {
            id: TypeId::of::<T>(),
            name,
            namespace,
        }
    }

    /// 覆盖命名空间
    pub fn with_namespace(mut self, namespace: &'static str) -> Self {
        self.namespace = namespace;
        self
    }

    /// 获取简短的类型名称（不包含模块路径）
    pub fn short_name(&self) -> &'static str {
        self.name.rsplit("::").next().unwrap_or(self.name)
    }

    /// 类型是否属于指定命名空间
    ///
    /// 空命名空间为根，匹配所有类型；否则要求命名空间相等，
    /// 或以 `::` 分隔的子命名空间。
    pub fn belongs_to(&self, namespace: &str) -> bool {
        namespace.is_empty()
            || self.namespace == namespace
            || self
                .namespace
                .strip_prefix(namespace)
                .is_some_and(|rest| rest.starts_with("::"))
    }
}

impl fmt::Display for EntityTypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

type ExtractFn = dyn Fn(&dyn Any) -> Result<Option<KeyValue>, ExtractionError> + Send + Sync;

/// 字段取值器
///
/// 编译期为主键字段生成的取值函数，替代运行时反射。
#[derive(Clone)]
pub struct FieldAccessor {
    field: &'static str,
    extract: Arc<ExtractFn>,
}

impl FieldAccessor {
    /// 为实体类型 `T` 的字段创建取值器
    pub fn new<T, F>(field: &'static str, getter: F) -> Self
    where
        T: Any,
        F: Fn(&T) -> Option<KeyValue> + Send + Sync + 'static,
    {
        let expected = std::any::type_name::<T>();
        let extract = move |entity: &dyn Any| {
            entity
                .downcast_ref::<T>()
                .map(|entity| getter(entity).map(KeyValue::canonical))
                .ok_or_else(|| ExtractionError::TypeMismatch {
                    expected,
                    field: field.to_string(),
                })
        };
        Self {
            field,
            extract: Arc::new(extract),
        }
    }

    /// 字段名称
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// 读取字段值
    pub fn extract(&self, entity: &dyn Any) -> Result<Option<KeyValue>, ExtractionError> {
        (self.extract)(entity)
    }
}

impl fmt::Debug for FieldAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldAccessor")
            .field("field", &self.field)
            .field("extract", &"<function>")
            .finish()
    }
}

/// 实体声明的字段
#[derive(Debug, Clone)]
pub struct DeclaredField {
    /// 字段名称
    pub name: &'static str,
    /// 字段类型名称
    pub value_type: &'static str,
    /// 是否标记为主键
    pub primary_key: bool,
    /// 取值器，主键字段必须提供
    pub accessor: Option<FieldAccessor>,
}

impl DeclaredField {
    /// 创建普通字段
    pub fn new(name: &'static str, value_type: &'static str) -> Self {
        Self {
            name,
            value_type,
            primary_key: false,
            accessor: None,
        }
    }

    /// 标记为主键
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// 设置取值器
    pub fn with_accessor(mut self, accessor: FieldAccessor) -> Self {
        self.accessor = Some(accessor);
        self
    }
}

/// 字段描述符
///
/// 注册表中保存的主键字段，创建后不可变。
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    owner: EntityTypeInfo,
    name: &'static str,
    value_type: &'static str,
    accessor: FieldAccessor,
}

impl FieldDescriptor {
    /// 创建字段描述符
    pub fn new(
        owner: EntityTypeInfo,
        name: &'static str,
        value_type: &'static str,
        accessor: FieldAccessor,
    ) -> Self {
        Self {
            owner,
            name,
            value_type,
            accessor,
        }
    }

    /// 从声明字段创建，缺少取值器时返回 `None`
    pub fn from_declared(owner: EntityTypeInfo, field: &DeclaredField) -> Option<Self> {
        field
            .accessor
            .clone()
            .map(|accessor| Self::new(owner, field.name, field.value_type, accessor))
    }

    /// 所属实体类型
    pub fn owner(&self) -> &EntityTypeInfo {
        &self.owner
    }

    /// 字段名称
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 字段类型名称
    pub fn value_type(&self) -> &'static str {
        self.value_type
    }

    /// 读取实体的主键值
    pub fn extract(&self, entity: &dyn Any) -> Result<Option<KeyValue>, ExtractionError> {
        self.accessor.extract(entity)
    }
}
