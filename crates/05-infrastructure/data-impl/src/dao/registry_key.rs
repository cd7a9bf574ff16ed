//! 由元数据注册表解析主键的 DAO

use super::generic::GenericDao;
use data_abstractions::{DaoCapabilities, IdentityResolver, KeyStrategy, PersistentStore};
use data_common::{
    ConfigurationError, DaoResult, FieldDescriptor, KeyValue, MetadataContext, Persistable,
};
use std::sync::Arc;
use tracing::error;

/// 注册表主键解析器
///
/// 实体类型未在注册表中注册，或注册的主键字段不是实体的存储标识时，
/// 依赖主键的操作返回配置错误。
#[derive(Debug, Clone)]
pub struct RegistryKeyResolver {
    context: Arc<MetadataContext>,
}

impl RegistryKeyResolver {
    /// 创建注册表主键解析器
    pub fn new(context: Arc<MetadataContext>) -> Self {
        Self { context }
    }

    /// 元数据注册表
    pub fn context(&self) -> &Arc<MetadataContext> {
        &self.context
    }
}

impl RegistryKeyResolver {
    /// 查找 `T` 注册的主键字段，并校验它就是实体的存储标识
    fn descriptor<T: Persistable>(&self) -> DaoResult<&FieldDescriptor> {
        let type_name = T::type_info().name;
        let descriptor = self
            .context
            .field_for::<T>()
            .ok_or_else(|| ConfigurationError::unregistered(type_name))?;

        if descriptor.name() != T::identity_field() {
            error!(
                "注册的主键字段与存储标识字段不一致: {}, 主键: {}, 标识: {}",
                type_name,
                descriptor.name(),
                T::identity_field()
            );
            return Err(ConfigurationError::KeyIdentityMismatch {
                type_name: type_name.to_string(),
                key_field: descriptor.name().to_string(),
                identity_field: T::identity_field().to_string(),
            }
            .into());
        }
        Ok(descriptor)
    }
}

impl<T: Persistable> IdentityResolver<T> for RegistryKeyResolver {
    fn strategy(&self) -> KeyStrategy {
        KeyStrategy::Registry
    }

    fn key_of(&self, entity: &T) -> DaoResult<Option<KeyValue>> {
        Ok(self.descriptor::<T>()?.extract(entity)?)
    }

    fn key_field(&self) -> DaoResult<&'static str> {
        Ok(self.descriptor::<T>()?.name())
    }
}

/// 注册表主键 DAO
pub type RegistryKeyDao<T, S> = GenericDao<T, S, RegistryKeyResolver>;

impl<T, S> GenericDao<T, S, RegistryKeyResolver>
where
    T: Persistable,
    S: PersistentStore,
{
    /// 创建注册表主键 DAO
    pub fn new(store: Arc<S>, context: Arc<MetadataContext>) -> Self {
        Self::with_resolver(store, RegistryKeyResolver::new(context))
    }

    /// 元数据注册表
    pub fn context(&self) -> &Arc<MetadataContext> {
        <Self as DaoCapabilities<T>>::resolver(self).context()
    }
}
