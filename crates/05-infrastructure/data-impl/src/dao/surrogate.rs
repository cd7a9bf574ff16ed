//! 约定代理主键的 DAO

use super::generic::GenericDao;
use data_abstractions::{IdBasedDao, IdentityResolver, KeyStrategy, PersistentStore};
use data_common::{DaoResult, IdBasedEntity, KeyValue};
use std::sync::Arc;

/// 代理主键解析器
///
/// 主键即实体的存储标识字段，不依赖元数据注册表。
#[derive(Debug, Clone, Copy, Default)]
pub struct SurrogateKeyResolver;

impl<T: IdBasedEntity> IdentityResolver<T> for SurrogateKeyResolver {
    fn strategy(&self) -> KeyStrategy {
        KeyStrategy::Surrogate
    }

    fn key_of(&self, entity: &T) -> DaoResult<Option<KeyValue>> {
        Ok(entity.identity().map(KeyValue::canonical))
    }

    fn key_field(&self) -> DaoResult<&'static str> {
        Ok(T::identity_field())
    }
}

/// 代理主键 DAO
pub type SurrogateKeyDao<T, S> = GenericDao<T, S, SurrogateKeyResolver>;

impl<T, S> GenericDao<T, S, SurrogateKeyResolver>
where
    T: IdBasedEntity,
    S: PersistentStore,
{
    /// 创建代理主键 DAO
    pub fn new(store: Arc<S>) -> Self {
        Self::with_resolver(store, SurrogateKeyResolver)
    }
}

impl<T, S> IdBasedDao<T> for GenericDao<T, S, SurrogateKeyResolver>
where
    T: IdBasedEntity,
    S: PersistentStore,
{
}
