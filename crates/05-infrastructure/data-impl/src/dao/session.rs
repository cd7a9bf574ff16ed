//! 暴露原生会话的 DAO

use super::registry_key::RegistryKeyDao;
use data_abstractions::{Dao, NativeSessionProvider, PersistentStore, PrimaryKeyBasedDao};
use data_common::{DaoResult, KeyValue, MetadataContext, Persistable};
use std::sync::Arc;

/// 会话 DAO
///
/// 在注册表主键 DAO 之上暴露存储的原生会话句柄。
pub struct SessionDao<T, S> {
    inner: RegistryKeyDao<T, S>,
}

impl<T, S> SessionDao<T, S>
where
    T: Persistable,
    S: PersistentStore + NativeSessionProvider,
{
    /// 创建会话 DAO
    pub fn new(store: Arc<S>, context: Arc<MetadataContext>) -> Self {
        Self {
            inner: RegistryKeyDao::new(store, context),
        }
    }

    /// 获取原生会话
    pub fn session(&self) -> DaoResult<S::Session> {
        Ok(self.inner.store_handle().unwrap_native_session()?)
    }

    /// 内部的注册表主键 DAO
    pub fn dao(&self) -> &RegistryKeyDao<T, S> {
        &self.inner
    }
}

impl<T, S> Dao<T> for SessionDao<T, S>
where
    T: Persistable,
    S: PersistentStore + NativeSessionProvider,
{
    fn count_total(&self) -> DaoResult<u64> {
        self.inner.count_total()
    }

    fn find_all(&self) -> DaoResult<Vec<T>> {
        self.inner.find_all()
    }

    fn exists(&self, value: impl Into<KeyValue>) -> DaoResult<bool> {
        self.inner.exists(value)
    }

    fn persist(&self, entity: &mut T) -> DaoResult<()> {
        self.inner.persist(entity)
    }

    fn delete(&self, entity: &T) -> DaoResult<()> {
        self.inner.delete(entity)
    }
}

impl<T, S> PrimaryKeyBasedDao<T> for SessionDao<T, S>
where
    T: Persistable,
    S: PersistentStore + NativeSessionProvider,
{
    fn find_by_primary_key(&self, key: impl Into<KeyValue>) -> DaoResult<Option<T>> {
        self.inner.find_by_primary_key(key)
    }

    fn find_by_entity(&self, entity: &T) -> DaoResult<Option<T>> {
        self.inner.find_by_entity(entity)
    }
}
