//! 绑定存储与主键解析器的通用 DAO

use super::base;
use data_abstractions::{
    Dao, DaoCapabilities, IdentityResolver, KeyStrategy, PersistentStore, PrimaryKeyBasedDao,
};
use data_common::{DaoResult, KeyValue, Persistable};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// 通用 DAO
///
/// 每个操作都在存储事务中执行：加入调用方已开启的事务，
/// 或为本次调用开启新事务。
pub struct GenericDao<T, S, R> {
    store: Arc<S>,
    resolver: R,
    _entity: PhantomData<fn() -> T>,
}

impl<T, S, R> GenericDao<T, S, R>
where
    T: Persistable,
    S: PersistentStore,
    R: IdentityResolver<T>,
{
    /// 使用指定的主键解析器创建 DAO
    pub fn with_resolver(store: Arc<S>, resolver: R) -> Self {
        Self {
            store,
            resolver,
            _entity: PhantomData,
        }
    }

    /// 主键解析方式
    pub fn strategy(&self) -> KeyStrategy {
        self.resolver.strategy()
    }

    /// 共享的存储句柄
    pub fn store_handle(&self) -> &Arc<S> {
        &self.store
    }
}

impl<T, S, R> Clone for GenericDao<T, S, R>
where
    R: Clone,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            resolver: self.resolver.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T, S, R> fmt::Debug for GenericDao<T, S, R>
where
    T: Persistable,
    S: PersistentStore,
    R: IdentityResolver<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenericDao")
            .field("entity", &T::type_info().name)
            .field("store", &self.store.name())
            .field("strategy", &self.resolver.strategy())
            .finish()
    }
}

impl<T, S, R> DaoCapabilities<T> for GenericDao<T, S, R>
where
    T: Persistable,
    S: PersistentStore,
    R: IdentityResolver<T>,
{
    type Store = S;
    type Resolver = R;

    fn store(&self) -> &S {
        &self.store
    }

    fn resolver(&self) -> &R {
        &self.resolver
    }
}

impl<T, S, R> Dao<T> for GenericDao<T, S, R>
where
    T: Persistable,
    S: PersistentStore,
    R: IdentityResolver<T>,
{
    fn count_total(&self) -> DaoResult<u64> {
        self.store.with_transaction(|| base::count_total::<T, _>(self))
    }

    fn find_all(&self) -> DaoResult<Vec<T>> {
        self.store.with_transaction(|| base::find_all::<T, _>(self))
    }

    fn exists(&self, value: impl Into<KeyValue>) -> DaoResult<bool> {
        let value = value.into().canonical();
        self.store.with_transaction(|| base::exists::<T, _>(self, &value))
    }

    fn persist(&self, entity: &mut T) -> DaoResult<()> {
        self.store.with_transaction(|| base::persist::<T, _>(self, entity))
    }

    fn delete(&self, entity: &T) -> DaoResult<()> {
        self.store.with_transaction(|| base::delete::<T, _>(self, entity))
    }
}

impl<T, S, R> PrimaryKeyBasedDao<T> for GenericDao<T, S, R>
where
    T: Persistable,
    S: PersistentStore,
    R: IdentityResolver<T>,
{
    fn find_by_primary_key(&self, key: impl Into<KeyValue>) -> DaoResult<Option<T>> {
        let key = key.into().canonical();
        self.store
            .with_transaction(|| base::find_by_primary_key::<T, _>(self, &key))
    }

    fn find_by_entity(&self, entity: &T) -> DaoResult<Option<T>> {
        self.store.with_transaction(|| self.resolve_tracked(entity))
    }
}
