//! DAO 抽象接口
//!
//! [`Dao`] 定义与主键无关的通用操作，[`PrimaryKeyBasedDao`] 与 [`IdBasedDao`]
//! 追加按主键查找的能力。[`DaoCapabilities`] 是通用算法依赖的钩子。

use crate::identity::IdentityResolver;
use crate::store::PersistentStore;
use data_common::{DaoResult, EntityTypeInfo, IdBasedEntity, KeyValue, Persistable};

/// 通用 DAO trait
pub trait Dao<T: Persistable> {
    /// 统计实体总数
    fn count_total(&self) -> DaoResult<u64>;

    /// 查找全部实体
    fn find_all(&self) -> DaoResult<Vec<T>>;

    /// 是否存在主键等于 `value` 的实体
    fn exists(&self, value: impl Into<KeyValue>) -> DaoResult<bool>;

    /// 保存实体
    ///
    /// 瞬时实体新建，游离或受管实体合并。
    fn persist(&self, entity: &mut T) -> DaoResult<()>;

    /// 依次保存多个实体
    ///
    /// 除非调用方已开启外层事务，否则不保证整体原子性。
    fn persist_all(&self, entities: &mut [T]) -> DaoResult<()> {
        for entity in entities.iter_mut() {
            self.persist(entity)?;
        }
        Ok(())
    }

    /// 删除实体
    fn delete(&self, entity: &T) -> DaoResult<()>;

    /// 保存或更新实体，等同于 [`Dao::persist`]
    fn save_or_update(&self, entity: &mut T) -> DaoResult<()> {
        self.persist(entity)
    }
}

/// 按主键查找的 DAO trait
pub trait PrimaryKeyBasedDao<T: Persistable>: Dao<T> {
    /// 按主键查找
    fn find_by_primary_key(&self, key: impl Into<KeyValue>) -> DaoResult<Option<T>>;

    /// 按实例的主键查找其存储中的对应实体
    fn find_by_entity(&self, entity: &T) -> DaoResult<Option<T>>;
}

/// 以整数 `id` 为主键的 DAO trait
pub trait IdBasedDao<T: IdBasedEntity>: PrimaryKeyBasedDao<T> {
    /// 按 `id` 查找
    fn find_by_id(&self, id: i64) -> DaoResult<Option<T>> {
        self.find_by_primary_key(id)
    }
}

/// 通用 DAO 算法依赖的能力
pub trait DaoCapabilities<T: Persistable> {
    /// 持久化存储类型
    type Store: PersistentStore;
    /// 主键解析器类型
    type Resolver: IdentityResolver<T>;

    /// 持久化存储
    fn store(&self) -> &Self::Store;

    /// 主键解析器
    fn resolver(&self) -> &Self::Resolver;

    /// 实体类型信息
    fn entity_type(&self) -> EntityTypeInfo {
        T::type_info()
    }

    /// 实例是否处于游离状态
    ///
    /// 主键已赋值、不受当前上下文管理、且存储中仍有对应记录。
    fn is_detached(&self, entity: &T) -> DaoResult<bool> {
        let Some(key) = self.resolver().key_of(entity)? else {
            return Ok(false);
        };
        if self.store().contains(entity)? {
            return Ok(false);
        }
        Ok(self.store().find::<T>(&key)?.is_some())
    }

    /// 查找实例在当前上下文中的受管对应实体
    fn resolve_tracked(&self, entity: &T) -> DaoResult<Option<T>> {
        match self.resolver().key_of(entity)? {
            Some(key) => Ok(self.store().find::<T>(&key)?),
            None => Ok(None),
        }
    }
}
