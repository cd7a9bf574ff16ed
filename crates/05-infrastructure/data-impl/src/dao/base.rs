//! 通用 DAO 算法
//!
//! 持久化/合并、删除与存在性判断对所有主键解析策略都相同，
//! 差异只体现在 [`DaoCapabilities`] 提供的主键解析上。

use data_abstractions::{DaoCapabilities, IdentityResolver, PersistentStore};
use data_common::{DaoResult, KeyValue, Persistable};
use tracing::{debug, warn};

/// 保存实体
///
/// 既不游离也不受管的实例视为瞬时实例，新建；其余合并，
/// 合并后的受管状态写回 `entity`。
pub fn persist<T, C>(dao: &C, entity: &mut T) -> DaoResult<()>
where
    T: Persistable,
    C: DaoCapabilities<T>,
{
    let detached = dao.is_detached(entity)?;
    let tracked = dao.store().contains(entity)?;

    if !detached && !tracked {
        debug!("新建实体: {}", dao.entity_type().name);
        dao.store().create(entity)?;
    } else {
        debug!(
            "合并实体: {} (游离: {}, 受管: {})",
            dao.entity_type().name,
            detached,
            tracked
        );
        *entity = dao.store().merge(entity)?;
    }
    Ok(())
}

/// 删除实体
///
/// 受管实例直接删除；否则先按主键找到受管的对应实体再删除。
/// 存储中没有对应实体时不做任何操作，主键已赋值时记录警告。
pub fn delete<T, C>(dao: &C, entity: &T) -> DaoResult<()>
where
    T: Persistable,
    C: DaoCapabilities<T>,
{
    let store = dao.store();
    if !dao.is_detached(entity)? && store.contains(entity)? {
        store.remove(entity)?;
        return Ok(());
    }

    let Some(key) = dao.resolver().key_of(entity)? else {
        debug!("实例没有主键，忽略删除: {}", dao.entity_type().name);
        return Ok(());
    };
    match store.find::<T>(&key)? {
        Some(tracked) => store.remove(&tracked)?,
        None => warn!(
            "存储中没有对应实体，忽略删除: {} [{}]",
            dao.entity_type().name,
            key
        ),
    }
    Ok(())
}

/// 是否存在主键等于 `value` 的实体
pub fn exists<T, C>(dao: &C, value: &KeyValue) -> DaoResult<bool>
where
    T: Persistable,
    C: DaoCapabilities<T>,
{
    let field = dao.resolver().key_field()?;
    Ok(dao.store().exists_where::<T>(field, value)?)
}

/// 按主键查找
pub fn find_by_primary_key<T, C>(dao: &C, key: &KeyValue) -> DaoResult<Option<T>>
where
    T: Persistable,
    C: DaoCapabilities<T>,
{
    Ok(dao.store().find::<T>(key)?)
}

/// 查找全部实体
pub fn find_all<T, C>(dao: &C) -> DaoResult<Vec<T>>
where
    T: Persistable,
    C: DaoCapabilities<T>,
{
    Ok(dao.store().find_all::<T>()?)
}

/// 统计实体总数
pub fn count_total<T, C>(dao: &C) -> DaoResult<u64>
where
    T: Persistable,
    C: DaoCapabilities<T>,
{
    Ok(dao.store().count::<T>()?)
}
