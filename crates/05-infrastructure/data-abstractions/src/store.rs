//! 持久化存储抽象接口
//!
//! 存储与事务管理器属于外部协作者，这里只约定 DAO 需要的最小 CRUD 能力。

use data_common::{KeyValue, Persistable, StoreError, StoreResult};

/// 持久化存储 trait
///
/// 每个存储维护一个持久化上下文：活动事务中加载或创建的实例处于受管状态，
/// 事务结束后变为游离状态。
pub trait PersistentStore: Send + Sync {
    /// 存储名称
    fn name(&self) -> &str;

    /// 按标识查找实体
    fn find<T: Persistable>(&self, key: &KeyValue) -> StoreResult<Option<T>>;

    /// 查找某类型的全部实体
    fn find_all<T: Persistable>(&self) -> StoreResult<Vec<T>>;

    /// 实例是否受当前持久化上下文管理
    fn contains<T: Persistable>(&self, entity: &T) -> StoreResult<bool>;

    /// 新建实体，生成的标识会回写到实例
    fn create<T: Persistable>(&self, entity: &mut T) -> StoreResult<()>;

    /// 合并实体状态，返回受管的副本
    fn merge<T: Persistable>(&self, entity: &T) -> StoreResult<T>;

    /// 删除受管实体
    fn remove<T: Persistable>(&self, entity: &T) -> StoreResult<()>;

    /// 统计某类型的实体数量
    fn count<T: Persistable>(&self) -> StoreResult<u64>;

    /// 是否存在字段值等于 `value` 的实体
    fn exists_where<T: Persistable>(&self, field: &str, value: &KeyValue) -> StoreResult<bool>;

    /// 在事务中执行
    ///
    /// 已有活动事务时加入该事务，否则为本次调用开启事务，
    /// `work` 返回错误时回滚。
    fn with_transaction<R, E, F>(&self, work: F) -> Result<R, E>
    where
        F: FnOnce() -> Result<R, E>,
        E: From<StoreError>;
}

/// 原生会话提供者 trait
///
/// 暴露底层存储的原生会话句柄，供需要绕过 DAO 的调用方使用。
pub trait NativeSessionProvider {
    /// 原生会话类型
    type Session;

    /// 获取原生会话
    fn unwrap_native_session(&self) -> StoreResult<Self::Session>;
}
