//! 内存存储原生会话

use super::store::InMemoryStore;
use data_abstractions::PersistentStore;
use data_common::{KeyValue, Persistable, StoreResult};
use uuid::Uuid;

/// 内存存储原生会话
///
/// 直接操作存储，不经过 DAO 的游离/受管判断。
#[derive(Debug, Clone)]
pub struct MemorySession {
    store: InMemoryStore,
}

impl MemorySession {
    pub(crate) fn new(store: InMemoryStore) -> Self {
        Self { store }
    }

    /// 会话所属存储的名称
    pub fn store_name(&self) -> &str {
        self.store.name()
    }

    /// 当前活动事务ID
    pub fn transaction_id(&self) -> Option<Uuid> {
        self.store.transaction_info().map(|info| info.id)
    }

    /// 直接新建记录
    pub fn persist<T: Persistable>(&self, entity: &mut T) -> StoreResult<()> {
        self.store.with_transaction(|| self.store.create(entity))
    }

    /// 按标识读取记录
    pub fn get<T: Persistable>(&self, key: impl Into<KeyValue>) -> StoreResult<Option<T>> {
        self.store.find(&key.into())
    }

    /// 统计记录数
    pub fn count<T: Persistable>(&self) -> StoreResult<u64> {
        self.store.count::<T>()
    }
}
