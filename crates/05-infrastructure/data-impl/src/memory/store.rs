//! 内存存储实现

use super::session::MemorySession;
use super::transaction::{ActiveTransaction, Transaction, TransactionInfo};
use chrono::Utc;
use dashmap::DashMap;
use data_abstractions::{NativeSessionProvider, PersistentStore};
use data_common::{IdGenerator, KeyValue, Persistable, StoreError, StoreResult};
use parking_lot::{Condvar, Mutex};
use std::any::TypeId;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// 单个实体类型的数据表
#[derive(Debug, Clone)]
pub(crate) struct Table {
    name: &'static str,
    rows: BTreeMap<KeyValue, serde_json::Value>,
    next_sequence: i64,
}

impl Table {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            rows: BTreeMap::new(),
            next_sequence: 1,
        }
    }

    /// 序列跳过调用方显式赋值的整数标识
    fn observe_key(&mut self, key: &KeyValue) {
        if let KeyValue::Integer(value) = key {
            if *value >= self.next_sequence {
                self.next_sequence = value.saturating_add(1);
            }
        }
    }

    fn generate(&mut self, generator: IdGenerator) -> StoreResult<KeyValue> {
        match generator {
            IdGenerator::Sequence => {
                let value = self.next_sequence;
                self.next_sequence += 1;
                Ok(KeyValue::Integer(value))
            }
            IdGenerator::Uuid => Ok(KeyValue::Text(Uuid::new_v4().hyphenated().to_string())),
            IdGenerator::Assigned => Err(StoreError::MissingIdentity {
                type_name: self.name.to_string(),
            }),
        }
    }
}

#[derive(Debug)]
struct StoreInner {
    name: String,
    tables: DashMap<TypeId, Table>,
    transaction: Mutex<Option<ActiveTransaction>>,
    /// 事务结束时通知等待的线程
    released: Condvar,
}

/// 内存持久化存储
///
/// 克隆得到的句柄共享同一份数据。同一时刻只允许一个活动事务，
/// 事务归开启它的线程所有：其他线程不能在其中写入或登记受管实例，
/// 它们的 [`PersistentStore::with_transaction`] 调用会等待事务结束后再开启自己的事务。
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    inner: Arc<StoreInner>,
}

impl InMemoryStore {
    /// 创建新的内存存储
    pub fn new() -> Self {
        Self::with_name("memory")
    }

    /// 创建指定名称的内存存储
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                name: name.into(),
                tables: DashMap::new(),
                transaction: Mutex::new(None),
                released: Condvar::new(),
            }),
        }
    }

    /// 存储名称
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// 开启事务
    pub fn begin(&self) -> StoreResult<Transaction<'_>> {
        let mut guard = self.inner.transaction.lock();
        if let Some(active) = guard.as_ref() {
            return Err(StoreError::TransactionActive {
                transaction_id: active.id.to_string(),
            });
        }
        Ok(self.start(&mut guard))
    }

    /// 在已持有事务锁且没有活动事务时开启事务
    fn start(&self, slot: &mut Option<ActiveTransaction>) -> Transaction<'_> {
        let snapshot: HashMap<TypeId, Table> = self
            .inner
            .tables
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        let active = ActiveTransaction::new(snapshot);
        let id = active.id;
        *slot = Some(active);

        debug!("开启事务: {} (存储: {})", id, self.inner.name);
        Transaction::new(self, id)
    }

    /// 当前线程拥有的活动事务
    fn owned<'g>(
        slot: &'g mut Option<ActiveTransaction>,
        operation: &'static str,
    ) -> StoreResult<&'g mut ActiveTransaction> {
        match slot.as_mut() {
            Some(active) if active.is_owned_by_current() => Ok(active),
            Some(active) => Err(StoreError::ForeignTransaction {
                transaction_id: active.id.to_string(),
            }),
            None => Err(StoreError::TransactionRequired { operation }),
        }
    }

    /// 是否存在活动事务
    pub fn in_transaction(&self) -> bool {
        self.inner.transaction.lock().is_some()
    }

    /// 当前活动事务信息
    pub fn transaction_info(&self) -> Option<TransactionInfo> {
        self.inner.transaction.lock().as_ref().map(ActiveTransaction::info)
    }

    /// 结束事务，`commit` 为 false 时恢复快照
    pub(crate) fn finish(&self, id: Uuid, commit: bool) -> StoreResult<()> {
        let mut guard = self.inner.transaction.lock();
        let active = match guard.take() {
            Some(active) if active.id == id => active,
            other => {
                *guard = other;
                return Err(StoreError::NoActiveTransaction);
            }
        };
        self.inner.released.notify_all();

        let elapsed = (Utc::now() - active.started_at).num_milliseconds();
        if commit {
            debug!(
                "提交事务: {}, 受管实例 {} 个, 耗时 {} ms",
                id,
                active.tracked.len(),
                elapsed
            );
        } else {
            self.inner.tables.clear();
            for (type_id, table) in active.snapshot {
                self.inner.tables.insert(type_id, table);
            }
            info!("回滚事务: {}, 耗时 {} ms", id, elapsed);
        }
        Ok(())
    }

    /// 某类型当前保存的行数，不经过事务
    pub fn row_count<T: Persistable>(&self) -> usize {
        self.inner
            .tables
            .get(&TypeId::of::<T>())
            .map(|table| table.rows.len())
            .unwrap_or(0)
    }

    fn key_of<T: Persistable>(entity: &T) -> Option<KeyValue> {
        entity.identity().map(KeyValue::canonical)
    }

    fn serialize<T: Persistable>(entity: &T) -> StoreResult<serde_json::Value> {
        serde_json::to_value(entity).map_err(|source| StoreError::Serialization {
            type_name: T::type_info().name.to_string(),
            source,
        })
    }

    fn deserialize<T: Persistable>(document: serde_json::Value) -> StoreResult<T> {
        serde_json::from_value(document).map_err(|source| StoreError::Serialization {
            type_name: T::type_info().name.to_string(),
            source,
        })
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PersistentStore for InMemoryStore {
    fn name(&self) -> &str {
        &self.inner.name
    }

    fn find<T: Persistable>(&self, key: &KeyValue) -> StoreResult<Option<T>> {
        let type_id = TypeId::of::<T>();
        let key = key.clone().canonical();

        let mut guard = self.inner.transaction.lock();
        let document = self
            .inner
            .tables
            .get(&type_id)
            .and_then(|table| table.rows.get(&key).cloned());
        let Some(document) = document else {
            return Ok(None);
        };

        let entity = Self::deserialize::<T>(document)?;
        if let Ok(active) = Self::owned(&mut guard, "find") {
            active.tracked.insert((type_id, key));
        }
        Ok(Some(entity))
    }

    fn find_all<T: Persistable>(&self) -> StoreResult<Vec<T>> {
        let type_id = TypeId::of::<T>();

        let mut guard = self.inner.transaction.lock();
        let rows: Vec<(KeyValue, serde_json::Value)> = self
            .inner
            .tables
            .get(&type_id)
            .map(|table| {
                table
                    .rows
                    .iter()
                    .map(|(key, document)| (key.clone(), document.clone()))
                    .collect()
            })
            .unwrap_or_default();

        let mut entities = Vec::with_capacity(rows.len());
        for (key, document) in rows {
            entities.push(Self::deserialize::<T>(document)?);
            if let Ok(active) = Self::owned(&mut guard, "find_all") {
                active.tracked.insert((type_id, key));
            }
        }
        Ok(entities)
    }

    fn contains<T: Persistable>(&self, entity: &T) -> StoreResult<bool> {
        let Some(key) = Self::key_of(entity) else {
            return Ok(false);
        };
        let guard = self.inner.transaction.lock();
        Ok(guard.as_ref().is_some_and(|active| {
            active.is_owned_by_current() && active.tracked.contains(&(TypeId::of::<T>(), key))
        }))
    }

    fn create<T: Persistable>(&self, entity: &mut T) -> StoreResult<()> {
        let type_id = TypeId::of::<T>();
        let type_name = T::type_info().name;

        let mut guard = self.inner.transaction.lock();
        let active = Self::owned(&mut guard, "create")?;

        let mut table = self
            .inner
            .tables
            .entry(type_id)
            .or_insert_with(|| Table::new(type_name));

        let key = match Self::key_of(entity) {
            Some(key) => key,
            None => {
                let key = table.generate(T::id_generator())?;
                entity
                    .assign_identity(key.clone())
                    .map_err(|source| StoreError::IdentityAssignment {
                        type_name: type_name.to_string(),
                        source,
                    })?;
                key
            }
        };

        if table.rows.contains_key(&key) {
            return Err(StoreError::DuplicateKey {
                type_name: type_name.to_string(),
                key: key.to_string(),
            });
        }

        let document = Self::serialize(&*entity)?;
        table.observe_key(&key);
        table.rows.insert(key.clone(), document);
        debug!("新建记录: {} [{}]", type_name, key);
        active.tracked.insert((type_id, key));
        Ok(())
    }

    fn merge<T: Persistable>(&self, entity: &T) -> StoreResult<T> {
        let Some(key) = Self::key_of(entity) else {
            debug!("合并的实例没有标识，按新实例保存: {}", T::type_info().name);
            let mut copy = entity.clone();
            self.create(&mut copy)?;
            return Ok(copy);
        };

        let type_id = TypeId::of::<T>();
        let type_name = T::type_info().name;

        let mut guard = self.inner.transaction.lock();
        let active = Self::owned(&mut guard, "merge")?;

        let document = Self::serialize(entity)?;
        let mut table = self
            .inner
            .tables
            .entry(type_id)
            .or_insert_with(|| Table::new(type_name));
        table.observe_key(&key);
        table.rows.insert(key.clone(), document);
        debug!("合并记录: {} [{}]", type_name, key);
        active.tracked.insert((type_id, key));
        Ok(entity.clone())
    }

    fn remove<T: Persistable>(&self, entity: &T) -> StoreResult<()> {
        let type_id = TypeId::of::<T>();
        let type_name = T::type_info().name;
        let key = Self::key_of(entity).ok_or_else(|| StoreError::MissingIdentity {
            type_name: type_name.to_string(),
        })?;

        let mut guard = self.inner.transaction.lock();
        let active = Self::owned(&mut guard, "remove")?;

        let tracked_key = (type_id, key);
        if !active.tracked.remove(&tracked_key) {
            warn!("删除的实例不受当前持久化上下文管理: {} [{}]", type_name, tracked_key.1);
            return Err(StoreError::DetachedInstance {
                type_name: type_name.to_string(),
                key: tracked_key.1.to_string(),
            });
        }

        if let Some(mut table) = self.inner.tables.get_mut(&type_id) {
            table.rows.remove(&tracked_key.1);
        }
        debug!("删除记录: {} [{}]", type_name, tracked_key.1);
        Ok(())
    }

    fn count<T: Persistable>(&self) -> StoreResult<u64> {
        Ok(self.row_count::<T>() as u64)
    }

    fn exists_where<T: Persistable>(&self, field: &str, value: &KeyValue) -> StoreResult<bool> {
        let expected = value.clone().canonical().to_json();
        Ok(self
            .inner
            .tables
            .get(&TypeId::of::<T>())
            .is_some_and(|table| {
                table
                    .rows
                    .values()
                    .any(|document| document.get(field) == Some(&expected))
            }))
    }

    fn with_transaction<R, E, F>(&self, work: F) -> Result<R, E>
    where
        F: FnOnce() -> Result<R, E>,
        E: From<StoreError>,
    {
        let mut guard = self.inner.transaction.lock();
        while guard.as_ref().is_some_and(|active| !active.is_owned_by_current()) {
            debug!("等待其他线程的事务结束 (存储: {})", self.inner.name);
            self.inner.released.wait(&mut guard);
        }
        if guard.is_some() {
            drop(guard);
            return work();
        }

        let transaction = self.start(&mut guard);
        drop(guard);
        match work() {
            Ok(value) => {
                transaction.commit()?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_error) = transaction.rollback() {
                    warn!("事务回滚失败: {}", rollback_error);
                }
                Err(e)
            }
        }
    }
}

impl NativeSessionProvider for InMemoryStore {
    type Session = MemorySession;

    fn unwrap_native_session(&self) -> StoreResult<Self::Session> {
        Ok(MemorySession::new(self.clone()))
    }
}
