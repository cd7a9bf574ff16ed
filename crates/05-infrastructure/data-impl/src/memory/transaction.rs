//! 内存存储事务

use super::store::{InMemoryStore, Table};
use chrono::{DateTime, Utc};
use data_common::{KeyValue, StoreResult};
use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::thread::{self, ThreadId};
use tracing::warn;
use uuid::Uuid;

/// 活动事务状态
#[derive(Debug)]
pub(crate) struct ActiveTransaction {
    pub(crate) id: Uuid,
    pub(crate) started_at: DateTime<Utc>,
    /// 开启事务的线程，只有该线程能加入事务
    pub(crate) owner: ThreadId,
    /// 事务开始时的表快照，回滚时恢复
    pub(crate) snapshot: HashMap<TypeId, Table>,
    /// 持久化上下文
    pub(crate) tracked: HashSet<(TypeId, KeyValue)>,
}

impl ActiveTransaction {
    pub(crate) fn new(snapshot: HashMap<TypeId, Table>) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            owner: thread::current().id(),
            snapshot,
            tracked: HashSet::new(),
        }
    }

    /// 当前线程是否为事务所有者
    pub(crate) fn is_owned_by_current(&self) -> bool {
        self.owner == thread::current().id()
    }

    pub(crate) fn info(&self) -> TransactionInfo {
        TransactionInfo {
            id: self.id,
            started_at: self.started_at,
            tracked: self.tracked.len(),
        }
    }
}

/// 事务信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionInfo {
    /// 事务ID
    pub id: Uuid,
    /// 开始时间
    pub started_at: DateTime<Utc>,
    /// 受管实例数量
    pub tracked: usize,
}

/// 事务守卫
///
/// 必须显式提交，未提交即被丢弃时自动回滚。
#[must_use = "事务未提交时会在丢弃时回滚"]
pub struct Transaction<'a> {
    store: &'a InMemoryStore,
    id: Uuid,
    finished: bool,
}

impl<'a> Transaction<'a> {
    pub(crate) fn new(store: &'a InMemoryStore, id: Uuid) -> Self {
        Self {
            store,
            id,
            finished: false,
        }
    }

    /// 事务ID
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// 提交事务
    pub fn commit(mut self) -> StoreResult<()> {
        self.finished = true;
        self.store.finish(self.id, true)
    }

    /// 回滚事务
    pub fn rollback(mut self) -> StoreResult<()> {
        self.finished = true;
        self.store.finish(self.id, false)
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if !self.finished {
            warn!("事务未提交即被丢弃，执行回滚: {}", self.id);
            if let Err(e) = self.store.finish(self.id, false) {
                warn!("事务回滚失败: {}, 原因: {}", self.id, e);
            }
        }
    }
}

impl std::fmt::Debug for Transaction<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transaction")
            .field("id", &self.id)
            .field("store", &self.store.name())
            .field("finished", &self.finished)
            .finish()
    }
}
