//! 内存持久化存储
//!
//! 作为测试与演示用的参考后端：按实体类型保存序列化后的 JSON 文档，
//! 支持单会话事务、持久化上下文跟踪和原生会话。

mod session;
mod store;
mod transaction;

pub use session::MemorySession;
pub use store::InMemoryStore;
pub use transaction::{Transaction, TransactionInfo};
