//! # Data Access Implementation
//!
//! 数据访问层实现，提供以下功能：
//! - 实体元数据扫描与主键注册表构建
//! - 通用 DAO 算法，以及代理主键 / 注册表主键两种主键解析策略
//! - 暴露原生会话的 DAO
//! - 支持事务的内存持久化存储
//! - 配置加载与日志初始化

pub mod bootstrap;
pub mod dao;
pub mod memory;
pub mod scanner;
pub mod settings;

#[cfg(test)]
mod test_support;

pub use bootstrap::{init_logging, LoggingConfig, PersistenceBuilder, PersistenceRuntime};
pub use dao::{
    GenericDao, RegistryKeyDao, RegistryKeyResolver, SessionDao, SurrogateKeyDao,
    SurrogateKeyResolver,
};
pub use memory::{InMemoryStore, MemorySession, Transaction, TransactionInfo};
pub use scanner::MetadataScanner;
pub use settings::{LoggingSettings, PersistenceSettings};
