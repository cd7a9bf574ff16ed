//! # Data Access Abstractions
//!
//! 数据访问抽象层，定义持久化存储、DAO 与元数据扫描的核心接口。
//!
//! ## 核心接口
//!
//! - [`PersistentStore`] - 持久化存储接口
//! - [`NativeSessionProvider`] - 原生会话提供者接口
//! - [`Dao`] / [`PrimaryKeyBasedDao`] / [`IdBasedDao`] - DAO 接口
//! - [`DaoCapabilities`] - 通用 DAO 算法依赖的能力
//! - [`IdentityResolver`] - 主键解析策略
//! - [`EntityScanner`] - 元数据扫描器接口

pub mod dao;
pub mod identity;
pub mod scanner;
pub mod store;

pub use dao::*;
pub use identity::*;
pub use scanner::*;
pub use store::*;
