//! DAO 实现
//!
//! - [`base`] 通用 DAO 算法，只依赖 [`DaoCapabilities`](data_abstractions::DaoCapabilities)
//! - [`GenericDao`] 绑定存储与主键解析器的 DAO
//! - [`SurrogateKeyDao`] 约定代理主键的 DAO
//! - [`RegistryKeyDao`] 由元数据注册表解析主键的 DAO
//! - [`SessionDao`] 暴露原生会话的 DAO

pub mod base;
mod generic;
mod registry_key;
mod session;
mod surrogate;

pub use generic::GenericDao;
pub use registry_key::{RegistryKeyDao, RegistryKeyResolver};
pub use session::SessionDao;
pub use surrogate::{SurrogateKeyDao, SurrogateKeyResolver};
