//! 错误类型定义
//!
//! 数据访问层的错误分为四类：
//! - [`ConfigurationError`] 元数据或配置不一致，启动期致命错误
//! - [`ExtractionError`] 主键值提取或转换失败，属于内部一致性错误
//! - [`StoreError`] 持久化存储返回的错误，原样透传
//! - [`DaoError`] DAO 操作对外暴露的统一错误

use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("实体类型声明了多个主键字段: {type_name}, 字段: {fields:?}")]
    DuplicatePrimaryKey {
        type_name: String,
        fields: Vec<String>,
    },

    #[error("实体类型未在元数据注册表中注册: {type_name} (请检查扫描的命名空间或重新扫描)")]
    UnregisteredEntity { type_name: String },

    #[error("注册的主键字段与存储标识字段不一致: {type_name}, 主键: {key_field}, 标识: {identity_field}")]
    KeyIdentityMismatch {
        type_name: String,
        key_field: String,
        identity_field: String,
    },

    #[error("主键字段缺少取值器: {type_name}.{field}")]
    MissingAccessor { type_name: String, field: String },

    #[error("持久化配置加载失败: {source}")]
    SettingsLoad {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ConfigurationError {
    /// 创建未注册实体错误
    pub fn unregistered(type_name: impl Into<String>) -> Self {
        Self::UnregisteredEntity {
            type_name: type_name.into(),
        }
    }

    /// 包装配置加载错误
    pub fn settings_load(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::SettingsLoad {
            source: Box::new(source),
        }
    }
}

/// 主键值提取错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("字段取值器类型不匹配: 期望 {expected}, 字段: {field}")]
    TypeMismatch {
        expected: &'static str,
        field: String,
    },

    #[error("主键值无法转换为 {target}: {value}")]
    KeyConversion { target: &'static str, value: String },
}

/// 持久化存储错误类型
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("操作需要活动事务: {operation}")]
    TransactionRequired { operation: &'static str },

    #[error("存储已有活动事务: {transaction_id}")]
    TransactionActive { transaction_id: String },

    #[error("活动事务属于其他线程: {transaction_id}")]
    ForeignTransaction { transaction_id: String },

    #[error("没有活动事务")]
    NoActiveTransaction,

    #[error("主键重复: {type_name}, 主键: {key}")]
    DuplicateKey { type_name: String, key: String },

    #[error("实例不受当前持久化上下文管理: {type_name}, 主键: {key}")]
    DetachedInstance { type_name: String, key: String },

    #[error("实体缺少标识且未配置标识生成器: {type_name}")]
    MissingIdentity { type_name: String },

    #[error("标识回写失败: {type_name}, 原因: {source}")]
    IdentityAssignment {
        type_name: String,
        source: ExtractionError,
    },

    #[error("实体序列化失败: {type_name}, 原因: {source}")]
    Serialization {
        type_name: String,
        source: serde_json::Error,
    },

    #[error("存储后端错误: {message}")]
    Backend { message: String },
}

impl StoreError {
    /// 创建后端错误
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

/// DAO 操作错误类型
///
/// 存储与配置错误原样透传，不做二次包装。
#[derive(Error, Debug)]
pub enum DaoError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DaoError {
    /// 是否为配置错误
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// 是否为存储错误
    pub fn is_store(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}

/// 配置结果类型
pub type ConfigurationResult<T> = Result<T, ConfigurationError>;

/// 存储结果类型
pub type StoreResult<T> = Result<T, StoreError>;

/// DAO 结果类型
pub type DaoResult<T> = Result<T, DaoError>;
