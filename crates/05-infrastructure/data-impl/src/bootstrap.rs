//! 数据访问层启动引导
//!
//! [`PersistenceBuilder`] 依次完成日志初始化、元数据扫描，
//! 构建出持有只读注册表的 [`PersistenceRuntime`]。

use crate::dao::{RegistryKeyDao, SessionDao, SurrogateKeyDao};
use crate::scanner::MetadataScanner;
use crate::settings::{LoggingSettings, PersistenceSettings};
use data_abstractions::{NativeSessionProvider, PersistentStore};
use data_common::{
    ConfigurationError, ConfigurationResult, DuplicateKeyPolicy, EntityDiscovery, IdBasedEntity,
    MetadataContext, Persistable, ScannerConfig,
};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: tracing::Level,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否显示文件名
    pub show_file: bool,
    /// 是否显示行号
    pub show_line_number: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: true,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// 创建开发环境日志配置
    pub fn development() -> Self {
        Self {
            level: tracing::Level::DEBUG,
            show_target: true,
            show_thread_ids: true,
            show_file: true,
            show_line_number: true,
            json_format: false,
        }
    }

    /// 创建生产环境日志配置
    pub fn production() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: false,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: true,
        }
    }

    /// 从配置项创建
    pub fn from_settings(settings: &LoggingSettings) -> ConfigurationResult<Self> {
        let level = tracing::Level::from_str(&settings.level)
            .map_err(ConfigurationError::settings_load)?;
        Ok(Self {
            level,
            show_target: settings.show_target,
            show_thread_ids: settings.show_thread_ids,
            show_file: settings.show_location,
            show_line_number: settings.show_location,
            json_format: settings.json,
        })
    }
}

/// 初始化全局日志订阅器
///
/// 已有全局订阅器时保持原状并返回 `false`。
pub fn init_logging(config: &LoggingConfig) -> bool {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(config.level)
        .with_target(config.show_target)
        .with_thread_ids(config.show_thread_ids)
        .with_file(config.show_file)
        .with_line_number(config.show_line_number);

    let result = if config.json_format {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    };

    match result {
        Ok(()) => {
            info!("日志系统初始化完成: 级别 {}", config.level);
            true
        }
        Err(e) => {
            debug!("日志系统已初始化，跳过: {}", e);
            false
        }
    }
}

/// 数据访问层构建器
pub struct PersistenceBuilder {
    settings: PersistenceSettings,
    discovery: Option<Arc<dyn EntityDiscovery>>,
    logging: Option<LoggingConfig>,
}

impl PersistenceBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            settings: PersistenceSettings::default(),
            discovery: None,
            logging: None,
        }
    }

    /// 从已加载的配置创建
    pub fn from_settings(settings: PersistenceSettings) -> Self {
        Self {
            settings,
            ..Self::new()
        }
    }

    /// 设置扫描配置
    pub fn with_scanner_config(mut self, config: ScannerConfig) -> Self {
        self.settings.scanner = config;
        self
    }

    /// 添加扫描命名空间
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.settings.scanner.namespaces.push(namespace.into());
        self
    }

    /// 设置重复主键策略
    pub fn with_policy(mut self, policy: DuplicateKeyPolicy) -> Self {
        self.settings.scanner.policy = policy;
        self
    }

    /// 使用自定义发现服务替代全局实体目录
    pub fn with_discovery(mut self, discovery: Arc<dyn EntityDiscovery>) -> Self {
        self.discovery = Some(discovery);
        self
    }

    /// 启用日志初始化
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging = Some(config);
        self
    }

    /// 按配置项启用日志初始化
    pub fn with_configured_logging(self) -> ConfigurationResult<Self> {
        let config = LoggingConfig::from_settings(&self.settings.logging)?;
        Ok(self.with_logging(config))
    }

    /// 构建运行时
    pub fn build(self) -> ConfigurationResult<PersistenceRuntime> {
        // 只有在明确配置了日志时才初始化日志
        if let Some(logging) = &self.logging {
            init_logging(logging);
        }

        info!("开始构建数据访问层");
        let mut scanner = MetadataScanner::new().with_config(self.settings.scanner.clone());
        if let Some(discovery) = self.discovery {
            scanner = scanner.with_discovery(discovery);
        }
        let context = scanner.scan_configured()?;

        info!("数据访问层构建完成: 注册 {} 个实体类型", context.len());
        Ok(PersistenceRuntime {
            context: Arc::new(context),
            settings: self.settings,
        })
    }
}

impl Default for PersistenceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 数据访问层运行时
///
/// 持有只读的元数据注册表，负责创建各类 DAO。
#[derive(Debug, Clone)]
pub struct PersistenceRuntime {
    context: Arc<MetadataContext>,
    settings: PersistenceSettings,
}

impl PersistenceRuntime {
    /// 元数据注册表
    pub fn context(&self) -> &Arc<MetadataContext> {
        &self.context
    }

    /// 构建时使用的配置
    pub fn settings(&self) -> &PersistenceSettings {
        &self.settings
    }

    /// 创建注册表主键 DAO
    pub fn registry_dao<T, S>(&self, store: Arc<S>) -> RegistryKeyDao<T, S>
    where
        T: Persistable,
        S: PersistentStore,
    {
        RegistryKeyDao::new(store, Arc::clone(&self.context))
    }

    /// 创建代理主键 DAO
    pub fn surrogate_dao<T, S>(&self, store: Arc<S>) -> SurrogateKeyDao<T, S>
    where
        T: IdBasedEntity,
        S: PersistentStore,
    {
        SurrogateKeyDao::new(store)
    }

    /// 创建会话 DAO
    pub fn session_dao<T, S>(&self, store: Arc<S>) -> SessionDao<T, S>
    where
        T: Persistable,
        S: PersistentStore + NativeSessionProvider,
    {
        SessionDao::new(store, Arc::clone(&self.context))
    }
}
