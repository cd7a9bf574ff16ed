//! 持久化配置加载
//!
//! 使用 config crate 从配置文件与环境变量加载 [`PersistenceSettings`]。
//! 环境变量以 `PERSISTENCE` 为前缀，`__` 分隔层级，例如
//! `PERSISTENCE__SCANNER__POLICY=fail_fast`。

use data_common::{ConfigurationError, ConfigurationResult, ScannerConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, error};

/// 环境变量前缀
pub const ENV_PREFIX: &str = "PERSISTENCE";

/// 未显式指定配置文件时查找的默认文件
pub const DEFAULT_CONFIG_FILE: &str = "config/persistence";

/// 日志配置项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// 日志级别
    pub level: String,
    /// 是否使用 JSON 格式
    pub json: bool,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否显示文件名与行号
    pub show_location: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            show_target: true,
            show_thread_ids: false,
            show_location: false,
        }
    }
}

/// 持久化配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceSettings {
    /// 元数据扫描配置
    pub scanner: ScannerConfig,
    /// 日志配置
    pub logging: LoggingSettings,
}

impl PersistenceSettings {
    /// 加载配置
    ///
    /// 指定的配置文件必须存在；未指定时尝试可选的默认文件。
    /// 环境变量覆盖文件中的同名配置。
    pub fn load(path: Option<&Path>) -> ConfigurationResult<Self> {
        let file = match path {
            Some(path) => {
                debug!("加载持久化配置文件: {}", path.display());
                config::File::from(path).required(true)
            }
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("scanner.namespaces"),
            )
            .build()
            .map_err(|e| {
                error!("持久化配置构建失败: {}", e);
                ConfigurationError::settings_load(e)
            })?;

        let result: Self = settings.try_deserialize().map_err(|e| {
            error!("持久化配置绑定失败: {}", e);
            ConfigurationError::settings_load(e)
        })?;

        debug!(
            "持久化配置加载完成: 策略 {:?}, 命名空间 {:?}",
            result.scanner.policy, result.scanner.namespaces
        );
        Ok(result)
    }

    /// 从指定文件加载
    pub fn from_file(path: impl AsRef<Path>) -> ConfigurationResult<Self> {
        Self::load(Some(path.as_ref()))
    }
}
