//! 实体元数据扫描器实现
//!
//! 按命名空间向发现服务查询实体类型，收集标记为主键的字段并构建注册表。
//! 扫描只读取编译期生成的元数据，不访问持久化存储。

use data_abstractions::EntityScanner;
use data_common::{
    global_entity_catalog, ConfigurationError, ConfigurationResult, DeclaredField,
    DuplicateKeyPolicy, EntityDiscovery, EntityTypeInfo, FieldDescriptor, MetadataContext,
    ScannerConfig,
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// 实体元数据扫描器
pub struct MetadataScanner {
    /// 扫描配置
    config: ScannerConfig,
    /// 发现服务
    discovery: Arc<dyn EntityDiscovery>,
}

impl MetadataScanner {
    /// 创建使用全局实体目录的扫描器
    pub fn new() -> Self {
        Self {
            config: ScannerConfig::default(),
            discovery: global_entity_catalog(),
        }
    }

    /// 设置扫描配置
    pub fn with_config(mut self, config: ScannerConfig) -> Self {
        self.config = config;
        self
    }

    /// 设置发现服务
    pub fn with_discovery(mut self, discovery: Arc<dyn EntityDiscovery>) -> Self {
        self.discovery = discovery;
        self
    }

    /// 获取扫描配置
    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// 扫描配置中声明的命名空间
    pub fn scan_configured(&self) -> ConfigurationResult<MetadataContext> {
        let namespaces: Vec<&str> = self.config.namespaces.iter().map(String::as_str).collect();
        self.scan(&namespaces)
    }

    /// 检查单个实体类型，返回需要注册的主键字段
    fn inspect(&self, type_info: &EntityTypeInfo) -> ConfigurationResult<Option<FieldDescriptor>> {
        let mut marked: Vec<DeclaredField> = self
            .discovery
            .declared_fields(type_info)
            .into_iter()
            .filter(|field| field.primary_key)
            .collect();

        if let Some(field) = marked.iter().find(|field| field.accessor.is_none()) {
            error!("主键字段缺少取值器: {}.{}", type_info.name, field.name);
            return Err(ConfigurationError::MissingAccessor {
                type_name: type_info.name.to_string(),
                field: field.name.to_string(),
            });
        }

        marked.sort_by_key(|field| field.name);

        let chosen = match marked.as_slice() {
            [] => {
                debug!("实体类型未声明主键字段，跳过: {}", type_info.name);
                return Ok(None);
            }
            [field] => field,
            [first, ..] => {
                let fields: Vec<String> = marked.iter().map(|f| f.name.to_string()).collect();
                match self.config.policy {
                    DuplicateKeyPolicy::FailFast => {
                        error!("实体类型声明了多个主键字段: {}, 字段: {:?}", type_info.name, fields);
                        return Err(ConfigurationError::DuplicatePrimaryKey {
                            type_name: type_info.name.to_string(),
                            fields,
                        });
                    }
                    DuplicateKeyPolicy::Lenient => {
                        warn!(
                            "实体类型声明了多个主键字段: {}, 字段: {:?}, 使用: {}",
                            type_info.name, fields, first.name
                        );
                        first
                    }
                }
            }
        };

        let descriptor = FieldDescriptor::from_declared(*type_info, chosen).ok_or_else(|| {
            ConfigurationError::MissingAccessor {
                type_name: type_info.name.to_string(),
                field: chosen.name.to_string(),
            }
        })?;
        debug!("注册主键字段: {}.{}", type_info.name, descriptor.name());
        Ok(Some(descriptor))
    }
}

impl Default for MetadataScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MetadataScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataScanner")
            .field("config", &self.config)
            .field("discovery", &self.discovery.name())
            .finish()
    }
}

impl EntityScanner for MetadataScanner {
    fn scan(&self, namespaces: &[&str]) -> ConfigurationResult<MetadataContext> {
        if namespaces.is_empty() {
            debug!("未指定扫描命名空间，返回空注册表");
            return Ok(MetadataContext::empty());
        }

        info!(
            "开始扫描实体元数据: 命名空间 {:?}, 发现服务 {}",
            namespaces,
            self.discovery.name()
        );

        let mut seen = HashSet::new();
        let mut types = Vec::new();
        for namespace in namespaces {
            for type_info in self.discovery.list_types(namespace) {
                if seen.insert(type_info.id) {
                    types.push(type_info);
                }
            }
        }
        types.sort_by_key(|type_info| type_info.name);

        let mut descriptors = Vec::with_capacity(types.len());
        for type_info in &types {
            if let Some(descriptor) = self.inspect(type_info)? {
                descriptors.push(descriptor);
            }
        }

        let context = MetadataContext::from_descriptors(descriptors);
        info!(
            "实体元数据扫描完成: 发现 {} 个实体类型, 注册 {} 个主键字段",
            types.len(),
            context.len()
        );
        Ok(context)
    }

    fn name(&self) -> &str {
        "MetadataScanner"
    }
}
