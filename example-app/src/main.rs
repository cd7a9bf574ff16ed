//! # 示例应用程序
//!
//! 演示如何使用 Lorn ADSP 数据访问层：加载配置、扫描实体元数据，
//! 并通过两种主键策略的 DAO 读写内存存储。

use clap::Parser;
use data_abstractions::{Dao, IdBasedDao, PrimaryKeyBasedDao};
use data_common::DuplicateKeyPolicy;
use data_impl::{
    InMemoryStore, PersistenceBuilder, PersistenceRuntime, PersistenceSettings,
};
use entity_macros::Entity;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "Lorn ADSP 数据访问层示例应用")]
struct Args {
    /// 配置文件路径
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 日志级别，覆盖配置文件
    #[arg(long)]
    log_level: Option<String>,

    /// 写入的卫星数量
    #[arg(long, default_value_t = 3)]
    count: u32,

    /// 遇到重复主键声明时直接失败
    #[arg(long)]
    strict: bool,
}

/// 整数代理主键的实体
#[derive(Debug, Clone, Serialize, Deserialize, Entity)]
#[entity(namespace = "demo::orbit", id_based)]
struct Satellite {
    #[id(generator = "sequence")]
    #[primary_key]
    id: Option<i64>,
    name: String,
    altitude_km: u32,
}

/// 文本主键的实体
#[derive(Debug, Clone, Serialize, Deserialize, Entity)]
#[entity(namespace = "demo::ground")]
struct Station {
    #[id]
    #[primary_key]
    code: String,
    city: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut settings = PersistenceSettings::load(args.config.as_deref())?;
    if let Some(level) = args.log_level {
        settings.logging.level = level;
    }
    if args.strict {
        settings.scanner.policy = DuplicateKeyPolicy::FailFast;
    }

    let runtime = PersistenceBuilder::from_settings(settings)
        .with_namespace("demo")
        .with_configured_logging()?
        .build()?;

    info!("启动 Lorn ADSP 数据访问层示例应用");
    let store = Arc::new(InMemoryStore::with_name("demo"));

    demonstrate_surrogate_keys(&runtime, &store, args.count)?;
    demonstrate_registry_keys(&runtime, &store)?;

    info!("示例运行完成");
    Ok(())
}

/// 演示代理主键 DAO
fn demonstrate_surrogate_keys(
    runtime: &PersistenceRuntime,
    store: &Arc<InMemoryStore>,
    count: u32,
) -> anyhow::Result<()> {
    let dao = runtime.surrogate_dao::<Satellite, _>(Arc::clone(store));

    let mut satellites: Vec<_> = (1..=count)
        .map(|n| Satellite {
            id: None,
            name: format!("sat-{n}"),
            altitude_km: 400 + n * 100,
        })
        .collect();
    dao.persist_all(&mut satellites)?;
    info!("写入 {} 颗卫星，共 {} 条记录", count, dao.count_total()?);

    if let Some(first) = satellites.first_mut() {
        first.altitude_km += 50;
        dao.save_or_update(first)?;
        if let Some(id) = first.id {
            let reloaded = dao.find_by_id(id)?;
            info!("重新读取卫星 {}: {:?}", id, reloaded);
        }
    }

    if let Some(last) = satellites.last() {
        dao.delete(last)?;
        info!("删除卫星 {}，剩余 {} 条记录", last.name, dao.count_total()?);
    }
    Ok(())
}

/// 演示注册表主键 DAO
fn demonstrate_registry_keys(
    runtime: &PersistenceRuntime,
    store: &Arc<InMemoryStore>,
) -> anyhow::Result<()> {
    let dao = runtime.registry_dao::<Station, _>(Arc::clone(store));

    let mut station = Station {
        code: "KRU".to_string(),
        city: "Kourou".to_string(),
    };
    dao.persist(&mut station)?;
    info!("站点 {} 是否存在: {}", station.code, dao.exists("KRU")?);

    match dao.find_by_primary_key("KRU")? {
        Some(found) => info!("按主键读取站点: {:?}", found),
        None => warn!("未找到站点 KRU"),
    }

    for station in dao.find_all()? {
        info!("已登记站点: {} ({})", station.code, station.city);
    }
    Ok(())
}
