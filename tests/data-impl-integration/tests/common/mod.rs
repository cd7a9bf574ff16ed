//! 集成测试共用的实体模型

#![allow(dead_code)]

use entity_macros::Entity;
use serde::{Deserialize, Serialize};
use std::sync::Once;
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// 初始化测试日志
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// 整数代理主键
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Entity)]
#[entity(namespace = "astronomy::people", id_based)]
pub struct Person {
    #[id(generator = "sequence")]
    #[primary_key]
    pub id: Option<i64>,
    pub name: String,
    pub age: u32,
}

impl Person {
    pub fn new(name: &str, age: u32) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            age,
        }
    }
}

/// UUID 文本主键
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Entity)]
#[entity(namespace = "astronomy::bodies")]
pub struct Planet {
    #[id(generator = "uuid")]
    #[primary_key]
    pub uid: Option<String>,
    pub name: String,
    pub moons: u32,
}

impl Planet {
    pub fn new(name: &str, moons: u32) -> Self {
        Self {
            uid: None,
            name: name.to_string(),
            moons,
        }
    }
}

/// 有存储标识但没有主键标记
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Entity)]
#[entity(namespace = "astronomy::bodies")]
pub struct Comet {
    #[id(generator = "uuid")]
    pub id: Option<Uuid>,
    pub name: String,
}

/// 声明了两个主键字段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Entity)]
#[entity(namespace = "astronomy::catalog")]
pub struct Star {
    #[primary_key]
    pub hip: u32,
    #[primary_key]
    pub designation: String,
}
