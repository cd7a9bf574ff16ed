//! 单元测试共用的实体与日志初始化

use data_common::{
    DeclaredField, Entity, EntityTypeInfo, ExtractionError, FieldAccessor, FromKeyValue,
    IdBasedEntity, IdGenerator, KeyValue, Persistable, ToKeyValue,
};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::io;
use std::sync::{Arc, Once};

static INIT_LOGGER: Once = Once::new();

pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// 收集日志输出的写入器
#[derive(Debug, Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// 在当前线程内执行 `work`，返回其结果与期间输出的日志
pub fn capture_logs<R>(work: impl FnOnce() -> R) -> (R, String) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, work);
    (result, buffer.contents())
}

/// 整数序列主键的账户
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: Option<i64>,
    pub owner: String,
    pub balance: i64,
}

impl Account {
    pub fn new(owner: &str, balance: i64) -> Self {
        Self {
            id: None,
            owner: owner.to_string(),
            balance,
        }
    }
}

impl Entity for Account {
    fn type_info() -> EntityTypeInfo {
        EntityTypeInfo::of::<Self>().with_namespace("fixtures::ledger")
    }

    fn declared_fields() -> Vec<DeclaredField> {
        vec![
            DeclaredField::new("id", "Option<i64>")
                .primary_key()
                .with_accessor(FieldAccessor::new::<Self, _>("id", |account| {
                    account.id.to_key_value()
                })),
            DeclaredField::new("owner", "String"),
            DeclaredField::new("balance", "i64"),
        ]
    }
}

impl Persistable for Account {
    fn identity(&self) -> Option<KeyValue> {
        self.id.to_key_value()
    }

    fn assign_identity(&mut self, key: KeyValue) -> Result<(), ExtractionError> {
        self.id = FromKeyValue::from_key_value(key)?;
        Ok(())
    }

    fn identity_field() -> &'static str {
        "id"
    }

    fn id_generator() -> IdGenerator {
        IdGenerator::Sequence
    }
}

impl IdBasedEntity for Account {}

/// 调用方赋值的文本主键
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub label: String,
    pub color: String,
}

impl Entity for Tag {
    fn type_info() -> EntityTypeInfo {
        EntityTypeInfo::of::<Self>().with_namespace("fixtures::ledger")
    }

    fn declared_fields() -> Vec<DeclaredField> {
        vec![
            DeclaredField::new("label", "String")
                .primary_key()
                .with_accessor(FieldAccessor::new::<Self, _>("label", |tag| {
                    tag.label.to_key_value()
                })),
            DeclaredField::new("color", "String"),
        ]
    }
}

impl Persistable for Tag {
    fn identity(&self) -> Option<KeyValue> {
        self.label.to_key_value()
    }

    fn assign_identity(&mut self, key: KeyValue) -> Result<(), ExtractionError> {
        self.label = FromKeyValue::from_key_value(key)?;
        Ok(())
    }

    fn identity_field() -> &'static str {
        "label"
    }
}

/// 没有主键字段的实体
#[derive(Debug, Clone)]
pub struct Note;

impl Entity for Note {
    fn type_info() -> EntityTypeInfo {
        EntityTypeInfo::of::<Self>().with_namespace("fixtures::ledger")
    }

    fn declared_fields() -> Vec<DeclaredField> {
        vec![DeclaredField::new("text", "String")]
    }
}

/// 声明了两个主键字段的实体
#[derive(Debug, Clone)]
pub struct Badge {
    pub serial: u32,
    pub code: String,
}

impl Entity for Badge {
    fn type_info() -> EntityTypeInfo {
        EntityTypeInfo::of::<Self>().with_namespace("fixtures")
    }

    fn declared_fields() -> Vec<DeclaredField> {
        vec![
            DeclaredField::new("serial", "u32")
                .primary_key()
                .with_accessor(FieldAccessor::new::<Self, _>("serial", |badge| {
                    badge.serial.to_key_value()
                })),
            DeclaredField::new("code", "String")
                .primary_key()
                .with_accessor(FieldAccessor::new::<Self, _>("code", |badge| {
                    badge.code.to_key_value()
                })),
        ]
    }
}

/// 调用方赋值、可能缺失标识的实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memo {
    pub code: Option<String>,
    pub body: String,
}

impl Entity for Memo {
    fn declared_fields() -> Vec<DeclaredField> {
        vec![
            DeclaredField::new("code", "Option<String>"),
            DeclaredField::new("body", "String"),
        ]
    }
}

impl Persistable for Memo {
    fn identity(&self) -> Option<KeyValue> {
        self.code.to_key_value()
    }

    fn assign_identity(&mut self, key: KeyValue) -> Result<(), ExtractionError> {
        self.code = FromKeyValue::from_key_value(key)?;
        Ok(())
    }

    fn identity_field() -> &'static str {
        "code"
    }
}

/// 主键字段不是存储标识的实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Moon {
    pub id: Option<i64>,
    pub name: String,
}

impl Moon {
    pub fn new(name: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
        }
    }
}

impl Entity for Moon {
    fn type_info() -> EntityTypeInfo {
        EntityTypeInfo::of::<Self>().with_namespace("fixtures::orbit")
    }

    fn declared_fields() -> Vec<DeclaredField> {
        vec![
            DeclaredField::new("id", "Option<i64>"),
            DeclaredField::new("name", "String")
                .primary_key()
                .with_accessor(FieldAccessor::new::<Self, _>("name", |moon| {
                    moon.name.to_key_value()
                })),
        ]
    }
}

impl Persistable for Moon {
    fn identity(&self) -> Option<KeyValue> {
        self.id.to_key_value()
    }

    fn assign_identity(&mut self, key: KeyValue) -> Result<(), ExtractionError> {
        self.id = FromKeyValue::from_key_value(key)?;
        Ok(())
    }

    fn identity_field() -> &'static str {
        "id"
    }

    fn id_generator() -> IdGenerator {
        IdGenerator::Sequence
    }
}
