//! 主键值
//!
//! [`KeyValue`] 是主键在运行时的统一表示。实体字段通过 [`ToKeyValue`]
//! 转换为主键值，调用方通过 [`FromKeyValue`] 取回自己期望的主键类型。

use crate::errors::ExtractionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// 主键值
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyValue {
    /// 有符号整数主键
    Integer(i64),
    /// 超出 i64 范围的无符号整数主键
    Unsigned(u64),
    /// 文本主键
    Text(String),
    /// UUID 主键
    ///
    /// 只在内存中出现：序列化为连字符文本，反序列化得到 `Text`，
    /// 与 [`KeyValue::canonical`] 的折叠一致。
    #[serde(skip_deserializing)]
    Uuid(Uuid),
}

impl KeyValue {
    /// 规范化主键值
    ///
    /// UUID 折叠为连字符文本，可放入 i64 的无符号整数折叠为 `Integer`，
    /// 使查找结果与调用方的主键写法无关。
    pub fn canonical(self) -> Self {
        match self {
            Self::Unsigned(value) => match i64::try_from(value) {
                Ok(value) => Self::Integer(value),
                Err(_) => Self::Unsigned(value),
            },
            Self::Uuid(value) => Self::Text(value.hyphenated().to_string()),
            other => other,
        }
    }

    /// 以 i64 读取主键值
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            Self::Unsigned(value) => i64::try_from(*value).ok(),
            _ => None,
        }
    }

    /// 以文本读取主键值
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    /// 转换为 JSON 值，用于与序列化后的实体字段比较
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Integer(value) => serde_json::Value::from(*value),
            Self::Unsigned(value) => serde_json::Value::from(*value),
            Self::Text(value) => serde_json::Value::from(value.as_str()),
            Self::Uuid(value) => serde_json::Value::from(value.hyphenated().to_string()),
        }
    }

    /// 从序列化后的实体字段读取主键值
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(number) => number
                .as_i64()
                .map(Self::Integer)
                .or_else(|| number.as_u64().map(Self::Unsigned)),
            serde_json::Value::String(text) => Some(Self::Text(text.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{}", value),
            Self::Unsigned(value) => write!(f, "{}", value),
            Self::Text(value) => f.write_str(value),
            Self::Uuid(value) => write!(f, "{}", value.hyphenated()),
        }
    }
}

impl From<i64> for KeyValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for KeyValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u64> for KeyValue {
    fn from(value: u64) -> Self {
        Self::Unsigned(value).canonical()
    }
}

impl From<u32> for KeyValue {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<String> for KeyValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for KeyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<&String> for KeyValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<Uuid> for KeyValue {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

/// 可作为主键字段的类型
///
/// 未赋值的主键（例如 `Option::None`）返回 `None`。
pub trait ToKeyValue {
    /// 读取主键值
    fn to_key_value(&self) -> Option<KeyValue>;
}

macro_rules! impl_to_key_value_via_from {
    ($($ty:ty),*) => {
        $(
            impl ToKeyValue for $ty {
                fn to_key_value(&self) -> Option<KeyValue> {
                    Some(KeyValue::from(*self))
                }
            }
        )*
    };
}

impl_to_key_value_via_from!(i32, i64, u32, u64, Uuid);

impl ToKeyValue for String {
    fn to_key_value(&self) -> Option<KeyValue> {
        Some(KeyValue::Text(self.clone()))
    }
}

impl<T: ToKeyValue> ToKeyValue for Option<T> {
    fn to_key_value(&self) -> Option<KeyValue> {
        self.as_ref().and_then(|value| value.to_key_value())
    }
}

/// 可由主键值构造的类型
pub trait FromKeyValue: Sized {
    /// 从主键值转换
    fn from_key_value(value: KeyValue) -> Result<Self, ExtractionError>;
}

fn conversion_error(target: &'static str, value: &KeyValue) -> ExtractionError {
    ExtractionError::KeyConversion {
        target,
        value: value.to_string(),
    }
}

impl FromKeyValue for KeyValue {
    fn from_key_value(value: KeyValue) -> Result<Self, ExtractionError> {
        Ok(value)
    }
}

impl FromKeyValue for i64 {
    fn from_key_value(value: KeyValue) -> Result<Self, ExtractionError> {
        value.as_i64().ok_or_else(|| conversion_error("i64", &value))
    }
}

impl FromKeyValue for i32 {
    fn from_key_value(value: KeyValue) -> Result<Self, ExtractionError> {
        value
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(|| conversion_error("i32", &value))
    }
}

impl FromKeyValue for u64 {
    fn from_key_value(value: KeyValue) -> Result<Self, ExtractionError> {
        match &value {
            KeyValue::Integer(v) => u64::try_from(*v).map_err(|_| conversion_error("u64", &value)),
            KeyValue::Unsigned(v) => Ok(*v),
            _ => Err(conversion_error("u64", &value)),
        }
    }
}

impl FromKeyValue for u32 {
    fn from_key_value(value: KeyValue) -> Result<Self, ExtractionError> {
        value
            .as_i64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| conversion_error("u32", &value))
    }
}

impl FromKeyValue for String {
    fn from_key_value(value: KeyValue) -> Result<Self, ExtractionError> {
        match value {
            KeyValue::Text(text) => Ok(text),
            KeyValue::Uuid(uuid) => Ok(uuid.hyphenated().to_string()),
            other => Err(conversion_error("String", &other)),
        }
    }
}

impl FromKeyValue for Uuid {
    fn from_key_value(value: KeyValue) -> Result<Self, ExtractionError> {
        match &value {
            KeyValue::Uuid(uuid) => Ok(*uuid),
            KeyValue::Text(text) => Uuid::parse_str(text).map_err(|_| conversion_error("Uuid", &value)),
            _ => Err(conversion_error("Uuid", &value)),
        }
    }
}

impl<T: FromKeyValue> FromKeyValue for Option<T> {
    fn from_key_value(value: KeyValue) -> Result<Self, ExtractionError> {
        T::from_key_value(value).map(Some)
    }
}
