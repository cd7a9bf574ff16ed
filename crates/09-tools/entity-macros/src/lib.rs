//! # Entity Macros
//!
//! 这个 crate 提供了实体元数据生成与自动登记的过程宏。
//!
//! ## 核心宏
//!
//! - [`Entity`] - 生成 `Entity` / `Persistable` / `IdBasedEntity` 实现，并在启动时登记到全局实体目录
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use entity_macros::Entity;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize, Entity)]
//! #[entity(namespace = "app::model", id_based)]
//! pub struct Person {
//!     #[id(generator = "sequence")]
//!     #[primary_key]
//!     pub id: Option<i64>,
//!     pub name: String,
//! }
//! ```
//!
//! 使用方需要依赖 `data-common` 与 `ctor`。

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod entity;
mod utils;

/// 实体派生宏
///
/// # 属性
///
/// - `#[primary_key]` - 标记主键字段，生成编译期取值器
/// - `#[id]` / `#[id(generator = "sequence" | "uuid" | "assigned")]` - 标记存储标识字段，生成 `Persistable`
/// - `#[entity(namespace = "...")]` - 覆盖命名空间（默认为模块路径）
/// - `#[entity(id_based)]` - 同时生成 `IdBasedEntity`
///
/// 多个 `#[primary_key]` 字段不会在编译期报错，由扫描器按配置的策略处理。
#[proc_macro_derive(Entity, attributes(entity, primary_key, id))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    entity::derive_entity_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
