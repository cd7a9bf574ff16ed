//! 宏工具函数

use proc_macro2::Span;
use quote::ToTokens;
use syn::{Ident, Type};

/// 类型的源码字符串，去掉 token 之间的空白
pub fn type_to_string(ty: &Type) -> String {
    ty.to_token_stream()
        .to_string()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// 转换为蛇形命名
pub fn to_snake_case(name: &str) -> String {
    let mut result = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

/// 生成实体登记函数名
pub fn registration_fn_name(struct_name: &Ident) -> Ident {
    Ident::new(
        &format!(
            "__register_entity_{}",
            to_snake_case(&struct_name.to_string())
        ),
        Span::call_site(),
    )
}
