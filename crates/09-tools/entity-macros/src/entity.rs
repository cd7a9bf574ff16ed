//! 实体派生宏实现

use crate::utils::{registration_fn_name, type_to_string};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, Ident, LitStr, Meta, Result, Type};

/// `#[entity(...)]` 参数
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityArgs {
    /// 覆盖的命名空间
    pub namespace: Option<String>,
    /// 是否生成 `IdBasedEntity`
    pub id_based: bool,
}

impl EntityArgs {
    /// 从结构体属性解析
    pub fn from_attrs(attrs: &[Attribute]) -> Result<Self> {
        let mut args = Self::default();
        for attr in attrs.iter().filter(|attr| attr.path().is_ident("entity")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("namespace") {
                    let value: LitStr = meta.value()?.parse()?;
                    args.namespace = Some(value.value());
                    Ok(())
                } else if meta.path.is_ident("id_based") {
                    args.id_based = true;
                    Ok(())
                } else {
                    Err(meta.error("不支持的 entity 参数，可选: namespace, id_based"))
                }
            })?;
        }
        Ok(args)
    }
}

/// 标识生成策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeneratorKind {
    Sequence,
    Uuid,
    #[default]
    Assigned,
}

impl GeneratorKind {
    fn parse(lit: &LitStr) -> Result<Self> {
        match lit.value().as_str() {
            "sequence" => Ok(Self::Sequence),
            "uuid" => Ok(Self::Uuid),
            "assigned" => Ok(Self::Assigned),
            other => Err(syn::Error::new(
                lit.span(),
                format!("未知的标识生成策略: {}，可选: sequence, uuid, assigned", other),
            )),
        }
    }

    fn to_tokens(self) -> TokenStream {
        match self {
            Self::Sequence => quote! { ::data_common::IdGenerator::Sequence },
            Self::Uuid => quote! { ::data_common::IdGenerator::Uuid },
            Self::Assigned => quote! { ::data_common::IdGenerator::Assigned },
        }
    }
}

/// 解析 `#[id]` 或 `#[id(generator = "...")]`
fn parse_id_attr(attr: &Attribute) -> Result<GeneratorKind> {
    let mut generator = GeneratorKind::default();
    if let Meta::Path(_) = attr.meta {
        return Ok(generator);
    }
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("generator") {
            let value: LitStr = meta.value()?.parse()?;
            generator = GeneratorKind::parse(&value)?;
            Ok(())
        } else {
            Err(meta.error("不支持的 id 参数，可选: generator"))
        }
    })?;
    Ok(generator)
}

struct EntityField<'a> {
    ident: &'a Ident,
    ty: &'a Type,
    primary_key: bool,
}

struct IdField<'a> {
    ident: &'a Ident,
    generator: GeneratorKind,
}

struct EntityModel<'a> {
    name: &'a Ident,
    args: EntityArgs,
    fields: Vec<EntityField<'a>>,
    id: Option<IdField<'a>>,
}

fn analyze(input: &DeriveInput) -> Result<EntityModel<'_>> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "#[derive(Entity)] 不支持泛型实体",
        ));
    }
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "#[derive(Entity)] 仅支持结构体",
        ));
    };
    let Fields::Named(named) = &data.fields else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "#[derive(Entity)] 仅支持具名字段的结构体",
        ));
    };

    let args = EntityArgs::from_attrs(&input.attrs)?;
    let mut fields = Vec::with_capacity(named.named.len());
    let mut id: Option<IdField<'_>> = None;

    for field in &named.named {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let mut primary_key = false;
        for attr in &field.attrs {
            if attr.path().is_ident("primary_key") {
                attr.meta.require_path_only()?;
                primary_key = true;
            } else if attr.path().is_ident("id") {
                let generator = parse_id_attr(attr)?;
                if id.is_some() {
                    return Err(syn::Error::new_spanned(attr, "实体只能有一个 #[id] 字段"));
                }
                id = Some(IdField { ident, generator });
            }
        }
        fields.push(EntityField {
            ident,
            ty: &field.ty,
            primary_key,
        });
    }

    if let Some(id) = &id {
        if let Some(field) = fields
            .iter()
            .find(|field| field.primary_key && field.ident != id.ident)
        {
            return Err(syn::Error::new_spanned(
                field.ident,
                format!(
                    "#[primary_key] 字段必须同时是 #[id] 字段: {} 与 {}",
                    field.ident, id.ident
                ),
            ));
        }
    }

    if args.id_based && id.is_none() {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "#[entity(id_based)] 需要一个 #[id] 字段",
        ));
    }

    Ok(EntityModel {
        name: &input.ident,
        args,
        fields,
        id,
    })
}

fn declared_field_tokens(field: &EntityField<'_>) -> TokenStream {
    let ident = field.ident;
    let name = ident.to_string();
    let value_type = type_to_string(field.ty);

    if field.primary_key {
        quote! {
            ::data_common::DeclaredField::new(#name, #value_type)
                .primary_key()
                .with_accessor(::data_common::FieldAccessor::new::<Self, _>(
                    #name,
                    |entity: &Self| ::data_common::ToKeyValue::to_key_value(&entity.#ident),
                ))
        }
    } else {
        quote! {
            ::data_common::DeclaredField::new(#name, #value_type)
        }
    }
}

fn persistable_tokens(name: &Ident, id: &IdField<'_>) -> TokenStream {
    let ident = id.ident;
    let field_name = ident.to_string();
    let generator = id.generator.to_tokens();

    quote! {
        impl ::data_common::Persistable for #name {
            fn identity(&self) -> ::std::option::Option<::data_common::KeyValue> {
                ::data_common::ToKeyValue::to_key_value(&self.#ident)
            }

            fn assign_identity(
                &mut self,
                key: ::data_common::KeyValue,
            ) -> ::std::result::Result<(), ::data_common::ExtractionError> {
                self.#ident = ::data_common::FromKeyValue::from_key_value(key)?;
                ::std::result::Result::Ok(())
            }

            fn identity_field() -> &'static str {
                #field_name
            }

            fn id_generator() -> ::data_common::IdGenerator {
                #generator
            }
        }
    }
}

/// 实现 #[derive(Entity)] 宏
pub fn derive_entity_impl(input: DeriveInput) -> Result<TokenStream> {
    let model = analyze(&input)?;
    let name = model.name;

    let namespace = model
        .args
        .namespace
        .as_ref()
        .map(|namespace| quote! { .with_namespace(#namespace) });
    let declared_fields = model.fields.iter().map(declared_field_tokens);

    let entity_impl = quote! {
        impl ::data_common::Entity for #name {
            fn type_info() -> ::data_common::EntityTypeInfo {
                ::data_common::EntityTypeInfo::of::<Self>() #namespace
            }

            fn declared_fields() -> ::std::vec::Vec<::data_common::DeclaredField> {
                ::std::vec![#(#declared_fields),*]
            }
        }
    };

    let persistable_impl = model.id.as_ref().map(|id| persistable_tokens(name, id));
    let id_based_impl = model.args.id_based.then(|| {
        quote! {
            impl ::data_common::IdBasedEntity for #name {}
        }
    });

    let registration_fn = registration_fn_name(name);

    Ok(quote! {
        #entity_impl

        #persistable_impl

        #id_based_impl

        // 使用 ctor 在程序启动时登记实体
        #[ctor::ctor]
        fn #registration_fn() {
            ::data_common::global_entity_catalog().register::<#name>();
        }
    })
}
