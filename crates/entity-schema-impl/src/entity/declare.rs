// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! `impl Entity` generation.
//!
//! # Generated Code
//!
//! ```rust,ignore
//! impl ::entity_schema::Entity for Article {
//!     fn entity_type() -> ::std::sync::Arc<::entity_schema::EntityType> {
//!         static ENTITY_TYPE: ::std::sync::OnceLock<...> = ::std::sync::OnceLock::new();
//!         ::std::sync::Arc::clone(ENTITY_TYPE.get_or_init(|| {
//!             ::entity_schema::EntityType::builder("Article")
//!                 .attribute(
//!                     ::entity_schema::Attribute::new(
//!                         "id",
//!                         <Uuid as ::entity_schema::SemanticType>::field_type()
//!                     )
//!                     .primary_key()
//!                 )
//!                 .extra_field("word_count", <i64 as ::entity_schema::SemanticType>::field_type())
//!                 .build()
//!             // ...
//!         }))
//!     }
//! }
//! ```
//!
//! Every declaration error is reported at compile time, so the runtime
//! build only fails if the core crate's rules change.

use proc_macro2::TokenStream;
use quote::quote;

use super::parse::{EntityDef, ExtraDef, ExtraType, FieldDef, Role};

/// Generate the `Entity` implementation.
pub fn generate(entity: &EntityDef) -> TokenStream {
    let ident = &entity.ident;
    let name = &entity.name;
    let attributes = entity.fields.iter().map(attribute);
    let extras = entity.extras.iter().map(extra_field);
    let message = format!("invalid entity declaration `{name}`: {{}}");

    quote! {
        impl ::entity_schema::Entity for #ident {
            fn entity_type() -> ::std::sync::Arc<::entity_schema::EntityType> {
                static ENTITY_TYPE: ::std::sync::OnceLock<
                    ::std::sync::Arc<::entity_schema::EntityType>
                > = ::std::sync::OnceLock::new();

                ::std::sync::Arc::clone(ENTITY_TYPE.get_or_init(|| {
                    let declared = ::entity_schema::EntityType::builder(#name)
                        #(.attribute(#attributes))*
                        #(#extras)*
                        .build();
                    match declared {
                        ::std::result::Result::Ok(entity_type) => entity_type,
                        ::std::result::Result::Err(err) => panic!(#message, err)
                    }
                }))
            }
        }
    }
}

fn attribute(field: &FieldDef) -> TokenStream {
    let name = field.name_str();
    let ty = &field.ty;
    let field_type = match &field.expose.placeholder {
        Some(placeholder) => quote! { ::entity_schema::FieldType::forward(#placeholder) },
        None => quote! { <#ty as ::entity_schema::SemanticType>::field_type() }
    };

    let mut modifiers = Vec::new();
    if field.is_option() {
        modifiers.push(quote! { .nullable() });
    }
    if let Some(default) = &field.expose.default {
        modifiers.push(quote! { .with_default(::entity_schema::serde_json::json!(#default)) });
    }
    match field.role() {
        Some(Role::Id) => modifiers.push(quote! { .primary_key() }),
        Some(Role::CreatedAt) => modifiers.push(quote! { .created_at() }),
        Some(Role::UpdatedAt) => modifiers.push(quote! { .updated_at() }),
        None => {}
    }
    if let Some(target) = field.belongs_to() {
        let target = target.to_string();
        modifiers.push(quote! { .belongs_to(#target) });
    }

    let flags = [
        (quote! { INCLUDE_IN_CREATE }, field.expose.in_create()),
        (quote! { INCLUDE_IN_UPDATE }, field.expose.in_update()),
        (quote! { INCLUDE_IN_RESPONSE }, field.expose.in_response())
    ];
    for (key, value) in flags {
        if let Some(value) = value {
            modifiers.push(quote! { .meta(::entity_schema::attribute::keys::#key, #value) });
        }
    }
    if let Some(description) = field.description() {
        modifiers.push(quote! { .description(#description) });
    }

    quote! {
        ::entity_schema::Attribute::new(#name, #field_type) #(#modifiers)*
    }
}

fn extra_field(extra: &ExtraDef) -> TokenStream {
    let name = extra.name.to_string();
    let field_type = match &extra.ty {
        ExtraType::Rust(ty) => quote! { <#ty as ::entity_schema::SemanticType>::field_type() },
        ExtraType::Forward(placeholder) => {
            quote! { ::entity_schema::FieldType::forward(#placeholder) }
        }
    };
    quote! { .extra_field(#name, #field_type) }
}
