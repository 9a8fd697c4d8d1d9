// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entity-level parsing.
//!
//! Combines the darling-parsed `#[entity(...)]` options with the parsed
//! fields and `#[extra(...)]` declarations into an [`EntityDef`], and checks
//! everything that can be checked at compile time:
//!
//! | Check | Error span |
//! |-------|------------|
//! | struct with named fields | struct ident (darling) |
//! | no generic parameters | first generic parameter |
//! | at most one field per system role | second field |
//! | unique extra field names | second declaration |
//!
//! # Supported Attributes
//!
//! | Attribute | Required | Default | Description |
//! |-----------|----------|---------|-------------|
//! | `name` | No | struct name | Entity type name, used in schema names |

use darling::FromDeriveInput;
use syn::{DeriveInput, Generics, Ident};

use super::{
    extra::{ExtraDef, parse_extra_attrs},
    field::{FieldDef, Role}
};

/// Options parsed from `#[entity(...)]`.
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(entity), supports(struct_named))]
pub struct EntityAttrs {
    /// Struct identifier.
    pub ident: Ident,

    /// Struct generics; rejected when non-empty.
    pub generics: Generics,

    /// Entity type name override.
    #[darling(default)]
    pub name: Option<String>
}

/// Complete parsed entity definition.
#[derive(Debug)]
pub struct EntityDef {
    /// Struct identifier (e.g., `Article`).
    pub ident: Ident,

    /// Entity type name used at runtime.
    pub name: String,

    /// Fields in declaration order.
    pub fields: Vec<FieldDef>,

    /// Extra fields in declaration order.
    pub extras: Vec<ExtraDef>
}

impl EntityDef {
    /// Parse entity definition from syn's `DeriveInput`.
    ///
    /// # Errors
    ///
    /// - Applied to enum, union, tuple or unit struct
    /// - Generic struct
    /// - Malformed `#[field]`, `#[belongs_to]` or `#[extra]` attribute
    /// - Two fields with the same system role
    /// - Two extra fields with the same name
    pub fn from_derive_input(input: &DeriveInput) -> darling::Result<Self> {
        let attrs = EntityAttrs::from_derive_input(input)?;

        if let Some(param) = attrs.generics.params.first() {
            return Err(
                darling::Error::custom("Entity cannot be derived for generic structs")
                    .with_span(param)
            );
        }

        let mut errors = darling::Error::accumulator();

        let fields: Vec<FieldDef> = match &input.data {
            syn::Data::Struct(data) => data
                .fields
                .iter()
                .filter_map(|field| errors.handle(FieldDef::from_field(field)))
                .collect(),
            _ => Vec::new()
        };

        for role in Role::ALL {
            let mut holders = fields.iter().filter(|f| f.role() == Some(role));
            if holders.next().is_some()
                && let Some(second) = holders.next()
            {
                errors.push(
                    darling::Error::custom(format!(
                        "only one field may be marked #[{}]",
                        role.attr_name()
                    ))
                    .with_span(&second.ident)
                );
            }
        }

        let extras = errors
            .handle(parse_extra_attrs(&input.attrs).map_err(darling::Error::from))
            .unwrap_or_default();
        for (index, extra) in extras.iter().enumerate() {
            if extras[..index].iter().any(|e| e.name == extra.name) {
                errors.push(
                    darling::Error::custom(format!("duplicate extra field `{}`", extra.name))
                        .with_span(&extra.name)
                );
            }
        }

        errors.finish()?;

        Ok(Self {
            name: attrs.name.unwrap_or_else(|| attrs.ident.to_string()),
            ident: attrs.ident,
            fields,
            extras
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: DeriveInput) -> darling::Result<EntityDef> {
        EntityDef::from_derive_input(&input)
    }

    #[test]
    fn parses_fields_and_extras() {
        let entity = parse(syn::parse_quote! {
            /// A published article.
            #[extra(word_count: i64, comments: "List['CommentRef']")]
            pub struct Article {
                #[id]
                pub id: uuid::Uuid,
                pub title: String,
            }
        })
        .unwrap();
        assert_eq!(entity.name, "Article");
        assert_eq!(entity.fields.len(), 2);
        assert_eq!(entity.extras.len(), 2);
    }

    #[test]
    fn name_override() {
        let entity = parse(syn::parse_quote! {
            #[entity(name = "Post")]
            pub struct Article {
                pub title: String,
            }
        })
        .unwrap();
        assert_eq!(entity.name, "Post");
        assert_eq!(entity.ident.to_string(), "Article");
    }

    #[test]
    fn rejects_tuple_struct() {
        assert!(parse(syn::parse_quote! { pub struct Article(String); }).is_err());
    }

    #[test]
    fn rejects_enum() {
        assert!(parse(syn::parse_quote! { pub enum Article { A } }).is_err());
    }

    #[test]
    fn rejects_generics() {
        let err = parse(syn::parse_quote! {
            pub struct Article<T> {
                pub body: T,
            }
        })
        .unwrap_err();
        assert!(err.to_string().contains("generic"));
    }

    #[test]
    fn rejects_duplicate_role() {
        let err = parse(syn::parse_quote! {
            pub struct Article {
                #[id]
                pub id: uuid::Uuid,
                #[id]
                pub key: uuid::Uuid,
            }
        })
        .unwrap_err();
        assert!(err.to_string().contains("#[id]"));
    }

    #[test]
    fn rejects_duplicate_extra() {
        let err = parse(syn::parse_quote! {
            #[extra(word_count: i64)]
            #[extra(word_count: i32)]
            pub struct Article {
                pub title: String,
            }
        })
        .unwrap_err();
        assert!(err.to_string().contains("word_count"));
    }

    #[test]
    fn collects_errors_from_several_fields() {
        let err = parse(syn::parse_quote! {
            pub struct Article {
                #[field(unknown)]
                pub a: String,
                #[field(create = "yes")]
                pub b: String,
            }
        })
        .unwrap_err();
        assert_eq!(err.len(), 2);
    }
}
