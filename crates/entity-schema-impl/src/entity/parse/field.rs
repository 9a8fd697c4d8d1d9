// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Field-level attribute parsing.
//!
//! This module handles parsing of field attributes and delegates to
//! specialized submodules for different concerns:
//!
//! - [`expose`]: schema exposure (`#[field(...)]`)
//! - [`storage`]: system roles and relations (`#[id]`, `#[created_at]`,
//!   `#[updated_at]`, `#[belongs_to]`)
//!
//! # Architecture
//!
//! ```text
//! field.rs (coordinator)
//! ├── expose.rs   - inclusion flags, description, default, placeholder type
//! └── storage.rs  - system role and relation target
//! ```

mod expose;
mod storage;

pub use expose::ExposeConfig;
pub use storage::{Role, StorageConfig};
use syn::{Field, Ident, Type, ext::IdentExt};

use crate::utils::docs::extract_doc_comments;

/// Parsed field of an entity struct.
#[derive(Debug)]
pub struct FieldDef {
    /// Field identifier; also the attribute name.
    pub ident: Ident,

    /// Rust type.
    pub ty: Type,

    /// `#[field(...)]` options.
    pub expose: ExposeConfig,

    /// Role and relation markers.
    pub storage: StorageConfig,

    /// Doc comment, used as description when none is given explicitly.
    pub doc: Option<String>
}

impl FieldDef {
    /// Parse a named struct field.
    ///
    /// # Errors
    ///
    /// Returns an error for unnamed fields and malformed attributes.
    pub fn from_field(field: &Field) -> darling::Result<Self> {
        let ident = field.ident.clone().ok_or_else(|| {
            darling::Error::custom("Entity fields must be named").with_span(field)
        })?;

        let mut expose = ExposeConfig::default();
        let mut storage = StorageConfig::default();

        for attr in &field.attrs {
            if attr.path().is_ident("field") {
                expose = ExposeConfig::from_attr(attr)?;
            } else if let Some(role) = Role::from_attr(attr) {
                storage.set_role(role, attr)?;
            } else if attr.path().is_ident("belongs_to") {
                storage.belongs_to = Some(attr.parse_args::<Ident>()?);
            }
        }

        Ok(Self {
            ident,
            ty: field.ty.clone(),
            expose,
            storage,
            doc: extract_doc_comments(&field.attrs)
        })
    }

    /// Attribute name, without any `r#` prefix.
    #[must_use]
    pub fn name_str(&self) -> String {
        self.ident.unraw().to_string()
    }

    /// Whether the Rust type is `Option<T>`.
    #[must_use]
    pub fn is_option(&self) -> bool {
        if let Type::Path(type_path) = &self.ty
            && let Some(segment) = type_path.path.segments.last()
        {
            return segment.ident == "Option";
        }
        false
    }

    /// System role, if any.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.storage.role
    }

    /// Relation target, if any.
    #[must_use]
    pub fn belongs_to(&self) -> Option<&Ident> {
        self.storage.belongs_to.as_ref()
    }

    /// Explicit description, else the doc comment.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.expose.description.as_deref().or(self.doc.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::*;

    fn parse(field: Field) -> darling::Result<FieldDef> {
        FieldDef::from_field(&field)
    }

    fn named(tokens: syn::FieldsNamed) -> Field {
        tokens.named.into_iter().next().unwrap()
    }

    #[test]
    fn plain_field() {
        let field = parse(named(parse_quote!({ pub title: String }))).unwrap();
        assert_eq!(field.name_str(), "title");
        assert!(!field.is_option());
        assert_eq!(field.role(), None);
        assert!(field.belongs_to().is_none());
    }

    #[test]
    fn raw_identifier_name() {
        let field = parse(named(parse_quote!({ pub r#type: String }))).unwrap();
        assert_eq!(field.name_str(), "type");
    }

    #[test]
    fn option_is_detected() {
        let field = parse(named(parse_quote!({ pub body: Option<String> }))).unwrap();
        assert!(field.is_option());
        let field = parse(named(parse_quote!({ pub body: std::option::Option<String> }))).unwrap();
        assert!(field.is_option());
    }

    #[test]
    fn role_and_relation() {
        let id = parse(named(parse_quote!({ #[id] pub id: uuid::Uuid }))).unwrap();
        assert_eq!(id.role(), Some(Role::Id));

        let author = parse(named(parse_quote!({
            #[belongs_to(Author)]
            pub author_id: uuid::Uuid
        })))
        .unwrap();
        assert_eq!(author.belongs_to().unwrap().to_string(), "Author");
    }

    #[test]
    fn doc_comment_is_fallback_description() {
        let field = parse(named(parse_quote!({
            /// The headline.
            pub title: String
        })))
        .unwrap();
        assert_eq!(field.description(), Some("The headline."));

        let field = parse(named(parse_quote!({
            /// The headline.
            #[field(description = "Shown in lists")]
            pub title: String
        })))
        .unwrap();
        assert_eq!(field.description(), Some("Shown in lists"));
    }

    #[test]
    fn conflicting_roles_are_rejected() {
        assert!(
            parse(named(parse_quote!({
                #[created_at]
                #[updated_at]
                pub stamp: String
            })))
            .is_err()
        );
    }

    #[test]
    fn malformed_belongs_to_is_rejected() {
        assert!(parse(named(parse_quote!({ #[belongs_to] pub author_id: uuid::Uuid }))).is_err());
    }
}
