// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Storage attributes and their metadata.
//!
//! An [`Attribute`] is one storage column of an entity type. Besides its
//! semantic type it carries nullability, an optional default, an open
//! metadata bag, an optional [`SystemRole`] and an optional relation target.
//!
//! # Example
//!
//! ```rust
//! use entity_schema_core::{Attribute, FieldType};
//!
//! let id = Attribute::new("id", FieldType::uuid()).primary_key();
//! let author = Attribute::new("author_id", FieldType::uuid()).belongs_to("Author");
//! let hash = Attribute::new("password_hash", FieldType::string())
//!     .meta("include_in_response", false);
//!
//! assert!(id.is_system());
//! assert!(author.is_relation());
//! assert_eq!(hash.metadata()["include_in_response"], false);
//! ```

use std::collections::BTreeMap;

use serde_json::Value;

use crate::ty::FieldType;

/// Open key/value metadata attached to an attribute.
pub type Metadata = BTreeMap<String, Value>;

/// Metadata keys interpreted by the inclusion policy.
pub mod keys {
    /// Boolean: force inclusion in or exclusion from the create schema.
    pub const INCLUDE_IN_CREATE: &str = "include_in_create";
    /// Boolean: force inclusion in or exclusion from the update schema.
    pub const INCLUDE_IN_UPDATE: &str = "include_in_update";
    /// Boolean: force inclusion in or exclusion from the response schema.
    pub const INCLUDE_IN_RESPONSE: &str = "include_in_response";
    /// String: human readable field description.
    pub const DESCRIPTION: &str = "description";
}

/// Auto-managed attribute roles.
///
/// Attributes with a role are never accepted from clients: they are absent
/// from create and update schemas and always present in the response schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemRole {
    /// Primary key.
    PrimaryKey,
    /// Creation timestamp.
    CreatedAt,
    /// Modification timestamp, re-stamped on every persisted mutation.
    UpdatedAt
}

impl SystemRole {
    /// Conventional column name for this role.
    pub const fn default_column(&self) -> &'static str {
        match self {
            Self::PrimaryKey => "id",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at"
        }
    }
}

/// A storage attribute of an entity type.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    name:     String,
    ty:       FieldType,
    nullable: bool,
    default:  Option<Value>,
    metadata: Metadata,
    role:     Option<SystemRole>,
    relation: Option<String>
}

impl Attribute {
    /// Create a non-nullable attribute without default or metadata.
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
            nullable: false,
            default: None,
            metadata: Metadata::new(),
            role: None,
            relation: None
        }
    }

    /// Mark the attribute as nullable.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Set a default value.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Set a metadata entry, replacing any previous value for `key`.
    #[must_use]
    pub fn meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Set the `description` metadata entry.
    #[must_use]
    pub fn description(self, text: impl Into<String>) -> Self {
        self.meta(keys::DESCRIPTION, text.into())
    }

    /// Exclude from every schema variant the metadata can control.
    #[must_use]
    pub fn skip(self) -> Self {
        self.meta(keys::INCLUDE_IN_CREATE, false)
            .meta(keys::INCLUDE_IN_UPDATE, false)
            .meta(keys::INCLUDE_IN_RESPONSE, false)
    }

    /// Assign a system role.
    #[must_use]
    pub fn role(mut self, role: SystemRole) -> Self {
        self.role = Some(role);
        self
    }

    /// Mark as the primary key.
    #[must_use]
    pub fn primary_key(self) -> Self {
        self.role(SystemRole::PrimaryKey)
    }

    /// Mark as the creation timestamp.
    #[must_use]
    pub fn created_at(self) -> Self {
        self.role(SystemRole::CreatedAt)
    }

    /// Mark as the modification timestamp.
    #[must_use]
    pub fn updated_at(self) -> Self {
        self.role(SystemRole::UpdatedAt)
    }

    /// Mark as a foreign reference to `target`.
    #[must_use]
    pub fn belongs_to(mut self, target: impl Into<String>) -> Self {
        self.relation = Some(target.into());
        self
    }

    /// Attribute name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Semantic type.
    pub fn ty(&self) -> &FieldType {
        &self.ty
    }

    /// Whether `NULL` is a valid stored value.
    pub const fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Default value, if any.
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Whether a default value is declared.
    pub const fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Metadata bag.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// System role, if any.
    pub const fn system_role(&self) -> Option<SystemRole> {
        self.role
    }

    /// Whether this is an auto-managed system attribute.
    pub const fn is_system(&self) -> bool {
        self.role.is_some()
    }

    /// Relation target, if this is a foreign reference.
    pub fn relation(&self) -> Option<&str> {
        self.relation.as_deref()
    }

    /// Whether this is a foreign reference.
    pub const fn is_relation(&self) -> bool {
        self.relation.is_some()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn new_attribute_is_plain() {
        let attr = Attribute::new("title", FieldType::string());
        assert_eq!(attr.name(), "title");
        assert!(!attr.is_nullable());
        assert!(!attr.has_default());
        assert!(!attr.is_system());
        assert!(!attr.is_relation());
        assert!(attr.metadata().is_empty());
    }

    #[test]
    fn builder_sets_all_parts() {
        let attr = Attribute::new("status", FieldType::string())
            .nullable()
            .with_default("draft")
            .description("Publication status")
            .belongs_to("Status");
        assert!(attr.is_nullable());
        assert_eq!(attr.default_value(), Some(&json!("draft")));
        assert_eq!(attr.metadata()[keys::DESCRIPTION], json!("Publication status"));
        assert_eq!(attr.relation(), Some("Status"));
    }

    #[test]
    fn skip_disables_every_variant() {
        let attr = Attribute::new("password_hash", FieldType::string()).skip();
        for key in [
            keys::INCLUDE_IN_CREATE,
            keys::INCLUDE_IN_UPDATE,
            keys::INCLUDE_IN_RESPONSE
        ] {
            assert_eq!(attr.metadata()[key], json!(false));
        }
    }

    #[test]
    fn roles_and_default_columns() {
        assert_eq!(
            Attribute::new("id", FieldType::uuid()).primary_key().system_role(),
            Some(SystemRole::PrimaryKey)
        );
        assert_eq!(SystemRole::CreatedAt.default_column(), "created_at");
        assert_eq!(SystemRole::UpdatedAt.default_column(), "updated_at");
    }
}
