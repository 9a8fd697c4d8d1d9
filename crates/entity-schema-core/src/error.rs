// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Errors and diagnostics produced by schema synthesis.
//!
//! Two channels exist:
//!
//! - [`SchemaError`]: fatal. Returned as `Err` and aborts the one synthesis
//!   call. Nothing is cached.
//! - [`Diagnostic`]: non-fatal. Attached to the synthesized
//!   [`Schema`](crate::Schema) and logged at `warn` level. Whether an
//!   unresolved reference should fail is the caller's decision, see
//!   [`Schema::ensure_resolved`](crate::Schema::ensure_resolved).

use std::fmt;

use thiserror::Error;

/// Result alias for fallible synthesis operations.
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Fatal synthesis and declaration errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    /// A metadata key this system interprets holds a value of the wrong type.
    #[error(
        "invalid metadata on `{entity}.{attribute}`: `{key}` must be {expected}, found `{found}`"
    )]
    InvalidMetadata {
        /// Entity name.
        entity:    String,
        /// Attribute name.
        attribute: String,
        /// Metadata key.
        key:       String,
        /// Expected value kind.
        expected:  &'static str,
        /// The offending value.
        found:     serde_json::Value
    },

    /// Two attributes of one entity share a name.
    #[error("entity `{entity}` declares attribute `{attribute}` more than once")]
    DuplicateAttribute {
        /// Entity name.
        entity:    String,
        /// Attribute name.
        attribute: String
    },

    /// A schema was built with two fields of the same name.
    #[error("schema `{schema}` contains field `{field}` more than once")]
    DuplicateField {
        /// Schema name.
        schema: String,
        /// Field name.
        field:  String
    },

    /// A schema was built with an empty field name.
    #[error("schema `{schema}` contains a field with an empty name")]
    EmptyFieldName {
        /// Schema name.
        schema: String
    },

    /// An instance was asked to hold a value for an attribute its entity lacks.
    #[error("entity `{entity}` has no attribute `{attribute}`")]
    UnknownAttribute {
        /// Entity name.
        entity:    String,
        /// Attribute name.
        attribute: String
    },

    /// Strict-mode escalation of unresolved forward references.
    #[error("schema `{schema}` has unresolved forward references: {}", .names.join(", "))]
    UnresolvedReferences {
        /// Schema name.
        schema: String,
        /// Every placeholder name that could not be resolved.
        names:  Vec<String>
    }
}

impl SchemaError {
    /// Check if this error stems from an entity declaration mistake.
    pub const fn is_declaration(&self) -> bool {
        matches!(
            self,
            Self::InvalidMetadata { .. } | Self::DuplicateAttribute { .. }
        )
    }
}

/// Non-fatal condition found while synthesizing a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A placeholder names a type that is neither built in nor supplied.
    UnresolvedReference {
        /// Field whose type holds the placeholder.
        field:       String,
        /// The undefined name.
        name:        String,
        /// Suggested fix.
        remediation: String
    },

    /// A placeholder expression could not be parsed or applied.
    MalformedReference {
        /// Field whose type holds the placeholder.
        field:      String,
        /// The offending expression.
        expression: String,
        /// What went wrong.
        reason:     String
    },

    /// An extra field has the same name as an attribute and was dropped.
    NameCollision {
        /// Entity name.
        entity: String,
        /// Colliding field name.
        field:  String
    }
}

impl Diagnostic {
    /// Build an unresolved-reference diagnostic with the standard remediation.
    pub fn unresolved(field: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self::UnresolvedReference {
            field: field.into(),
            remediation: format!("provide `{name}` in the forward-reference namespace"),
            name
        }
    }

    /// Check if this is an unresolved forward reference.
    pub const fn is_unresolved(&self) -> bool {
        matches!(self, Self::UnresolvedReference { .. })
    }

    /// Check if this is a name collision between an extra field and an attribute.
    pub const fn is_collision(&self) -> bool {
        matches!(self, Self::NameCollision { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedReference {
                field,
                name,
                remediation
            } => write!(f, "field `{field}`: name `{name}` is not defined; {remediation}"),
            Self::MalformedReference {
                field,
                expression,
                reason
            } => write!(f, "field `{field}`: cannot resolve `{expression}`: {reason}"),
            Self::NameCollision {
                entity,
                field
            } => write!(
                f,
                "extra field `{field}` of `{entity}` collides with an attribute and was dropped"
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_metadata_display() {
        let err = SchemaError::InvalidMetadata {
            entity:    "User".to_string(),
            attribute: "email".to_string(),
            key:       "include_in_create".to_string(),
            expected:  "a boolean",
            found:     serde_json::json!("yes")
        };
        assert_eq!(
            err.to_string(),
            "invalid metadata on `User.email`: `include_in_create` must be a boolean, found `\"yes\"`"
        );
        assert!(err.is_declaration());
    }

    #[test]
    fn unresolved_references_display() {
        let err = SchemaError::UnresolvedReferences {
            schema: "CommentResponse".to_string(),
            names:  vec!["ArticleRef".to_string(), "Tag".to_string()]
        };
        assert!(err.to_string().ends_with("ArticleRef, Tag"));
        assert!(!err.is_declaration());
    }

    #[test]
    fn unresolved_diagnostic_carries_remediation() {
        let diag = Diagnostic::unresolved("text", "ArticleRef");
        assert!(diag.is_unresolved());
        assert!(!diag.is_collision());
        match &diag {
            Diagnostic::UnresolvedReference {
                remediation, ..
            } => assert_eq!(
                remediation,
                "provide `ArticleRef` in the forward-reference namespace"
            ),
            _ => unreachable!()
        }
        assert!(diag.to_string().contains("name `ArticleRef` is not defined"));
    }
}
