// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Synthesized schemas.
//!
//! A [`Schema`] is the derived output type for one entity and one
//! [`SchemaVariant`]: an ordered list of fields, each with a semantic type
//! and a required flag, named `"{Entity}{Variant}"`.
//!
//! Schemas are immutable. They are built once through [`SchemaBuilder`],
//! which validates field names, and then shared as `Arc<Schema>` from the
//! [cache](crate::cache).
//!
//! # Variants
//!
//! | Variant | Purpose | Name |
//! |---------|---------|------|
//! | `Create` | Input for creating an entity | `ArticleCreate` |
//! | `Update` | Partial update input, every field optional | `ArticleUpdate` |
//! | `Response` | Output returned to clients | `ArticleResponse` |

use std::{collections::HashSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Diagnostic, Result, SchemaError},
    ty::FieldType
};

/// Purpose of a synthesized schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVariant {
    /// Input for creating a new entity.
    Create,
    /// Input for a partial update.
    Update,
    /// Output returned to clients.
    Response
}

impl SchemaVariant {
    /// All variants.
    pub const ALL: [Self; 3] = [Self::Create, Self::Update, Self::Response];

    /// Lowercase name, used in cache keys.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Response => "response"
        }
    }

    /// Suffix appended to the entity name to form the schema name.
    pub const fn suffix(&self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Update => "Update",
            Self::Response => "Response"
        }
    }

    /// Check if this variant describes client input.
    pub const fn is_input(&self) -> bool {
        !matches!(self, Self::Response)
    }
}

impl fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaVariant {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "response" => Ok(Self::Response),
            other => Err(format!("unknown schema variant `{other}`"))
        }
    }
}

/// Where a schema field came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldSource {
    /// A storage attribute.
    Attribute,
    /// An extra declared field.
    Extra
}

/// One field of a synthesized schema.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaField {
    name:        String,
    ty:          FieldType,
    required:    bool,
    description: Option<String>,
    source:      FieldSource
}

impl SchemaField {
    /// Create a field that originates from a storage attribute.
    pub fn new(name: impl Into<String>, ty: FieldType, required: bool) -> Self {
        Self {
            name: name.into(),
            ty,
            required,
            description: None,
            source: FieldSource::Attribute
        }
    }

    /// Attach a description.
    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Set the origin of the field.
    #[must_use]
    pub fn with_source(mut self, source: FieldSource) -> Self {
        self.source = source;
        self
    }

    /// Field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Semantic type.
    pub fn ty(&self) -> &FieldType {
        &self.ty
    }

    pub(crate) fn ty_mut(&mut self) -> &mut FieldType {
        &mut self.ty
    }

    /// Whether clients must provide (or will always receive) this field.
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Description from the `description` metadata, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Origin of the field.
    pub const fn source(&self) -> FieldSource {
        self.source
    }
}

/// A synthesized output type definition.
#[derive(Debug, PartialEq)]
pub struct Schema {
    name:        String,
    entity:      String,
    variant:     SchemaVariant,
    fields:      Vec<SchemaField>,
    diagnostics: Vec<Diagnostic>
}

impl Schema {
    /// Generated name, e.g. `ArticleResponse`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the entity this schema was derived from.
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Variant this schema was synthesized for.
    pub const fn variant(&self) -> SchemaVariant {
        self.variant
    }

    /// Fields in order.
    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    /// Find a field by name.
    pub fn field(&self, name: &str) -> Option<&SchemaField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether a field with `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Field names in order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(SchemaField::name).collect()
    }

    /// Non-fatal conditions found during synthesis.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Every placeholder name that could not be resolved, without duplicates.
    pub fn unresolved_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for diagnostic in &self.diagnostics {
            if let Diagnostic::UnresolvedReference {
                name, ..
            } = diagnostic
                && !names.contains(&name.as_str())
            {
                names.push(name);
            }
        }
        names
    }

    /// Whether every field type is free of placeholders.
    pub fn is_fully_resolved(&self) -> bool {
        !self.fields.iter().any(|f| f.ty.has_forward())
    }

    /// Escalate unresolved references to an error.
    ///
    /// Synthesis itself never fails on unresolved references; callers with a
    /// strict policy call this on the returned schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnresolvedReferences`] naming every unresolved
    /// placeholder.
    pub fn ensure_resolved(&self) -> Result<()> {
        let names = self.unresolved_names();
        if names.is_empty() && self.is_fully_resolved() {
            return Ok(());
        }
        Err(SchemaError::UnresolvedReferences {
            schema: self.name.clone(),
            names:  names.into_iter().map(str::to_string).collect()
        })
    }
}

/// Builder producing a validated [`Schema`].
///
/// # Example
///
/// ```rust
/// use entity_schema_core::{FieldType, SchemaBuilder, SchemaVariant};
///
/// let schema = SchemaBuilder::new("Article", SchemaVariant::Create)
///     .field("title", FieldType::string(), true)
///     .field("subtitle", FieldType::string(), false)
///     .build()
///     .unwrap();
///
/// assert_eq!(schema.name(), "ArticleCreate");
/// assert_eq!(schema.field_names(), ["title", "subtitle"]);
/// ```
#[derive(Debug)]
pub struct SchemaBuilder {
    entity:      String,
    variant:     SchemaVariant,
    fields:      Vec<SchemaField>,
    diagnostics: Vec<Diagnostic>
}

impl SchemaBuilder {
    /// Start a schema for `entity` and `variant`.
    pub fn new(entity: impl Into<String>, variant: SchemaVariant) -> Self {
        Self {
            entity: entity.into(),
            variant,
            fields: Vec::new(),
            diagnostics: Vec::new()
        }
    }

    /// Append a `(name, type, required)` field.
    #[must_use]
    pub fn field(self, name: impl Into<String>, ty: FieldType, required: bool) -> Self {
        self.push(SchemaField::new(name, ty, required))
    }

    /// Append a prepared field.
    #[must_use]
    pub fn push(mut self, field: SchemaField) -> Self {
        self.fields.push(field);
        self
    }

    /// Append prepared fields.
    #[must_use]
    pub fn fields(mut self, fields: impl IntoIterator<Item = SchemaField>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Attach diagnostics.
    #[must_use]
    pub fn diagnostics(mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) -> Self {
        self.diagnostics.extend(diagnostics);
        self
    }

    /// Validate and produce the schema.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::EmptyFieldName`] if a field name is empty
    /// - [`SchemaError::DuplicateField`] if two fields share a name
    pub fn build(self) -> Result<Schema> {
        let name = format!("{}{}", self.entity, self.variant.suffix());

        let mut seen = HashSet::with_capacity(self.fields.len());
        for field in &self.fields {
            if field.name.is_empty() {
                return Err(SchemaError::EmptyFieldName {
                    schema: name
                });
            }
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    schema: name,
                    field:  field.name.clone()
                });
            }
        }

        Ok(Schema {
            name,
            entity: self.entity,
            variant: self.variant,
            fields: self.fields,
            diagnostics: self.diagnostics
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_names() {
        assert_eq!(SchemaVariant::Create.as_str(), "create");
        assert_eq!(SchemaVariant::Update.suffix(), "Update");
        assert_eq!(SchemaVariant::Response.to_string(), "response");
        assert!(SchemaVariant::Create.is_input());
        assert!(!SchemaVariant::Response.is_input());
    }

    #[test]
    fn variant_from_str() {
        for variant in SchemaVariant::ALL {
            assert_eq!(variant.as_str().parse::<SchemaVariant>(), Ok(variant));
        }
        assert!("patch".parse::<SchemaVariant>().is_err());
    }

    #[test]
    fn variant_serde_is_lowercase() {
        let json = serde_json::to_string(&SchemaVariant::Response).unwrap();
        assert_eq!(json, "\"response\"");
        let parsed: SchemaVariant = serde_json::from_str("\"update\"").unwrap();
        assert_eq!(parsed, SchemaVariant::Update);
    }

    #[test]
    fn builder_rejects_duplicate_fields() {
        let err = SchemaBuilder::new("Article", SchemaVariant::Response)
            .field("title", FieldType::string(), true)
            .field("title", FieldType::string(), false)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateField {
                schema: "ArticleResponse".to_string(),
                field:  "title".to_string()
            }
        );
    }

    #[test]
    fn builder_rejects_empty_names() {
        let err = SchemaBuilder::new("Article", SchemaVariant::Update)
            .field("", FieldType::string(), false)
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::EmptyFieldName { .. }));
    }

    #[test]
    fn unresolved_names_are_deduplicated() {
        let schema = SchemaBuilder::new("Comment", SchemaVariant::Response)
            .field("a", FieldType::forward("ArticleRef"), true)
            .field("b", FieldType::forward("List[ArticleRef]"), true)
            .diagnostics([
                Diagnostic::unresolved("a", "ArticleRef"),
                Diagnostic::unresolved("b", "ArticleRef")
            ])
            .build()
            .unwrap();
        assert_eq!(schema.unresolved_names(), ["ArticleRef"]);
        assert!(!schema.is_fully_resolved());
        assert!(matches!(
            schema.ensure_resolved(),
            Err(SchemaError::UnresolvedReferences { .. })
        ));
    }

    #[test]
    fn resolved_schema_passes_strict_check() {
        let schema = SchemaBuilder::new("Tag", SchemaVariant::Response)
            .field("label", FieldType::string(), true)
            .build()
            .unwrap();
        assert!(schema.ensure_resolved().is_ok());
        assert!(schema.diagnostics().is_empty());
    }
}
