// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Schema synthesis.
//!
//! [`Synthesizer`] ties the pipeline together:
//!
//! ```text
//! cache lookup ─hit──────────────────────────────────────────► Arc<Schema>
//!      │miss
//!      ▼
//! collect_fields ─► policy::apply ─► resolve_fields ─► SchemaBuilder ─► cache insert
//! ```
//!
//! Each synthesizer owns its registry and cache. The crate root exposes a
//! process-wide instance through [`crate::synthesize`] and friends.

use std::sync::Arc;

use crate::{
    cache::{CacheKey, SchemaCache},
    collect::collect_fields,
    entity::{AttributeSource, DeclaredAttributes, Entity, EntityType},
    error::Result,
    policy,
    registry::{ExtraFieldRegistry, ExtraFields},
    resolve::{ForwardRefs, resolve_fields},
    schema::{Schema, SchemaBuilder, SchemaVariant}
};

/// Synthesizes and memoizes schemas.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
///
/// use entity_schema_core::{
///     Attribute, EntityType, FieldType, ForwardRefs, SchemaVariant, Synthesizer
/// };
///
/// let article = EntityType::builder("Article")
///     .attribute(Attribute::new("id", FieldType::uuid()).primary_key())
///     .attribute(Attribute::new("title", FieldType::string()))
///     .build()
///     .unwrap();
///
/// let synth = Synthesizer::new();
/// let create = synth
///     .synthesize(&article, SchemaVariant::Create, &ForwardRefs::new())
///     .unwrap();
///
/// assert_eq!(create.name(), "ArticleCreate");
/// assert_eq!(create.field_names(), ["title"]);
///
/// let again = synth
///     .synthesize(&article, SchemaVariant::Create, &ForwardRefs::new())
///     .unwrap();
/// assert!(Arc::ptr_eq(&create, &again));
/// ```
#[derive(Debug, Default)]
pub struct Synthesizer<S = DeclaredAttributes> {
    source:   S,
    registry: ExtraFieldRegistry,
    cache:    SchemaCache
}

impl Synthesizer {
    /// Create a synthesizer reading declared attributes.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: AttributeSource> Synthesizer<S> {
    /// Create a synthesizer with a custom attribute source.
    pub fn with_source(source: S) -> Self {
        Self {
            source,
            registry: ExtraFieldRegistry::new(),
            cache: SchemaCache::new()
        }
    }

    /// Register extra fields for `entity`, replacing any previous entry.
    ///
    /// Schemas already cached for `entity` are not rebuilt, so register
    /// before the first synthesis.
    pub fn register_extra_fields(&self, entity: &Arc<EntityType>, fields: ExtraFields) {
        self.registry.register(entity, fields);
    }

    /// Currently registered extra fields of `entity`; empty if none.
    ///
    /// Read-only: extra fields attached at declaration are not copied into
    /// the registry by this call.
    pub fn debug_extra_fields(&self, entity: &EntityType) -> ExtraFields {
        self.registry.get(entity).unwrap_or_default()
    }

    /// Synthesize the `variant` schema of `entity`.
    ///
    /// Repeated calls with the same entity name, variant and forward-reference
    /// names return the same `Arc`.
    ///
    /// The cache key holds the entity *name*, not its [`EntityId`](crate::EntityId):
    /// two distinct entity types declared with the same name share cached
    /// schemas in one synthesizer, and the first one synthesized wins. Give
    /// every entity type a unique name, or use a separate synthesizer.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::InvalidMetadata`](crate::SchemaError::InvalidMetadata)
    ///   if attribute metadata has the wrong type
    /// - [`SchemaError::DuplicateField`](crate::SchemaError::DuplicateField)
    ///   or [`SchemaError::EmptyFieldName`](crate::SchemaError::EmptyFieldName)
    ///   if the attribute source yields invalid names
    ///
    /// Unresolved forward references are not errors; see
    /// [`Schema::diagnostics`].
    pub fn synthesize(
        &self,
        entity: &Arc<EntityType>,
        variant: SchemaVariant,
        refs: &ForwardRefs
    ) -> Result<Arc<Schema>> {
        let key = CacheKey::new(entity.name(), variant, refs);
        self.cache
            .get_or_try_insert_with(key, || self.build(entity, variant, refs))
    }

    /// Synthesize for an [`Entity`] implementor.
    ///
    /// # Errors
    ///
    /// Same as [`synthesize`](Self::synthesize).
    pub fn synthesize_for<E: Entity>(
        &self,
        variant: SchemaVariant,
        refs: &ForwardRefs
    ) -> Result<Arc<Schema>> {
        self.synthesize(&E::entity_type(), variant, refs)
    }

    fn build(
        &self,
        entity: &Arc<EntityType>,
        variant: SchemaVariant,
        refs: &ForwardRefs
    ) -> Result<Schema> {
        let collected = collect_fields(&self.source, &self.registry, entity);
        let mut fields = policy::apply(entity.name(), &collected.fields, variant)?;
        let resolution = resolve_fields(&mut fields, refs);

        let diagnostics: Vec<_> = collected
            .diagnostics
            .into_iter()
            .chain(resolution.diagnostics)
            .collect();
        for diagnostic in &diagnostics {
            tracing::warn!(entity = entity.name(), %variant, "{diagnostic}");
        }

        let schema = SchemaBuilder::new(entity.name(), variant)
            .fields(fields)
            .diagnostics(diagnostics)
            .build()?;
        tracing::debug!(
            schema = schema.name(),
            fields = schema.fields().len(),
            rebuilt = resolution.rebuilt,
            "synthesized schema"
        );
        Ok(schema)
    }

    /// Extra-field registry.
    pub fn registry(&self) -> &ExtraFieldRegistry {
        &self.registry
    }

    /// Schema cache.
    pub fn cache(&self) -> &SchemaCache {
        &self.cache
    }
}
