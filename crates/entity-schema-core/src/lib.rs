// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Runtime schema synthesis for entity-schema.
//!
//! Derives three output schemas from one entity definition:
//!
//! | Variant | Purpose | System columns | Extra fields |
//! |---------|---------|----------------|--------------|
//! | `Create` | client input for inserts | excluded | excluded |
//! | `Update` | partial client input, every field optional | excluded | excluded |
//! | `Response` | server output | required | required |
//!
//! # Overview
//!
//! - [`EntityType`] / [`Attribute`]: the declared entity
//! - [`ExtraFieldRegistry`]: output-only fields, held without keeping the
//!   entity alive
//! - [`collect_fields`] and [`policy`]: which fields enter which variant
//! - [`resolve`]: forward-reference placeholders such as `List['ArticleRef']`
//! - [`SchemaCache`]: one `Arc<Schema>` per entity, variant and namespace
//! - [`guard`] and [`Record`]: system columns stay out of client updates and
//!   the modification timestamp is always server-stamped
//! - [`prelude`]: convenient re-exports
//!
//! # Usage
//!
//! Most users should use `entity-schema` directly, which re-exports this crate
//! together with `#[derive(Entity)]`. Without the derive:
//!
//! ```rust
//! use entity_schema_core::prelude::*;
//!
//! let article = EntityType::builder("Article")
//!     .attribute(Attribute::new("id", FieldType::uuid()).primary_key())
//!     .attribute(Attribute::new("title", FieldType::string()))
//!     .attribute(Attribute::new("body", FieldType::string()).nullable())
//!     .extra_field("word_count", FieldType::integer())
//!     .build()
//!     .unwrap();
//!
//! let response = synthesize(&article, SchemaVariant::Response, &ForwardRefs::new()).unwrap();
//! assert_eq!(response.field_names(), ["id", "title", "body", "word_count"]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod attribute;
pub mod cache;
pub mod collect;
pub mod entity;
pub mod error;
pub mod guard;
pub mod policy;
pub mod prelude;
pub mod record;
pub mod registry;
pub mod resolve;
pub mod schema;
pub mod synth;
pub mod ty;

use std::sync::{Arc, LazyLock};

pub use crate::{
    attribute::{Attribute, Metadata, SystemRole},
    cache::{CacheKey, CacheStats, SchemaCache},
    collect::{CollectedFields, Field, collect_fields},
    entity::{AttributeSource, DeclaredAttributes, Entity, EntityId, EntityType, EntityTypeBuilder},
    error::{Diagnostic, Result, SchemaError},
    guard::{
        Mutable, RawFields, SystemColumns, restamp_on_mutation, strip_protected_fields,
        strip_protected_fields_with
    },
    record::{Mutation, MutationKind, Record, UpdateOptions},
    registry::{ExtraField, ExtraFieldRegistry, ExtraFields},
    resolve::{ForwardRefs, Resolution, needs_rebuild, resolve_fields},
    schema::{FieldSource, Schema, SchemaBuilder, SchemaField, SchemaVariant},
    synth::Synthesizer,
    ty::{FieldType, Scalar, SemanticType}
};

/// Re-export serde_json for generated code.
pub use serde_json;

static GLOBAL: LazyLock<Synthesizer> = LazyLock::new(Synthesizer::new);

/// Process-wide synthesizer used by the free functions below.
pub fn global() -> &'static Synthesizer {
    &GLOBAL
}

/// Synthesize with the process-wide synthesizer.
///
/// # Errors
///
/// See [`Synthesizer::synthesize`].
pub fn synthesize(
    entity: &Arc<EntityType>,
    variant: SchemaVariant,
    refs: &ForwardRefs
) -> Result<Arc<Schema>> {
    GLOBAL.synthesize(entity, variant, refs)
}

/// Synthesize for an [`Entity`] implementor with the process-wide synthesizer.
///
/// # Errors
///
/// See [`Synthesizer::synthesize`].
pub fn synthesize_for<E: Entity>(variant: SchemaVariant, refs: &ForwardRefs) -> Result<Arc<Schema>> {
    GLOBAL.synthesize_for::<E>(variant, refs)
}

/// Register extra fields in the process-wide registry.
pub fn register_extra_fields(entity: &Arc<EntityType>, fields: ExtraFields) {
    GLOBAL.register_extra_fields(entity, fields);
}

/// Extra fields registered in the process-wide registry; empty if none.
pub fn debug_extra_fields(entity: &EntityType) -> ExtraFields {
    GLOBAL.debug_extra_fields(entity)
}
