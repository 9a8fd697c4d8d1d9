// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Convenient re-exports for common usage.
//!
//! # Usage
//!
//! ```rust
//! use entity_schema_core::prelude::*;
//! ```

pub use crate::{
    Attribute, Diagnostic, Entity, EntityType, ExtraFields, FieldType, ForwardRefs, Record,
    Schema, SchemaError, SchemaVariant, SemanticType, Synthesizer, UpdateOptions,
    debug_extra_fields, register_extra_fields, strip_protected_fields, synthesize,
    synthesize_for
};
