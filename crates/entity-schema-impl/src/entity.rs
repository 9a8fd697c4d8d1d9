// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entity derive macro implementation.
//!
//! # Architecture
//!
//! ```text
//! entity.rs (orchestrator)
//! │
//! ├── parse/      → Attribute parsing (EntityDef, FieldDef, ExtraDef)
//! └── declare.rs  → impl Entity with a lazily built EntityType
//! ```
//!
//! # Generated Code
//!
//! For an entity like:
//!
//! ```rust,ignore
//! #[derive(Entity)]
//! #[extra(word_count: i64)]
//! pub struct Article {
//!     #[id]
//!     pub id: Uuid,
//!     pub title: String,
//! }
//! ```
//!
//! the macro generates `impl entity_schema::Entity for Article`, whose
//! `entity_type()` returns the same `Arc<EntityType>` on every call. The
//! struct itself is left untouched; schemas are synthesized at runtime.

mod declare;
pub mod parse;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

use self::parse::EntityDef;

/// Main entry point for the Entity derive macro.
pub fn derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match EntityDef::from_derive_input(&input) {
        Ok(entity) => declare::generate(&entity).into(),
        Err(err) => err.write_errors().into()
    }
}
