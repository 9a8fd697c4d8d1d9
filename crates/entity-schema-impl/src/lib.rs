// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Internal proc-macro implementation for entity-schema.
//!
//! Use the `entity-schema` crate instead; it re-exports [`Entity`](macro@Entity)
//! together with the runtime the generated code refers to.
//!
//! # Attribute Quick Reference
//!
//! ## Entity-Level
//!
//! ```rust,ignore
//! #[derive(Entity)]
//! #[entity(name = "Article")]              // Optional: entity type name (default: struct name)
//! #[extra(word_count: i64)]                // Output-only field, Rust type
//! #[extra(related: "List['ArticleRef']")]  // Output-only field, forward placeholder
//! pub struct Article { /* ... */ }
//! ```
//!
//! ## Field-Level
//!
//! ```rust,ignore
//! pub struct Article {
//!     #[id]                                // Primary key: response only
//!     pub id: Uuid,
//!
//!     /// Headline.                        // Doc comment becomes the description
//!     pub title: String,
//!
//!     pub body: Option<String>,            // Option<T>: nullable
//!
//!     #[field(default = "draft")]          // Defaulted: optional on create
//!     pub status: String,
//!
//!     #[field(update = false)]             // Never updatable
//!     pub slug: String,
//!
//!     #[field(skip)]                       // In no schema at all
//!     pub password_hash: String,
//!
//!     #[field(ty = "AuthorRef")]           // Forward placeholder instead of the Rust type
//!     #[belongs_to(Author)]                // Foreign reference
//!     pub author_id: Uuid,
//!
//!     #[created_at]                        // Creation timestamp: response only
//!     pub created_at: DateTime<Utc>,
//!
//!     #[updated_at]                        // Modification timestamp: response only, restamped
//!     pub updated_at: DateTime<Utc>,
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_docs,
    rustdoc::missing_crate_level_docs,
    rustdoc::broken_intra_doc_links,
    rust_2018_idioms
)]
#![deny(unsafe_code)]

mod entity;
mod utils;

use proc_macro::TokenStream;

/// Derive macro declaring an entity type from a struct definition.
///
/// # Overview
///
/// Implements `entity_schema::Entity` for the struct. Its
/// `entity_type()` builds the `EntityType` once, on first call, from the
/// struct's fields and `#[extra]` declarations, and returns the same
/// `Arc` afterwards. Create, update and response schemas are then
/// synthesized at runtime with `entity_schema::synthesize`.
///
/// # Entity Attributes
///
/// | Attribute | Required | Default | Description |
/// |-----------|----------|---------|-------------|
/// | `#[entity(name = "...")]` | No | struct name | Entity type name; schemas are named `{name}Create` etc. |
/// | `#[extra(name: Type, ...)]` | No | none | Output-only fields; a string literal type is a forward placeholder |
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `#[id]` | Primary key. Excluded from create/update, required in response. |
/// | `#[created_at]` | Creation timestamp. Excluded from create/update, required in response. |
/// | `#[updated_at]` | Modification timestamp. Excluded from create/update, required in response, restamped on every update. |
/// | `#[belongs_to(Entity)]` | Foreign reference to `Entity`. Same inclusion rules as ordinary fields. |
/// | `#[field(skip)]` | Excluded from every schema. |
/// | `#[field(create = false)]` | Excluded from the create schema (`update`, `response` likewise). |
/// | `#[field(description = "...")]` | Field description; defaults to the doc comment. |
/// | `#[field(default = <literal>)]` | Default value; the field becomes optional on create. |
/// | `#[field(ty = "...")]` | Forward placeholder replacing the Rust type. |
///
/// `Option<T>` fields are nullable: optional on create and response.
///
/// # Examples
///
/// ```rust,ignore
/// use entity_schema::{Entity, ForwardRefs, SchemaVariant, synthesize_for};
/// use uuid::Uuid;
///
/// #[derive(Entity)]
/// #[extra(word_count: i64)]
/// pub struct Article {
///     #[id]
///     pub id: Uuid,
///     pub title: String,
///     #[belongs_to(Author)]
///     pub author_id: Uuid,
/// }
///
/// let create = synthesize_for::<Article>(SchemaVariant::Create, &ForwardRefs::new())?;
/// assert_eq!(create.field_names(), ["title", "author_id"]);
/// ```
///
/// # Compile-Time Errors
///
/// - Enums, unions, tuple and unit structs
/// - Generic structs
/// - Two fields with the same role marker
/// - Two `#[extra]` fields with the same name
/// - Unknown `#[field]` options or values of the wrong kind
#[proc_macro_derive(
    Entity,
    attributes(entity, extra, field, id, created_at, updated_at, belongs_to)
)]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    entity::derive(input)
}
