// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

//! # entity-schema
//!
//! One crate, all features. Re-exports:
//! - [`Entity`](macro@Entity) derive macro from `entity-schema-impl`
//! - All types from `entity-schema-core` ([`EntityType`], [`Schema`],
//!   [`Synthesizer`], [`Record`], ...)
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use entity_schema::{Entity, ForwardRefs, SchemaVariant, synthesize_for};
//!
//! #[derive(Entity)]
//! #[extra(word_count: i64)]
//! pub struct Article {
//!     #[id]
//!     pub id: Uuid,
//!     pub title: String,
//!     #[belongs_to(Author)]
//!     pub author_id: Uuid,
//!     #[created_at]
//!     pub created_at: DateTime<Utc>,
//!     #[updated_at]
//!     pub updated_at: DateTime<Utc>,
//! }
//!
//! let create = synthesize_for::<Article>(SchemaVariant::Create, &ForwardRefs::new())?;
//! assert_eq!(create.field_names(), ["title", "author_id"]);
//! ```

pub use entity_schema_core::*;
#[cfg(feature = "derive")]
pub use entity_schema_impl::Entity;
