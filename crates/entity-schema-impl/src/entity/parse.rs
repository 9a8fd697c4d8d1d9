// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Attribute parsing for `#[derive(Entity)]`.
//!
//! # Architecture
//!
//! ```text
//! parse.rs
//! ├── entity.rs  - EntityDef: #[entity(...)] via darling, validation
//! ├── extra.rs   - #[extra(name: Type, ...)] declarations
//! └── field/     - FieldDef: #[field(...)], role markers, #[belongs_to]
//! ```

mod entity;
mod extra;
mod field;

pub use entity::EntityDef;
pub use extra::{ExtraDef, ExtraType};
pub use field::{FieldDef, Role};
