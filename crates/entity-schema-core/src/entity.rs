// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entity types and the attribute source seam.
//!
//! An [`EntityType`] is declared once, at program load, and shared as
//! `Arc<EntityType>`. It owns its attributes and the extra fields attached
//! at declaration time; every registry copies the latter on first use.
//!
//! # Declaring
//!
//! ```rust
//! use entity_schema_core::{Attribute, EntityType, FieldType};
//!
//! let article = EntityType::builder("Article")
//!     .attribute(Attribute::new("id", FieldType::uuid()).primary_key())
//!     .attribute(Attribute::new("title", FieldType::string()))
//!     .extra_field("word_count", FieldType::integer())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(article.name(), "Article");
//! assert_eq!(article.attributes().len(), 2);
//! ```
//!
//! Most code declares entities with `#[derive(Entity)]` instead, which
//! implements [`Entity`] and builds the same structure.

use std::{
    borrow::Cow,
    collections::HashSet,
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering}
    }
};

use crate::{
    attribute::{Attribute, SystemRole},
    error::{Result, SchemaError},
    guard::SystemColumns,
    registry::ExtraFields,
    ty::FieldType
};

static NEXT_ENTITY_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique entity type identifier.
///
/// Never reused, so a registry entry can never be mistaken for one that
/// belonged to a dropped entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

impl EntityId {
    fn next() -> Self {
        Self(NEXT_ENTITY_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw identifier value.
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A declared data-model type.
#[derive(Debug)]
pub struct EntityType {
    id:              EntityId,
    name:            String,
    attributes:      Vec<Attribute>,
    declared_extras: ExtraFields
}

impl EntityType {
    /// Start declaring an entity type.
    pub fn builder(name: impl Into<String>) -> EntityTypeBuilder {
        EntityTypeBuilder {
            name:       name.into(),
            attributes: Vec::new(),
            extras:     ExtraFields::new()
        }
    }

    /// Unique identifier.
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Entity name, used as schema name prefix.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared attributes in declaration order.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Find an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name() == name)
    }

    /// Find the attribute holding a system role.
    pub fn role_attribute(&self, role: SystemRole) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|a| a.system_role() == Some(role))
    }

    /// Protected column names for this entity.
    ///
    /// Roles the entity does not declare keep their conventional names.
    pub fn system_columns(&self) -> SystemColumns {
        let column = |role: SystemRole| {
            self.role_attribute(role)
                .map_or_else(|| role.default_column().to_string(), |a| a.name().to_string())
        };
        SystemColumns {
            primary_key: column(SystemRole::PrimaryKey),
            created_at:  column(SystemRole::CreatedAt),
            updated_at:  column(SystemRole::UpdatedAt)
        }
    }

    /// Extra fields attached at declaration; empty if none.
    ///
    /// Never consumed: each registry copies them on its first lookup.
    pub fn declared_extras(&self) -> &ExtraFields {
        &self.declared_extras
    }
}

/// Builder for [`EntityType`].
#[derive(Debug)]
pub struct EntityTypeBuilder {
    name:       String,
    attributes: Vec<Attribute>,
    extras:     ExtraFields
}

impl EntityTypeBuilder {
    /// Append an attribute.
    #[must_use]
    pub fn attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Attach an extra declared field. Re-declaring a name replaces it.
    #[must_use]
    pub fn extra_field(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.extras.insert(name, ty);
        self
    }

    /// Finish the declaration.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateAttribute`] if two attributes share a
    /// name.
    pub fn build(self) -> Result<Arc<EntityType>> {
        let mut seen = HashSet::with_capacity(self.attributes.len());
        for attribute in &self.attributes {
            if !seen.insert(attribute.name()) {
                return Err(SchemaError::DuplicateAttribute {
                    entity:    self.name,
                    attribute: attribute.name().to_string()
                });
            }
        }

        Ok(Arc::new(EntityType {
            id: EntityId::next(),
            name: self.name,
            attributes: self.attributes,
            declared_extras: self.extras
        }))
    }
}

/// Rust types that declare an entity type.
///
/// Implemented by `#[derive(Entity)]`. The returned `Arc` is created once
/// and shared for the life of the process.
pub trait Entity {
    /// The entity type declared by this Rust type.
    fn entity_type() -> Arc<EntityType>;
}

/// Supplies storage attributes per entity type.
///
/// Must return the same list on every call within a process run.
pub trait AttributeSource {
    /// Ordered storage attributes of `entity`.
    fn list_attributes<'e>(&self, entity: &'e EntityType) -> Cow<'e, [Attribute]>;
}

/// [`AttributeSource`] returning the attributes an entity was declared with.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredAttributes;

impl AttributeSource for DeclaredAttributes {
    fn list_attributes<'e>(&self, entity: &'e EntityType) -> Cow<'e, [Attribute]> {
        Cow::Borrowed(entity.attributes())
    }
}
