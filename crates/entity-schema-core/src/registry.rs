// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Extra-field registry.
//!
//! Maps entity types to their extra declared fields: output-only fields that
//! are not stored (computed values such as a word count).
//!
//! The registry never keeps an entity type alive. Entries hold a
//! [`Weak`] reference and are keyed by [`EntityId`]; entries whose entity type
//! was dropped are pruned on every access. [`ExtraFieldRegistry::unregister`]
//! removes an entry explicitly.

use std::{
    collections::HashMap,
    sync::{Arc, Weak}
};

use parking_lot::Mutex;

use crate::{
    entity::{EntityId, EntityType},
    ty::FieldType
};

/// One extra declared field.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtraField {
    name: String,
    ty:   FieldType
}

impl ExtraField {
    /// Create an extra field.
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty
        }
    }

    /// Field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Semantic type.
    pub fn ty(&self) -> &FieldType {
        &self.ty
    }
}

/// Insertion-ordered map of extra fields.
///
/// Inserting an existing name replaces its type in place (last write wins).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtraFields {
    fields: Vec<ExtraField>
}

impl ExtraFields {
    /// Create an empty map.
    pub const fn new() -> Self {
        Self {
            fields: Vec::new()
        }
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.insert(name, ty);
        self
    }

    /// Insert or replace a field.
    pub fn insert(&mut self, name: impl Into<String>, ty: FieldType) {
        let name = name.into();
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(existing) => existing.ty = ty,
            None => self.fields.push(ExtraField::new(name, ty))
        }
    }

    /// Look up a field type by name.
    pub fn get(&self, name: &str) -> Option<&FieldType> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.ty)
    }

    /// Whether a field with `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, ExtraField> {
        self.fields.iter()
    }

    /// Field names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(ExtraField::name)
    }
}

impl<N: Into<String>> FromIterator<(N, FieldType)> for ExtraFields {
    fn from_iter<I: IntoIterator<Item = (N, FieldType)>>(iter: I) -> Self {
        let mut fields = Self::new();
        for (name, ty) in iter {
            fields.insert(name, ty);
        }
        fields
    }
}

impl<'a> IntoIterator for &'a ExtraFields {
    type Item = &'a ExtraField;
    type IntoIter = std::slice::Iter<'a, ExtraField>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

#[derive(Debug)]
struct RegistryEntry {
    entity: Weak<EntityType>,
    fields: ExtraFields
}

/// Weak, non-owning mapping from entity type to extra fields.
#[derive(Debug, Default)]
pub struct ExtraFieldRegistry {
    entries: Mutex<HashMap<EntityId, RegistryEntry>>
}

impl ExtraFieldRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register extra fields for `entity`, replacing any previous entry.
    pub fn register(&self, entity: &Arc<EntityType>, fields: ExtraFields) {
        let mut entries = self.entries.lock();
        prune(&mut entries);
        tracing::debug!(
            entity = entity.name(),
            fields = fields.len(),
            "registering extra fields"
        );
        entries.insert(
            entity.id(),
            RegistryEntry {
                entity: Arc::downgrade(entity),
                fields
            }
        );
    }

    /// Copy the extra fields attached at declaration into this registry.
    ///
    /// Does nothing if `entity` already has an entry here or declares no
    /// extra fields. The entity keeps its declaration, so every registry
    /// sees the same fields. Returns `true` when an entry was created.
    pub fn register_declared(&self, entity: &Arc<EntityType>) -> bool {
        let declared = entity.declared_extras();
        if declared.is_empty() {
            return false;
        }
        let mut entries = self.entries.lock();
        prune(&mut entries);
        if entries.contains_key(&entity.id()) {
            return false;
        }
        tracing::debug!(
            entity = entity.name(),
            fields = declared.len(),
            "copied declared extra fields into registry"
        );
        entries.insert(
            entity.id(),
            RegistryEntry {
                entity: Arc::downgrade(entity),
                fields: declared.clone()
            }
        );
        true
    }

    /// Extra fields of `entity`; `None` if it has no entry.
    pub fn get(&self, entity: &EntityType) -> Option<ExtraFields> {
        let mut entries = self.entries.lock();
        prune(&mut entries);
        entries.get(&entity.id()).map(|e| e.fields.clone())
    }

    /// Whether `entity` has an entry.
    pub fn contains(&self, entity: &EntityType) -> bool {
        let mut entries = self.entries.lock();
        prune(&mut entries);
        entries.contains_key(&entity.id())
    }

    /// Remove the entry of `entity`, returning its fields.
    pub fn unregister(&self, entity: &EntityType) -> Option<ExtraFields> {
        self.entries.lock().remove(&entity.id()).map(|e| e.fields)
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        let mut entries = self.entries.lock();
        prune(&mut entries);
        entries.len()
    }

    /// Whether there are no live entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn prune(entries: &mut HashMap<EntityId, RegistryEntry>) {
    entries.retain(|_, entry| entry.entity.strong_count() > 0);
}
