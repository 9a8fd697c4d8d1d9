// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Dynamic entity records.
//!
//! A [`Record`] holds attribute values of one entity instance as JSON values
//! and tracks which of them changed. It is where the system-column guard
//! applies:
//!
//! - [`Record::apply_partial_update`] strips protected columns before it
//!   assigns anything.
//! - [`Record::flush`] stamps the modification timestamp exactly once per
//!   update of a persisted record, never on insert.
//!
//! ```rust
//! use entity_schema_core::{Attribute, EntityType, FieldType, Record, UpdateOptions, serde_json::json};
//!
//! let article = EntityType::builder("Article")
//!     .attribute(Attribute::new("id", FieldType::uuid()).primary_key())
//!     .attribute(Attribute::new("title", FieldType::string()))
//!     .attribute(Attribute::new("updated_at", FieldType::datetime()).updated_at())
//!     .build()
//!     .unwrap();
//!
//! let mut record = Record::loaded(&article, json!({"id": "a1", "title": "Old"}).as_object().unwrap().clone());
//! let payload = json!({"id": "hijack", "title": "New"});
//! record.apply_partial_update(payload.as_object().unwrap().clone(), &UpdateOptions::default());
//!
//! assert_eq!(record.get("id"), Some(&json!("a1")));
//! assert_eq!(record.get("title"), Some(&json!("New")));
//!
//! let mutation = record.flush().unwrap();
//! assert!(mutation.stamped_at.is_some());
//! ```

use std::{collections::BTreeSet, sync::Arc};

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use crate::{
    entity::EntityType,
    error::{Result, SchemaError},
    guard::{Mutable, RawFields, restamp_on_mutation, strip_protected_fields_with}
};

/// Key filters for [`Record::apply_partial_update`].
///
/// Protected columns are stripped before either filter runs, so listing one
/// in `include` has no effect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateOptions {
    /// Only these keys are applied, when set.
    pub include: Option<BTreeSet<String>>,
    /// These keys are never applied.
    pub exclude: BTreeSet<String>
}

impl UpdateOptions {
    /// Restrict the update to `keys`.
    #[must_use]
    pub fn include<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>
    {
        self.include = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    /// Skip `keys`.
    #[must_use]
    pub fn exclude<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>
    {
        self.exclude.extend(keys.into_iter().map(Into::into));
        self
    }

    fn allows(&self, key: &str) -> bool {
        !self.exclude.contains(key) && self.include.as_ref().is_none_or(|keys| keys.contains(key))
    }
}

/// Kind of write a [`Mutation`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    /// First write of a new record.
    Insert,
    /// Write to a persisted record.
    Update
}

/// Pending write produced by [`Record::flush`].
#[derive(Debug, Clone, PartialEq)]
pub struct Mutation {
    /// Insert or update.
    pub kind:       MutationKind,
    /// Changed attributes with their new values.
    pub changed:    RawFields,
    /// Timestamp stamped into the modification column, on update.
    pub stamped_at: Option<DateTime<Utc>>
}

/// Attribute values of one entity instance.
#[derive(Debug, Clone)]
pub struct Record {
    entity:    Arc<EntityType>,
    values:    RawFields,
    persisted: bool,
    dirty:     BTreeSet<String>
}

impl Record {
    /// New, not yet persisted record with attribute defaults filled in.
    pub fn new(entity: &Arc<EntityType>) -> Self {
        let values: RawFields = entity
            .attributes()
            .iter()
            .filter_map(|a| Some((a.name().to_string(), a.default_value()?.clone())))
            .collect();
        let dirty = values.keys().cloned().collect();
        Self {
            entity: Arc::clone(entity),
            values,
            persisted: false,
            dirty
        }
    }

    /// Record already present in storage, with no pending changes.
    pub fn loaded(entity: &Arc<EntityType>, values: RawFields) -> Self {
        Self {
            entity: Arc::clone(entity),
            values,
            persisted: true,
            dirty: BTreeSet::new()
        }
    }

    /// Entity type of the record.
    pub fn entity(&self) -> &Arc<EntityType> {
        &self.entity
    }

    /// Current value of `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// All current values.
    pub fn values(&self) -> &RawFields {
        &self.values
    }

    /// Assign an attribute. Assigning an unchanged value is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownAttribute`] if the entity type has no
    /// attribute called `name`.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        if self.entity.attribute(name).is_none() {
            return Err(SchemaError::UnknownAttribute {
                entity:    self.entity.name().to_string(),
                attribute: name.to_string()
            });
        }
        self.assign(name, value.into());
        Ok(())
    }

    fn assign(&mut self, name: &str, value: Value) {
        if self.values.get(name) == Some(&value) {
            return;
        }
        self.values.insert(name.to_string(), value);
        self.dirty.insert(name.to_string());
    }

    /// Apply a raw partial-update payload.
    ///
    /// Protected columns are removed first, then `options` filters the rest.
    /// Keys that name no attribute are skipped. Returns the names that were
    /// assigned.
    pub fn apply_partial_update(&mut self, fields: RawFields, options: &UpdateOptions) -> Vec<String> {
        let fields = strip_protected_fields_with(fields, &self.entity.system_columns());
        let mut applied = Vec::with_capacity(fields.len());
        for (key, value) in fields {
            if !options.allows(&key) {
                continue;
            }
            if self.entity.attribute(&key).is_none() {
                tracing::debug!(
                    entity = self.entity.name(),
                    key = key.as_str(),
                    "skipping unknown key in partial update"
                );
                continue;
            }
            self.assign(&key, value);
            applied.push(key);
        }
        applied
    }

    /// Whether there are unflushed changes.
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Names of changed attributes.
    pub fn dirty_fields(&self) -> impl Iterator<Item = &str> {
        self.dirty.iter().map(String::as_str)
    }

    /// Whether the record exists in storage.
    pub const fn is_persisted(&self) -> bool {
        self.persisted
    }

    /// Take the pending changes as a [`Mutation`].
    ///
    /// Returns `None` when nothing changed. For persisted records the
    /// modification timestamp is stamped with the current time first. After
    /// a flush the record counts as persisted and clean.
    pub fn flush(&mut self) -> Option<Mutation> {
        if !self.is_dirty() {
            return None;
        }
        let kind = if self.persisted {
            MutationKind::Update
        } else {
            MutationKind::Insert
        };
        let stamped_at = restamp_on_mutation(self);

        let changed = std::mem::take(&mut self.dirty)
            .into_iter()
            .filter_map(|name| {
                let value = self.values.get(&name)?.clone();
                Some((name, value))
            })
            .collect();
        self.persisted = true;

        tracing::debug!(entity = self.entity.name(), ?kind, "flushed record");
        Some(Mutation {
            kind,
            changed,
            stamped_at
        })
    }
}

impl Mutable for Record {
    fn is_persisted(&self) -> bool {
        self.persisted
    }

    fn set_modified_at(&mut self, now: DateTime<Utc>) -> bool {
        let column = self.entity.system_columns().updated_at;
        if self.entity.attribute(&column).is_none() {
            return false;
        }
        let stamp = Value::String(now.to_rfc3339_opts(SecondsFormat::AutoSi, true));
        self.values.insert(column.clone(), stamp);
        self.dirty.insert(column);
        true
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{attribute::Attribute, ty::FieldType};

    fn article() -> Arc<EntityType> {
        EntityType::builder("Article")
            .attribute(Attribute::new("id", FieldType::uuid()).primary_key())
            .attribute(Attribute::new("title", FieldType::string()))
            .attribute(Attribute::new("status", FieldType::string()).with_default("draft"))
            .attribute(Attribute::new("created_at", FieldType::datetime()).created_at())
            .attribute(Attribute::new("updated_at", FieldType::datetime()).updated_at())
            .build()
            .unwrap()
    }

    fn raw(value: Value) -> RawFields {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}")
        }
    }

    fn stored() -> Record {
        Record::loaded(
            &article(),
            raw(json!({
                "id": "a1",
                "title": "Old",
                "status": "draft",
                "created_at": "2024-01-01T00:00:00Z",
                "updated_at": "2024-01-01T00:00:00Z"
            }))
        )
    }

    #[test]
    fn new_record_has_defaults() {
        let record = Record::new(&article());
        assert_eq!(record.get("status"), Some(&json!("draft")));
        assert!(!record.is_persisted());
        assert_eq!(record.dirty_fields().collect::<Vec<_>>(), ["status"]);
    }

    #[test]
    fn set_unknown_attribute_fails() {
        let mut record = stored();
        assert_eq!(
            record.set("nope", 1),
            Err(SchemaError::UnknownAttribute {
                entity:    "Article".to_string(),
                attribute: "nope".to_string()
            })
        );
    }

    #[test]
    fn partial_update_strips_protected_columns() {
        let mut record = stored();
        let applied = record.apply_partial_update(
            raw(json!({
                "id": "other",
                "created_at": "1999-01-01T00:00:00Z",
                "updated_at": "2099-01-01T00:00:00Z",
                "title": "New"
            })),
            &UpdateOptions::default()
        );
        assert_eq!(applied, ["title"]);
        assert_eq!(record.get("id"), Some(&json!("a1")));
        assert_eq!(record.get("created_at"), Some(&json!("2024-01-01T00:00:00Z")));
    }

    #[test]
    fn include_cannot_reintroduce_protected_columns() {
        let mut record = stored();
        let options = UpdateOptions::default().include(["id", "title"]);
        let applied =
            record.apply_partial_update(raw(json!({"id": "other", "title": "New"})), &options);
        assert_eq!(applied, ["title"]);
        assert_eq!(record.get("id"), Some(&json!("a1")));
    }

    #[test]
    fn exclude_and_unknown_keys_are_skipped() {
        let mut record = stored();
        let options = UpdateOptions::default().exclude(["status"]);
        let applied = record.apply_partial_update(
            raw(json!({"status": "published", "bogus": 1, "title": "New"})),
            &options
        );
        assert_eq!(applied, ["title"]);
        assert_eq!(record.get("status"), Some(&json!("draft")));
    }

    #[test]
    fn update_is_restamped_once() {
        let mut record = stored();
        record.apply_partial_update(
            raw(json!({"title": "New", "updated_at": "2099-01-01T00:00:00Z"})),
            &UpdateOptions::default()
        );
        let before = Utc::now();
        let mutation = record.flush().unwrap();
        assert_eq!(mutation.kind, MutationKind::Update);
        let stamped = mutation.stamped_at.unwrap();
        assert!(stamped >= before);

        let written = mutation.changed["updated_at"].as_str().unwrap();
        let parsed = DateTime::parse_from_rfc3339(written).unwrap();
        assert_eq!(parsed.with_timezone(&Utc), stamped);
        assert!(!written.starts_with("2099"));
        assert!(!record.is_dirty());
    }

    #[test]
    fn insert_is_not_restamped() {
        let mut record = Record::new(&article());
        record.set("title", "Hello").unwrap();
        let mutation = record.flush().unwrap();
        assert_eq!(mutation.kind, MutationKind::Insert);
        assert_eq!(mutation.stamped_at, None);
        assert!(!mutation.changed.contains_key("updated_at"));
        assert!(record.is_persisted());
    }

    #[test]
    fn clean_record_flushes_nothing() {
        let mut record = stored();
        record.set("title", "Old").unwrap();
        assert!(record.flush().is_none());
    }

    #[test]
    fn entity_without_timestamp_column_is_not_stamped() {
        let tag = EntityType::builder("Tag")
            .attribute(Attribute::new("label", FieldType::string()))
            .build()
            .unwrap();
        let mut record = Record::loaded(&tag, raw(json!({"label": "a"})));
        record.set("label", "b").unwrap();
        let mutation = record.flush().unwrap();
        assert_eq!(mutation.stamped_at, None);
        assert_eq!(mutation.changed, raw(json!({"label": "b"})));
    }
}
