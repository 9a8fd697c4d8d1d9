// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! System-column guard.
//!
//! Two rules keep system-managed columns out of client hands:
//!
//! - [`strip_protected_fields`] removes the primary key and both timestamps
//!   from a raw partial-update payload before it is applied.
//! - [`restamp_on_mutation`] overwrites the modification timestamp of an
//!   already persisted record with the current time, whatever value the
//!   payload or the caller put there.
//!
//! ```rust
//! use entity_schema_core::{guard::strip_protected_fields, serde_json::json};
//!
//! let payload = json!({"id": 7, "title": "Draft", "updated_at": "2099-01-01T00:00:00Z"});
//! let stripped = strip_protected_fields(payload.as_object().unwrap().clone());
//!
//! assert_eq!(stripped.len(), 1);
//! assert!(stripped.contains_key("title"));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Raw key-value payload of a partial update.
pub type RawFields = Map<String, Value>;

/// Names of the protected system columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemColumns {
    /// Primary key column.
    pub primary_key: String,
    /// Creation timestamp column.
    pub created_at:  String,
    /// Modification timestamp column.
    pub updated_at:  String
}

impl Default for SystemColumns {
    fn default() -> Self {
        Self {
            primary_key: "id".to_string(),
            created_at:  "created_at".to_string(),
            updated_at:  "updated_at".to_string()
        }
    }
}

impl SystemColumns {
    /// The three column names.
    pub fn names(&self) -> [&str; 3] {
        [
            self.primary_key.as_str(),
            self.created_at.as_str(),
            self.updated_at.as_str()
        ]
    }

    /// Whether `name` is a protected column.
    pub fn contains(&self, name: &str) -> bool {
        self.names().contains(&name)
    }
}

/// Remove `id`, `created_at` and `updated_at` from `fields`.
///
/// Every other key is kept as it is.
pub fn strip_protected_fields(fields: RawFields) -> RawFields {
    strip_protected_fields_with(fields, &SystemColumns::default())
}

/// Remove the columns named in `columns` from `fields`.
///
/// There is no include list here: [`Record::apply_partial_update`] strips
/// first and filters with [`UpdateOptions`] afterwards, so including a
/// protected column has no effect.
///
/// [`Record::apply_partial_update`]: crate::Record::apply_partial_update
/// [`UpdateOptions`]: crate::UpdateOptions
pub fn strip_protected_fields_with(mut fields: RawFields, columns: &SystemColumns) -> RawFields {
    for name in columns.names() {
        if fields.remove(name).is_some() {
            tracing::debug!(column = name, "stripped protected column from update");
        }
    }
    fields
}

/// A record whose modification timestamp is maintained automatically.
pub trait Mutable {
    /// Whether the record already exists in storage.
    fn is_persisted(&self) -> bool;

    /// Set the modification timestamp. Returns `false` if the record has no
    /// such column.
    fn set_modified_at(&mut self, now: DateTime<Utc>) -> bool;
}

/// Stamp the current time on a persisted record about to be updated.
///
/// Returns the stamped time, or `None` for records that are not persisted
/// yet (inserts keep their creation-time value) or lack the column.
pub fn restamp_on_mutation<M>(record: &mut M) -> Option<DateTime<Utc>>
where
    M: Mutable + ?Sized
{
    if !record.is_persisted() {
        return None;
    }
    let now = Utc::now();
    record.set_modified_at(now).then_some(now)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn raw(value: Value) -> RawFields {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}")
        }
    }

    #[test]
    fn strips_only_system_columns() {
        let fields = raw(json!({
            "id": 1,
            "title": "New",
            "created_at": "2020-01-01T00:00:00Z",
            "updated_at": "2099-01-01T00:00:00Z",
            "body": null
        }));
        let stripped = strip_protected_fields(fields);
        assert_eq!(stripped, raw(json!({"title": "New", "body": null})));
    }

    #[test]
    fn empty_and_untouched_payloads() {
        assert!(strip_protected_fields(RawFields::new()).is_empty());
        let fields = raw(json!({"title": "x"}));
        assert_eq!(strip_protected_fields(fields.clone()), fields);
    }

    #[test]
    fn custom_columns() {
        let columns = SystemColumns {
            primary_key: "uid".to_string(),
            ..SystemColumns::default()
        };
        let stripped = strip_protected_fields_with(raw(json!({"uid": 1, "id": 2})), &columns);
        assert_eq!(stripped, raw(json!({"id": 2})));
        assert!(columns.contains("updated_at"));
        assert!(!columns.contains("id"));
    }

    #[test]
    fn columns_deserialize_with_defaults() {
        let columns: SystemColumns = serde_json::from_value(json!({"updated_at": "modified"})).unwrap();
        assert_eq!(columns.primary_key, "id");
        assert_eq!(columns.updated_at, "modified");
    }

    struct Row {
        persisted:   bool,
        modified_at: Option<DateTime<Utc>>
    }

    impl Mutable for Row {
        fn is_persisted(&self) -> bool {
            self.persisted
        }

        fn set_modified_at(&mut self, now: DateTime<Utc>) -> bool {
            self.modified_at = Some(now);
            true
        }
    }

    #[test]
    fn restamp_overwrites_future_value() {
        let future = DateTime::parse_from_rfc3339("2099-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let mut row = Row {
            persisted:   true,
            modified_at: Some(future)
        };
        let before = Utc::now();
        let stamped = restamp_on_mutation(&mut row).unwrap();
        assert!(stamped >= before);
        assert!(stamped <= Utc::now());
        assert_eq!(row.modified_at, Some(stamped));
    }

    #[test]
    fn insert_is_not_restamped() {
        let mut row = Row {
            persisted:   false,
            modified_at: None
        };
        assert_eq!(restamp_on_mutation(&mut row), None);
        assert_eq!(row.modified_at, None);
    }
}
