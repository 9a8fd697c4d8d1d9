// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Field collection.
//!
//! Merges the attributes supplied by an [`AttributeSource`] with the extra
//! fields of the [`ExtraFieldRegistry`] into one ordered list: attributes
//! first, in declaration order, then extra fields in registration order.

use std::sync::Arc;

use crate::{
    attribute::Attribute,
    entity::{AttributeSource, EntityType},
    error::Diagnostic,
    registry::{ExtraField, ExtraFieldRegistry},
    ty::FieldType
};

/// A field entering the inclusion policy.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    /// Storage attribute.
    Attribute(Attribute),
    /// Extra declared field.
    Extra(ExtraField)
}

impl Field {
    /// Field name.
    pub fn name(&self) -> &str {
        match self {
            Self::Attribute(attr) => attr.name(),
            Self::Extra(extra) => extra.name()
        }
    }

    /// Semantic type.
    pub fn ty(&self) -> &FieldType {
        match self {
            Self::Attribute(attr) => attr.ty(),
            Self::Extra(extra) => extra.ty()
        }
    }
}

/// Output of [`collect_fields`].
#[derive(Debug, Default)]
pub struct CollectedFields {
    /// Merged fields.
    pub fields:      Vec<Field>,
    /// Name collisions found while merging.
    pub diagnostics: Vec<Diagnostic>
}

/// Collect attributes and extra fields of `entity`.
///
/// On the first call for an entity type without a registry entry, the extra
/// fields attached at declaration are copied into `registry`. A missing entry
/// means no extra fields. An extra field named like an attribute is dropped
/// and reported once as [`Diagnostic::NameCollision`].
pub fn collect_fields<S>(
    source: &S,
    registry: &ExtraFieldRegistry,
    entity: &Arc<EntityType>
) -> CollectedFields
where
    S: AttributeSource + ?Sized
{
    registry.register_declared(entity);

    let attributes = source.list_attributes(entity);
    let extras = registry.get(entity).unwrap_or_default();

    let mut collected = CollectedFields {
        fields:      Vec::with_capacity(attributes.len() + extras.len()),
        diagnostics: Vec::new()
    };

    collected
        .fields
        .extend(attributes.iter().cloned().map(Field::Attribute));

    for extra in &extras {
        if attributes.iter().any(|a| a.name() == extra.name()) {
            tracing::warn!(
                entity = entity.name(),
                field = extra.name(),
                "extra field collides with an attribute; attribute wins"
            );
            collected.diagnostics.push(Diagnostic::NameCollision {
                entity: entity.name().to_string(),
                field:  extra.name().to_string()
            });
            continue;
        }
        collected.fields.push(Field::Extra(extra.clone()));
    }

    collected
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use super::*;
    use crate::{entity::DeclaredAttributes, registry::ExtraFields};

    fn article() -> Arc<EntityType> {
        EntityType::builder("Article")
            .attribute(Attribute::new("id", FieldType::uuid()).primary_key())
            .attribute(Attribute::new("title", FieldType::string()))
            .extra_field("word_count", FieldType::integer())
            .extra_field("title", FieldType::integer())
            .build()
            .unwrap()
    }

    #[test]
    fn attributes_then_extras() {
        let registry = ExtraFieldRegistry::new();
        let collected = collect_fields(&DeclaredAttributes, &registry, &article());
        let names: Vec<_> = collected.fields.iter().map(Field::name).collect();
        assert_eq!(names, ["id", "title", "word_count"]);
    }

    #[test]
    fn collision_keeps_attribute_and_reports_once() {
        let registry = ExtraFieldRegistry::new();
        let collected = collect_fields(&DeclaredAttributes, &registry, &article());
        let title = collected
            .fields
            .iter()
            .find(|f| f.name() == "title")
            .unwrap();
        assert!(matches!(title, Field::Attribute(_)));
        assert_eq!(
            collected.diagnostics,
            [Diagnostic::NameCollision {
                entity: "Article".to_string(),
                field:  "title".to_string()
            }]
        );
    }

    #[test]
    fn missing_registry_entry_means_no_extras() {
        let registry = ExtraFieldRegistry::new();
        let tag = EntityType::builder("Tag")
            .attribute(Attribute::new("label", FieldType::string()))
            .build()
            .unwrap();
        let collected = collect_fields(&DeclaredAttributes, &registry, &tag);
        assert_eq!(collected.fields.len(), 1);
        assert!(collected.diagnostics.is_empty());
        assert!(!registry.contains(&tag));
    }

    #[test]
    fn first_collection_registers_declared_extras() {
        let registry = ExtraFieldRegistry::new();
        let entity = article();
        assert!(!registry.contains(&entity));
        collect_fields(&DeclaredAttributes, &registry, &entity);
        assert!(registry.contains(&entity));
        assert!(entity.declared_extras().contains("word_count"));
    }

    #[test]
    fn explicit_registration_is_used() {
        let registry = ExtraFieldRegistry::new();
        let entity = article();
        registry.register(
            &entity,
            ExtraFields::new().with("reading_time", FieldType::integer())
        );
        let collected = collect_fields(&DeclaredAttributes, &registry, &entity);
        let names: Vec<_> = collected.fields.iter().map(Field::name).collect();
        assert_eq!(names, ["id", "title", "reading_time"]);
    }

    struct Renamed;

    impl AttributeSource for Renamed {
        fn list_attributes<'e>(&self, _entity: &'e EntityType) -> Cow<'e, [Attribute]> {
            Cow::Owned(vec![Attribute::new("slug", FieldType::string())])
        }
    }

    #[test]
    fn custom_attribute_source() {
        let registry = ExtraFieldRegistry::new();
        let collected = collect_fields(&Renamed, &registry, &article());
        let names: Vec<_> = collected.fields.iter().map(Field::name).collect();
        assert_eq!(names, ["slug", "word_count", "title"]);
        assert!(collected.diagnostics.is_empty());
    }
}
