// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Inclusion policy.
//!
//! Decides, per field and per [`SchemaVariant`], whether the field appears
//! in the schema and whether it is required.
//!
//! # Default Policy
//!
//! | Field | create | update | response |
//! |-------|--------|--------|----------|
//! | system attribute | excluded | excluded | required |
//! | relation / ordinary attribute | required unless nullable or defaulted | optional | required unless nullable |
//! | extra field | excluded | excluded | required |
//!
//! # Metadata Overrides
//!
//! `include_in_create`, `include_in_update` and `include_in_response` on an
//! attribute force exclusion when `false` and inclusion when `true`. They
//! never apply to extra fields and never override the system-attribute rows:
//! a primary key cannot be made client-writable and cannot be hidden.

use serde_json::Value;

use crate::{
    attribute::{Attribute, keys},
    collect::Field,
    error::{Result, SchemaError},
    registry::ExtraField,
    schema::{FieldSource, SchemaField, SchemaVariant}
};

/// Apply the inclusion policy to collected fields.
///
/// # Errors
///
/// Returns [`SchemaError::InvalidMetadata`] if an interpreted metadata key of
/// any attribute holds a value of the wrong type, whatever the variant.
pub fn apply(entity: &str, fields: &[Field], variant: SchemaVariant) -> Result<Vec<SchemaField>> {
    let mut included = Vec::with_capacity(fields.len());
    for field in fields {
        let planned = match field {
            Field::Attribute(attr) => plan_attribute(entity, attr, variant)?,
            Field::Extra(extra) => plan_extra(extra, variant)
        };
        included.extend(planned);
    }
    Ok(included)
}

fn plan_attribute(
    entity: &str,
    attr: &Attribute,
    variant: SchemaVariant
) -> Result<Option<SchemaField>> {
    let overrides = InclusionOverrides::from_attribute(entity, attr)?;

    if attr.is_system() {
        return Ok(match variant {
            SchemaVariant::Create | SchemaVariant::Update => None,
            SchemaVariant::Response => Some(attribute_field(attr, true, overrides.description))
        });
    }

    if overrides.for_variant(variant) == Some(false) {
        return Ok(None);
    }

    let required = match variant {
        SchemaVariant::Create => !attr.is_nullable() && !attr.has_default(),
        SchemaVariant::Update => false,
        SchemaVariant::Response => !attr.is_nullable()
    };

    Ok(Some(attribute_field(attr, required, overrides.description)))
}

fn plan_extra(extra: &ExtraField, variant: SchemaVariant) -> Option<SchemaField> {
    match variant {
        SchemaVariant::Response => Some(
            SchemaField::new(extra.name(), extra.ty().clone(), true)
                .with_source(FieldSource::Extra)
        ),
        SchemaVariant::Create | SchemaVariant::Update => None
    }
}

fn attribute_field(attr: &Attribute, required: bool, description: Option<String>) -> SchemaField {
    SchemaField::new(attr.name(), attr.ty().clone(), required).with_description(description)
}

/// Validated metadata overrides of one attribute.
#[derive(Debug, Default, PartialEq)]
struct InclusionOverrides {
    create:      Option<bool>,
    update:      Option<bool>,
    response:    Option<bool>,
    description: Option<String>
}

impl InclusionOverrides {
    fn from_attribute(entity: &str, attr: &Attribute) -> Result<Self> {
        let metadata = attr.metadata();
        let invalid = |key: &str, expected: &'static str, found: &Value| {
            SchemaError::InvalidMetadata {
                entity: entity.to_string(),
                attribute: attr.name().to_string(),
                key: key.to_string(),
                expected,
                found: found.clone()
            }
        };
        let flag = |key: &str| -> Result<Option<bool>> {
            match metadata.get(key) {
                None => Ok(None),
                Some(Value::Bool(value)) => Ok(Some(*value)),
                Some(other) => Err(invalid(key, "a boolean", other))
            }
        };

        let description = match metadata.get(keys::DESCRIPTION) {
            None => None,
            Some(Value::String(text)) => Some(text.clone()),
            Some(other) => return Err(invalid(keys::DESCRIPTION, "a string", other))
        };

        Ok(Self {
            create: flag(keys::INCLUDE_IN_CREATE)?,
            update: flag(keys::INCLUDE_IN_UPDATE)?,
            response: flag(keys::INCLUDE_IN_RESPONSE)?,
            description
        })
    }

    const fn for_variant(&self, variant: SchemaVariant) -> Option<bool> {
        match variant {
            SchemaVariant::Create => self.create,
            SchemaVariant::Update => self.update,
            SchemaVariant::Response => self.response
        }
    }
}
