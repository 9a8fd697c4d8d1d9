// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! System roles and relations of entity fields.
//!
//! ```rust,ignore
//! #[id]
//! pub id: Uuid,
//!
//! #[created_at]
//! pub created_at: DateTime<Utc>,
//!
//! #[updated_at]
//! pub updated_at: DateTime<Utc>,
//!
//! #[belongs_to(Author)]
//! pub author_id: Uuid,
//! ```
//!
//! Role fields are never accepted from clients and always appear in the
//! response schema.

use syn::{Attribute, Ident};

/// Field-level system role marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// `#[id]`
    Id,
    /// `#[created_at]`
    CreatedAt,
    /// `#[updated_at]`
    UpdatedAt
}

impl Role {
    /// Every role.
    pub const ALL: [Self; 3] = [Self::Id, Self::CreatedAt, Self::UpdatedAt];

    /// Marker attribute name.
    #[must_use]
    pub const fn attr_name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at"
        }
    }

    /// Role marked by `attr`, if it is a role marker.
    #[must_use]
    pub fn from_attr(attr: &Attribute) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|role| attr.path().is_ident(role.attr_name()))
    }
}

/// Role and relation of one field.
#[derive(Debug, Default, Clone)]
pub struct StorageConfig {
    /// System role.
    pub role: Option<Role>,

    /// Relation target from `#[belongs_to(Target)]`.
    pub belongs_to: Option<Ident>
}

impl StorageConfig {
    /// Assign a role from a marker attribute.
    ///
    /// # Errors
    ///
    /// Returns an error if the marker has arguments or a different role was
    /// already assigned.
    pub fn set_role(&mut self, role: Role, attr: &Attribute) -> syn::Result<()> {
        attr.meta.require_path_only()?;
        match self.role {
            Some(existing) if existing != role => Err(syn::Error::new_spanned(
                attr,
                format!(
                    "field cannot be both #[{}] and #[{}]",
                    existing.attr_name(),
                    role.attr_name()
                )
            )),
            _ => {
                self.role = Some(role);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_special() {
        let config = StorageConfig::default();
        assert!(config.role.is_none());
        assert!(config.belongs_to.is_none());
    }

    #[test]
    fn role_attr_names() {
        let names: Vec<_> = Role::ALL.iter().map(|r| r.attr_name()).collect();
        assert_eq!(names, ["id", "created_at", "updated_at"]);
    }

    #[test]
    fn role_from_attr() {
        let attr: Attribute = syn::parse_quote!(#[updated_at]);
        assert_eq!(Role::from_attr(&attr), Some(Role::UpdatedAt));
        let attr: Attribute = syn::parse_quote!(#[serde(skip)]);
        assert_eq!(Role::from_attr(&attr), None);
    }

    #[test]
    fn role_marker_takes_no_arguments() {
        let attr: Attribute = syn::parse_quote!(#[id(auto)]);
        let mut config = StorageConfig::default();
        assert!(config.set_role(Role::Id, &attr).is_err());
    }

    #[test]
    fn repeated_same_role_is_allowed() {
        let attr: Attribute = syn::parse_quote!(#[id]);
        let mut config = StorageConfig::default();
        config.set_role(Role::Id, &attr).unwrap();
        config.set_role(Role::Id, &attr).unwrap();
        assert_eq!(config.role, Some(Role::Id));
    }
}
