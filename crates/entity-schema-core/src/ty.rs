// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Semantic field types.
//!
//! A [`FieldType`] describes the shape of a value independently of any Rust
//! type. Most types are known at declaration time; the rest are written as a
//! [`FieldType::Forward`] placeholder and replaced later by the
//! [resolver](crate::resolve).
//!
//! # Mapping Rust Types
//!
//! | Rust type | Semantic type |
//! |-----------|---------------|
//! | `String`, `char` | `string` |
//! | integers | `integer` |
//! | `f32`, `f64` | `float` |
//! | `bool` | `boolean` |
//! | `Uuid` | `uuid` |
//! | `DateTime<Utc>`, `NaiveDateTime` | `datetime` |
//! | `NaiveDate` | `date` |
//! | `serde_json::Value` | `any` |
//! | `Vec<T>` | `list[T]` |
//! | `HashMap<K, V>`, `BTreeMap<K, V>` | `map[K, V]` |
//! | `HashSet<T>`, `BTreeSet<T>` | `set[T]` |
//! | `(A, B, ..)` | `tuple[A, B, ..]` |
//! | `Option<T>` | `T` at top level, `optional[T]` when nested |

use std::{
    collections::{BTreeMap, BTreeSet, HashMap, HashSet},
    fmt,
    sync::Arc
};

use crate::schema::Schema;

/// Scalar value kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scalar {
    /// UTF-8 text.
    String,
    /// Signed or unsigned integer.
    Integer,
    /// Floating point number.
    Float,
    /// `true` / `false`.
    Boolean,
    /// UUID.
    Uuid,
    /// Timestamp with time zone.
    DateTime,
    /// Calendar date.
    Date
}

impl Scalar {
    /// Lowercase name used in type rendering.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Uuid => "uuid",
            Self::DateTime => "datetime",
            Self::Date => "date"
        }
    }
}

/// Semantic type of an attribute, extra field or schema field.
#[derive(Debug, Clone)]
pub enum FieldType {
    /// Scalar value.
    Scalar(Scalar),

    /// Ordered sequence.
    List(Box<FieldType>),

    /// Key/value mapping.
    Map(Box<FieldType>, Box<FieldType>),

    /// Value that may be absent.
    Optional(Box<FieldType>),

    /// Unordered unique collection.
    Set(Box<FieldType>),

    /// Fixed-arity heterogeneous sequence.
    Tuple(Vec<FieldType>),

    /// Any value.
    Any,

    /// Reference to a synthesized schema.
    Schema(Arc<Schema>),

    /// Reference to a type defined outside this system, by name.
    Named(String),

    /// Unresolved placeholder expression, e.g. `List['ArticleRef']`.
    Forward(String)
}

impl FieldType {
    /// Shorthand for `FieldType::Scalar(Scalar::String)`.
    pub const fn string() -> Self {
        Self::Scalar(Scalar::String)
    }

    /// Shorthand for `FieldType::Scalar(Scalar::Integer)`.
    pub const fn integer() -> Self {
        Self::Scalar(Scalar::Integer)
    }

    /// Shorthand for `FieldType::Scalar(Scalar::Boolean)`.
    pub const fn boolean() -> Self {
        Self::Scalar(Scalar::Boolean)
    }

    /// Shorthand for `FieldType::Scalar(Scalar::Uuid)`.
    pub const fn uuid() -> Self {
        Self::Scalar(Scalar::Uuid)
    }

    /// Shorthand for `FieldType::Scalar(Scalar::DateTime)`.
    pub const fn datetime() -> Self {
        Self::Scalar(Scalar::DateTime)
    }

    /// Create a list of `inner`.
    pub fn list(inner: FieldType) -> Self {
        Self::List(Box::new(inner))
    }

    /// Create an optional `inner`.
    pub fn optional(inner: FieldType) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// Create a map from `key` to `value`.
    pub fn map(key: FieldType, value: FieldType) -> Self {
        Self::Map(Box::new(key), Box::new(value))
    }

    /// Create a reference to an externally defined type.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Create a forward placeholder from a type expression.
    ///
    /// # Example
    ///
    /// ```rust
    /// use entity_schema_core::FieldType;
    ///
    /// let ty = FieldType::forward("List['ArticleRef']");
    /// assert!(ty.has_forward());
    /// ```
    pub fn forward(expression: impl Into<String>) -> Self {
        Self::Forward(expression.into())
    }

    /// Check whether this type, or any type nested in it, is a placeholder.
    pub fn has_forward(&self) -> bool {
        match self {
            Self::Forward(_) => true,
            Self::List(inner) | Self::Optional(inner) | Self::Set(inner) => inner.has_forward(),
            Self::Map(key, value) => key.has_forward() || value.has_forward(),
            Self::Tuple(items) => items.iter().any(Self::has_forward),
            Self::Scalar(_) | Self::Any | Self::Schema(_) | Self::Named(_) => false
        }
    }
}

impl PartialEq for FieldType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Scalar(a), Self::Scalar(b)) => a == b,
            (Self::List(a), Self::List(b))
            | (Self::Optional(a), Self::Optional(b))
            | (Self::Set(a), Self::Set(b)) => a == b,
            (Self::Map(ak, av), Self::Map(bk, bv)) => ak == bk && av == bv,
            (Self::Tuple(a), Self::Tuple(b)) => a == b,
            (Self::Any, Self::Any) => true,
            // Schemas are compared by identity; two synthesized schemas are the
            // same type only when they come from the same cache entry.
            (Self::Schema(a), Self::Schema(b)) => Arc::ptr_eq(a, b),
            (Self::Named(a), Self::Named(b)) | (Self::Forward(a), Self::Forward(b)) => a == b,
            _ => false
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(scalar) => f.write_str(scalar.as_str()),
            Self::List(inner) => write!(f, "list[{inner}]"),
            Self::Map(key, value) => write!(f, "map[{key}, {value}]"),
            Self::Optional(inner) => write!(f, "optional[{inner}]"),
            Self::Set(inner) => write!(f, "set[{inner}]"),
            Self::Tuple(items) => {
                f.write_str("tuple[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Any => f.write_str("any"),
            Self::Schema(schema) => f.write_str(schema.name()),
            Self::Named(name) => f.write_str(name),
            Self::Forward(expression) => write!(f, "'{expression}'")
        }
    }
}

/// Rust types with a known semantic type.
///
/// Used by `#[derive(Entity)]` to translate field types. Implement it for
/// your own newtypes to use them as entity fields.
///
/// ```rust
/// use entity_schema_core::{FieldType, SemanticType};
///
/// struct Email(String);
///
/// impl SemanticType for Email {
///     fn field_type() -> FieldType {
///         FieldType::string()
///     }
/// }
///
/// assert_eq!(<Vec<Email>>::field_type(), FieldType::list(FieldType::string()));
/// ```
pub trait SemanticType {
    /// Semantic type of a top-level field of this Rust type.
    fn field_type() -> FieldType;

    /// Semantic type when nested inside a container.
    ///
    /// Differs from [`field_type`](Self::field_type) only for `Option<T>`,
    /// whose nullability is carried by the attribute at top level.
    fn element_type() -> FieldType {
        Self::field_type()
    }
}

macro_rules! scalar_semantic_type {
    ($scalar:ident => $($ty:ty),+) => {
        $(
            impl SemanticType for $ty {
                fn field_type() -> FieldType {
                    FieldType::Scalar(Scalar::$scalar)
                }
            }
        )+
    };
}

scalar_semantic_type!(String => String, char);
scalar_semantic_type!(Integer => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
scalar_semantic_type!(Float => f32, f64);
scalar_semantic_type!(Boolean => bool);
scalar_semantic_type!(Uuid => uuid::Uuid);
scalar_semantic_type!(DateTime => chrono::DateTime<chrono::Utc>, chrono::NaiveDateTime);
scalar_semantic_type!(Date => chrono::NaiveDate);

impl SemanticType for serde_json::Value {
    fn field_type() -> FieldType {
        FieldType::Any
    }
}

impl<T: SemanticType> SemanticType for Option<T> {
    fn field_type() -> FieldType {
        T::field_type()
    }

    fn element_type() -> FieldType {
        FieldType::optional(T::element_type())
    }
}

impl<T: SemanticType> SemanticType for Box<T> {
    fn field_type() -> FieldType {
        T::field_type()
    }

    fn element_type() -> FieldType {
        T::element_type()
    }
}

impl<T: SemanticType> SemanticType for Vec<T> {
    fn field_type() -> FieldType {
        FieldType::list(T::element_type())
    }
}

impl<T: SemanticType, S> SemanticType for HashSet<T, S> {
    fn field_type() -> FieldType {
        FieldType::Set(Box::new(T::element_type()))
    }
}

impl<T: SemanticType> SemanticType for BTreeSet<T> {
    fn field_type() -> FieldType {
        FieldType::Set(Box::new(T::element_type()))
    }
}

impl<K: SemanticType, V: SemanticType, S> SemanticType for HashMap<K, V, S> {
    fn field_type() -> FieldType {
        FieldType::map(K::element_type(), V::element_type())
    }
}

impl<K: SemanticType, V: SemanticType> SemanticType for BTreeMap<K, V> {
    fn field_type() -> FieldType {
        FieldType::map(K::element_type(), V::element_type())
    }
}

macro_rules! tuple_semantic_type {
    ($($name:ident),+) => {
        impl<$($name: SemanticType),+> SemanticType for ($($name,)+) {
            fn field_type() -> FieldType {
                FieldType::Tuple(vec![$($name::element_type()),+])
            }
        }
    };
}

tuple_semantic_type!(A, B);
tuple_semantic_type!(A, B, C);
tuple_semantic_type!(A, B, C, D);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_is_transparent_at_top_level() {
        assert_eq!(<Option<String>>::field_type(), FieldType::string());
    }

    #[test]
    fn nested_option_becomes_optional() {
        assert_eq!(
            <Vec<Option<i64>>>::field_type(),
            FieldType::list(FieldType::optional(FieldType::integer()))
        );
    }

    #[test]
    fn maps_sets_and_tuples() {
        assert_eq!(
            <BTreeMap<String, bool>>::field_type(),
            FieldType::map(FieldType::string(), FieldType::boolean())
        );
        assert_eq!(
            <HashSet<uuid::Uuid>>::field_type(),
            FieldType::Set(Box::new(FieldType::uuid()))
        );
        assert_eq!(
            <(i32, String)>::field_type(),
            FieldType::Tuple(vec![FieldType::integer(), FieldType::string()])
        );
    }

    #[test]
    fn has_forward_finds_nested_placeholders() {
        assert!(!FieldType::list(FieldType::string()).has_forward());
        assert!(FieldType::list(FieldType::forward("Tag")).has_forward());
        assert!(
            FieldType::map(FieldType::string(), FieldType::optional(FieldType::forward("X")))
                .has_forward()
        );
        assert!(FieldType::Tuple(vec![FieldType::Any, FieldType::forward("Y")]).has_forward());
    }

    #[test]
    fn display_renders_nested_types() {
        let ty = FieldType::map(
            FieldType::string(),
            FieldType::list(FieldType::optional(FieldType::named("Tag")))
        );
        assert_eq!(ty.to_string(), "map[string, list[optional[Tag]]]");
        assert_eq!(FieldType::forward("ArticleRef").to_string(), "'ArticleRef'");
    }
}
