//! The two value universes the codec maps between.
//!
//! [`Value`] is the semantic side: what a typed field holds in memory.
//! [`Primitive`] is the storage side: what a single SQLite column can hold.

use std::collections::BTreeMap;

use crate::color::Color;

/// A storable column value.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Primitive {
    /// True for values the legacy decoders treat as "nothing stored":
    /// NULL and the empty string.
    pub fn is_falsy(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.is_empty(),
            Self::Integer(_) | Self::Real(_) => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

impl From<i64> for Primitive {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Primitive {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<String> for Primitive {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for Primitive {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

/// A semantic field value.
///
/// `Null` is the absent marker of an `Optional` field. Enums carry their
/// ordinal; timestamps carry epoch seconds (the shared in-memory wrapper
/// lives on the entity, not in the value).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Real(f64),
    Text(String),
    Enum(i64),
    Timestamp(i64),
    Color(Color),
    List(Vec<Value>),
    Record(BTreeMap<String, Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Build a record value from `(name, value)` pairs.
    pub fn record<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self::Record(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
