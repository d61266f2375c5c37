//! Conversion between codec primitives and rusqlite values.

use rusqlite::types::{Value as SqlValue, ValueRef};
use shelf_core::Primitive;

pub(crate) fn to_sql(primitive: &Primitive) -> SqlValue {
    match primitive {
        Primitive::Null => SqlValue::Null,
        Primitive::Integer(i) => SqlValue::Integer(*i),
        Primitive::Real(f) => SqlValue::Real(*f),
        Primitive::Text(s) => SqlValue::Text(s.clone()),
    }
}

/// Blobs are not produced by the codec; one found on disk is read as text.
pub(crate) fn from_sql(value: ValueRef<'_>) -> Primitive {
    match value {
        ValueRef::Null => Primitive::Null,
        ValueRef::Integer(i) => Primitive::Integer(i),
        ValueRef::Real(f) => Primitive::Real(f),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Primitive::Text(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}
