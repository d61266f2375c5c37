//! Conversions between Rust field types and [`Value`], and the [`Entity`]
//! contract every persisted record type implements.

use std::collections::HashMap;

use crate::color::Color;
use crate::descriptor::TableDef;
use crate::timestamp::Timestamp;
use crate::value::Value;

/// A Rust type that a typed field can hold.
///
/// `from_value` returns `None` when the value has the wrong shape; callers
/// normally substitute the field's default in that case.
pub trait FieldValue: Sized {
    fn to_value(&self) -> Value;
    fn from_value(value: Value) -> Option<Self>;

    /// Store `value` into an existing field slot.
    fn assign(slot: &mut Self, value: Self) {
        *slot = value;
    }
}

impl FieldValue for i64 {
    fn to_value(&self) -> Value {
        Value::Int(*self)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Int(i) | Value::Enum(i) | Value::Timestamp(i) => Some(i),
            _ => None,
        }
    }
}

impl FieldValue for f64 {
    fn to_value(&self) -> Value {
        Value::Real(*self)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Real(f) => Some(f),
            Value::Int(i) => Some(i as f64),
            _ => None,
        }
    }
}

impl FieldValue for String {
    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl FieldValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(b),
            Value::Int(i) => Some(i != 0),
            _ => None,
        }
    }
}

impl FieldValue for Timestamp {
    fn to_value(&self) -> Value {
        Value::Timestamp(self.value())
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Timestamp(secs) | Value::Int(secs) => Some(Timestamp::new(secs)),
            _ => None,
        }
    }

    /// Updates the shared cell rather than replacing it.
    fn assign(slot: &mut Self, value: Self) {
        slot.update(value.value());
    }
}

impl FieldValue for Color {
    fn to_value(&self) -> Value {
        Value::Color(*self)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Color(c) => Some(c),
            _ => None,
        }
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, T::to_value)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: FieldValue> FieldValue for Vec<T> {
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(T::to_value).collect())
    }

    /// Items of the wrong shape are skipped.
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::List(items) => Some(items.into_iter().filter_map(T::from_value).collect()),
            _ => None,
        }
    }
}

/// Decoded column values of one stored row, keyed by column name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    values: HashMap<String, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, value: Value) {
        self.values.insert(column.into(), value);
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    /// Remove a column and convert it, defaulting if missing or mis-shaped.
    pub fn take<T: FieldValue + Default>(&mut self, column: &str) -> T {
        self.values
            .remove(column)
            .and_then(T::from_value)
            .unwrap_or_default()
    }

    /// Like [`Row::take`] with an explicit default.
    pub fn take_or<T: FieldValue>(&mut self, column: &str, default: T) -> T {
        self.values
            .remove(column)
            .and_then(T::from_value)
            .unwrap_or(default)
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// A record type stored one-per-row in its own table.
pub trait Entity: Sized {
    const TABLE: TableDef;

    /// Build from a fully decoded row.
    fn from_row(row: Row) -> Self;

    /// Semantic values in `TABLE.columns` order.
    fn to_row(&self) -> Vec<Value>;
}
