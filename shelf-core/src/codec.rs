//! Type-directed conversion between [`Value`]s and [`Primitive`]s.
//!
//! Both directions are total. `encode` always produces something storable;
//! `decode` never fails and substitutes the type's default for anything it
//! cannot make sense of. Sequences and records are stored as JSON text, with
//! each item or field in the JSON form of its own descriptor.

use serde_json::{Map, Number, Value as Json};

use crate::color::Color;
use crate::descriptor::{FieldDescriptor, TypeDescriptor};
use crate::value::{Primitive, Value};

/// Encode a semantic value for storage in a column of type `ty`.
pub fn encode(value: &Value, ty: &TypeDescriptor) -> Primitive {
    if value.is_null() && !matches!(ty, TypeDescriptor::Sequence(_)) {
        return Primitive::Null;
    }
    match ty {
        TypeDescriptor::Int | TypeDescriptor::Enum(_) | TypeDescriptor::Timestamp => {
            value_int(value).map_or(Primitive::Null, Primitive::Integer)
        }
        TypeDescriptor::Real => value_real(value).map_or(Primitive::Null, Primitive::Real),
        TypeDescriptor::Text => value_text(value).map_or(Primitive::Null, Primitive::Text),
        TypeDescriptor::Bool => value_int(value)
            .map_or(Primitive::Null, |i| Primitive::Integer(i64::from(i != 0))),
        TypeDescriptor::Optional(inner) => encode(value, inner),
        TypeDescriptor::Sequence(_) | TypeDescriptor::Record(_) => match to_json(value, ty) {
            Json::Null => Primitive::Null,
            json => Primitive::Text(json.to_string()),
        },
        TypeDescriptor::Color => value_color(value).map_or(Primitive::Null, |c| Primitive::Text(c.to_hex())),
    }
}

/// Decode a stored primitive as type `ty`, falling back to the type's default.
pub fn decode(primitive: &Primitive, ty: &TypeDescriptor) -> Value {
    try_decode(primitive, ty).unwrap_or_else(|| default_value(ty))
}

/// The value a field of type `ty` holds when nothing valid was stored.
pub fn default_value(ty: &TypeDescriptor) -> Value {
    match ty {
        TypeDescriptor::Int => Value::Int(0),
        TypeDescriptor::Real => Value::Real(0.0),
        TypeDescriptor::Text => Value::Text(String::new()),
        TypeDescriptor::Bool => Value::Bool(false),
        TypeDescriptor::Enum(spec) => Value::Enum(spec.default_ordinal()),
        TypeDescriptor::Timestamp => Value::Timestamp(0),
        TypeDescriptor::Optional(_) => Value::Null,
        TypeDescriptor::Sequence(_) => Value::List(Vec::new()),
        TypeDescriptor::Color => Value::Color(Color::TRANSPARENT),
        TypeDescriptor::Record(fields) => default_record(fields),
    }
}

/// Strict decode: `None` means the primitive is not a valid `ty`.
fn try_decode(primitive: &Primitive, ty: &TypeDescriptor) -> Option<Value> {
    match ty {
        TypeDescriptor::Int => primitive_int(primitive).map(Value::Int),
        TypeDescriptor::Real => primitive_real(primitive).map(Value::Real),
        TypeDescriptor::Text => match primitive {
            Primitive::Null => None,
            Primitive::Integer(i) => Some(Value::Text(i.to_string())),
            Primitive::Real(f) => Some(Value::Text(f.to_string())),
            Primitive::Text(s) => Some(Value::Text(s.clone())),
        },
        TypeDescriptor::Bool => primitive_bool(primitive).map(Value::Bool),
        TypeDescriptor::Enum(spec) => primitive_int(primitive)
            .and_then(|o| spec.resolve(o))
            .map(Value::Enum),
        TypeDescriptor::Timestamp => primitive_int(primitive).map(Value::Timestamp),
        TypeDescriptor::Optional(inner) => match primitive {
            Primitive::Null => Some(Value::Null),
            _ => Some(try_decode(primitive, inner).unwrap_or(Value::Null)),
        },
        TypeDescriptor::Sequence(inner) => Some(Value::List(decode_sequence(primitive, inner))),
        TypeDescriptor::Color => match primitive {
            Primitive::Text(s) => Color::from_hex(s)
                .or_else(|| serde_json::from_str::<Json>(s).ok().and_then(|j| json_color(&j)))
                .map(Value::Color),
            _ => None,
        },
        TypeDescriptor::Record(fields) => match primitive {
            Primitive::Text(s) => match serde_json::from_str::<Json>(s) {
                Ok(Json::Object(map)) => Some(decode_record(&map, fields)),
                _ => None,
            },
            _ => None,
        },
    }
}

/// Items that fail to decode are dropped rather than failing the sequence.
///
/// Stored text that is not a JSON list is an older single-value layout
/// (e.g. one bare executable path) and becomes a one-item sequence, or an
/// empty one when nothing was stored.
fn decode_sequence(primitive: &Primitive, inner: &TypeDescriptor) -> Vec<Value> {
    if primitive.is_falsy() {
        return Vec::new();
    }
    if let Primitive::Text(s) = primitive {
        match serde_json::from_str::<Json>(s) {
            Ok(Json::Array(items)) => {
                return items.iter().filter_map(|j| from_json(j, inner)).collect();
            }
            Ok(other) => return from_json(&other, inner).into_iter().collect(),
            Err(_) => {}
        }
    }
    try_decode(primitive, inner).into_iter().collect()
}

fn decode_record(map: &Map<String, Json>, fields: &[FieldDescriptor]) -> Value {
    Value::Record(
        fields
            .iter()
            .map(|f| {
                let value = map
                    .get(f.name)
                    .and_then(|j| from_json(j, &f.ty))
                    .unwrap_or_else(|| default_value(&f.ty));
                (f.name.to_string(), value)
            })
            .collect(),
    )
}

fn default_record(fields: &[FieldDescriptor]) -> Value {
    Value::Record(
        fields
            .iter()
            .map(|f| (f.name.to_string(), default_value(&f.ty)))
            .collect(),
    )
}

// ── JSON forms (sequence items and record fields) ───────────────────────────

fn to_json(value: &Value, ty: &TypeDescriptor) -> Json {
    match ty {
        TypeDescriptor::Sequence(inner) => match value {
            Value::Null => Json::Array(Vec::new()),
            Value::List(items) => Json::Array(items.iter().map(|v| to_json(v, inner)).collect()),
            single => Json::Array(vec![to_json(single, inner)]),
        },
        TypeDescriptor::Record(fields) => match value {
            Value::Record(map) => Json::Object(
                fields
                    .iter()
                    .map(|f| {
                        let json = match map.get(f.name) {
                            Some(v) => to_json(v, &f.ty),
                            None => to_json(&default_value(&f.ty), &f.ty),
                        };
                        (f.name.to_string(), json)
                    })
                    .collect(),
            ),
            _ => Json::Null,
        },
        TypeDescriptor::Optional(inner) if !value.is_null() => to_json(value, inner),
        _ => primitive_to_json(encode(value, ty)),
    }
}

fn primitive_to_json(primitive: Primitive) -> Json {
    match primitive {
        Primitive::Null => Json::Null,
        Primitive::Integer(i) => Json::from(i),
        Primitive::Real(f) => Number::from_f64(f).map_or(Json::Null, Json::Number),
        Primitive::Text(s) => Json::String(s),
    }
}

fn from_json(json: &Json, ty: &TypeDescriptor) -> Option<Value> {
    match ty {
        TypeDescriptor::Int => json_int(json).map(Value::Int),
        TypeDescriptor::Real => json_real(json).map(Value::Real),
        TypeDescriptor::Text => match json {
            Json::String(s) => Some(Value::Text(s.clone())),
            Json::Number(n) => Some(Value::Text(n.to_string())),
            Json::Bool(b) => Some(Value::Text(b.to_string())),
            Json::Null | Json::Array(_) | Json::Object(_) => None,
        },
        TypeDescriptor::Bool => match json {
            Json::Bool(b) => Some(Value::Bool(*b)),
            other => json_int(other).map(|i| Value::Bool(i != 0)),
        },
        TypeDescriptor::Enum(spec) => json_int(json)
            .and_then(|o| spec.resolve(o))
            .map(Value::Enum),
        TypeDescriptor::Timestamp => json_int(json).map(Value::Timestamp),
        TypeDescriptor::Optional(inner) => match json {
            Json::Null => Some(Value::Null),
            other => Some(from_json(other, inner).unwrap_or(Value::Null)),
        },
        TypeDescriptor::Sequence(inner) => match json {
            Json::Null => Some(Value::List(Vec::new())),
            Json::Array(items) => Some(Value::List(
                items.iter().filter_map(|j| from_json(j, inner)).collect(),
            )),
            _ => None,
        },
        TypeDescriptor::Color => json_color(json).map(Value::Color),
        TypeDescriptor::Record(fields) => match json {
            Json::Object(map) => Some(decode_record(map, fields)),
            _ => None,
        },
    }
}

fn json_int(json: &Json) -> Option<i64> {
    match json {
        Json::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
        Json::String(s) => parse_int(s),
        Json::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

fn json_real(json: &Json) -> Option<f64> {
    match json {
        Json::Number(n) => n.as_f64(),
        Json::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn json_color(json: &Json) -> Option<Color> {
    match json {
        Json::String(s) => Color::from_hex(s),
        Json::Array(items) => {
            let channels: Vec<f32> = items
                .iter()
                .map(|j| j.as_f64().map(|f| f as f32))
                .collect::<Option<_>>()?;
            Color::from_channels(&channels)
        }
        _ => None,
    }
}

// ── Scalar coercions ────────────────────────────────────────────────────────

fn parse_int(s: &str) -> Option<i64> {
    let s = s.trim();
    s.parse::<i64>().ok().or_else(|| {
        s.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(|f| f as i64)
    })
}

fn primitive_int(primitive: &Primitive) -> Option<i64> {
    match primitive {
        Primitive::Null => None,
        Primitive::Integer(i) => Some(*i),
        Primitive::Real(f) => f.is_finite().then_some(*f as i64),
        Primitive::Text(s) => parse_int(s),
    }
}

fn primitive_real(primitive: &Primitive) -> Option<f64> {
    match primitive {
        Primitive::Null => None,
        Primitive::Integer(i) => Some(*i as f64),
        Primitive::Real(f) => Some(*f),
        Primitive::Text(s) => s.trim().parse().ok(),
    }
}

fn primitive_bool(primitive: &Primitive) -> Option<bool> {
    match primitive {
        Primitive::Text(s) if s.eq_ignore_ascii_case("true") => Some(true),
        Primitive::Text(s) if s.eq_ignore_ascii_case("false") => Some(false),
        other => primitive_int(other).map(|i| i != 0),
    }
}

fn value_int(value: &Value) -> Option<i64> {
    match value {
        Value::Int(i) | Value::Enum(i) | Value::Timestamp(i) => Some(*i),
        Value::Bool(b) => Some(i64::from(*b)),
        Value::Real(f) => f.is_finite().then_some(*f as i64),
        Value::Text(s) => parse_int(s),
        Value::Null | Value::Color(_) | Value::List(_) | Value::Record(_) => None,
    }
}

fn value_real(value: &Value) -> Option<f64> {
    match value {
        Value::Real(f) => Some(*f),
        Value::Int(i) | Value::Enum(i) | Value::Timestamp(i) => Some(*i as f64),
        Value::Bool(b) => Some(f64::from(u8::from(*b))),
        Value::Text(s) => s.trim().parse().ok(),
        Value::Null | Value::Color(_) | Value::List(_) | Value::Record(_) => None,
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Text(s) => Some(s.clone()),
        Value::Int(i) | Value::Enum(i) | Value::Timestamp(i) => Some(i.to_string()),
        Value::Real(f) => Some(f.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Color(c) => Some(c.to_hex()),
        Value::List(_) | Value::Record(_) => Some(untyped_json(value).to_string()),
    }
}

fn value_color(value: &Value) -> Option<Color> {
    match value {
        Value::Color(c) => Some(*c),
        Value::Text(s) => Color::from_hex(s),
        Value::List(items) => {
            let channels: Vec<f32> = items
                .iter()
                .map(|v| value_real(v).map(|f| f as f32))
                .collect::<Option<_>>()?;
            Color::from_channels(&channels)
        }
        _ => None,
    }
}

/// JSON for a value with no descriptor to guide it.
fn untyped_json(value: &Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Int(i) | Value::Enum(i) | Value::Timestamp(i) => Json::from(*i),
        Value::Real(f) => Number::from_f64(*f).map_or(Json::Null, Json::Number),
        Value::Text(s) => Json::String(s.clone()),
        Value::Color(c) => Json::String(c.to_hex()),
        Value::List(items) => Json::Array(items.iter().map(untyped_json).collect()),
        Value::Record(map) => Json::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), untyped_json(v)))
                .collect(),
        ),
    }
}

#[cfg(test)]
#[path = "tests/codec_tests.rs"]
mod tests;
