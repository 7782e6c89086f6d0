//! JSON bridge — converts between [`Value`] trees and `serde_json::Value`.
//!
//! The binary format is the durable representation; JSON is the inspection
//! and authoring surface (the CLI's `dump` and `pack` go through here). The
//! mapping is documented and deliberately lossy in one direction only:
//!
//! - [`to_json`] widens every integer kind to a JSON number and every
//!   homogeneous array to a plain JSON array, so kind *widths* are not
//!   recoverable from the JSON alone.
//! - [`from_json`] picks the narrowest reasonable kind: integers in i32
//!   range become `Int`, other integers `Long`, floats `Double`; arrays
//!   collapse to a homogeneous kind when every element agrees, otherwise
//!   they become value arrays. JSON `null` and booleans have no counterpart
//!   and fail with [`TagError::Unrepresentable`].

use serde_json::{Map, Number, Value as Json};

use crate::error::{Result, TagError};
use crate::value::{Compound, Value};

/// Convert a value tree to JSON for inspection.
///
/// Non-finite floats have no JSON number form and become `null`, matching
/// `serde_json`'s own behavior.
pub fn to_json(value: &Value) -> Json {
    match value {
        Value::Byte(v) => Json::from(*v),
        Value::Short(v) => Json::from(*v),
        Value::Int(v) => Json::from(*v),
        Value::Long(v) => Json::from(*v),
        Value::Float(v) => float_to_json(f64::from(*v)),
        Value::Double(v) => float_to_json(*v),
        Value::String(s) => Json::from(s.as_str()),
        Value::ByteArray(items) => items.iter().map(|v| Json::from(*v)).collect(),
        Value::ShortArray(items) => items.iter().map(|v| Json::from(*v)).collect(),
        Value::IntArray(items) => items.iter().map(|v| Json::from(*v)).collect(),
        Value::LongArray(items) => items.iter().map(|v| Json::from(*v)).collect(),
        Value::FloatArray(items) => items.iter().map(|v| float_to_json(f64::from(*v))).collect(),
        Value::DoubleArray(items) => items.iter().map(|v| float_to_json(*v)).collect(),
        Value::StringArray(items) => items.iter().map(|s| Json::from(s.as_str())).collect(),
        Value::ValueArray(items) => items.iter().map(to_json).collect(),
        Value::Compound(compound) => {
            let mut map = Map::with_capacity(compound.len());
            for (key, v) in compound.iter() {
                map.insert(key.to_owned(), to_json(v));
            }
            Json::Object(map)
        }
    }
}

fn float_to_json(f: f64) -> Json {
    Number::from_f64(f).map_or(Json::Null, Json::Number)
}

/// Convert JSON to a value tree, picking kinds per the module-level mapping.
pub fn from_json(json: &Json) -> Result<Value> {
    match json {
        Json::Null => Err(TagError::Unrepresentable("null")),
        Json::Bool(_) => Err(TagError::Unrepresentable("boolean")),
        Json::Number(n) => number_to_value(n),
        Json::String(s) => Ok(Value::String(s.clone())),
        Json::Array(items) => array_to_value(items),
        Json::Object(map) => {
            let mut compound = Compound::new();
            for (key, v) in map {
                compound.set(key.clone(), from_json(v)?);
            }
            Ok(Value::Compound(compound))
        }
    }
}

fn number_to_value(n: &Number) -> Result<Value> {
    if let Some(i) = n.as_i64() {
        return Ok(match i32::try_from(i) {
            Ok(narrow) => Value::Int(narrow),
            Err(_) => Value::Long(i),
        });
    }
    if let Some(f) = n.as_f64() {
        // Fractional, or an integer only u64 can hold; either way f64 is the
        // closest kind the format has.
        return Ok(Value::Double(f));
    }
    Err(TagError::Unrepresentable("number"))
}

/// Collapse a JSON array to the most compact array kind every element fits.
fn array_to_value(items: &[Json]) -> Result<Value> {
    if let Some(ints) = items
        .iter()
        .map(Json::as_i64)
        .collect::<Option<Vec<i64>>>()
    {
        if let Ok(narrow) = ints
            .iter()
            .map(|&i| i32::try_from(i))
            .collect::<std::result::Result<Vec<i32>, _>>()
        {
            return Ok(Value::IntArray(narrow));
        }
        return Ok(Value::LongArray(ints));
    }
    if items.iter().all(Json::is_number) {
        if let Some(floats) = items
            .iter()
            .map(Json::as_f64)
            .collect::<Option<Vec<f64>>>()
        {
            return Ok(Value::DoubleArray(floats));
        }
    }
    if let Some(strings) = items.iter().map(Json::as_str).collect::<Option<Vec<&str>>>() {
        return Ok(Value::StringArray(
            strings.into_iter().map(str::to_owned).collect(),
        ));
    }
    // Mixed or structured elements keep full per-element tags. An empty
    // array also lands here: with no elements there is no evidence for a
    // narrower kind.
    items
        .iter()
        .map(from_json)
        .collect::<Result<Vec<Value>>>()
        .map(Value::ValueArray)
}
