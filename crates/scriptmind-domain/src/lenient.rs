//! Tolerant field decoders for records produced by a language model.
//!
//! Model output rarely matches the requested schema exactly. A list field may
//! come back as a bare string, numbers may appear where strings were asked
//! for, and `null` shows up in place of empty containers. These decoders
//! accept any JSON value and coerce it into the declared shape, so a record
//! never fails to decode because of a single ill-typed field.

use crate::record::{require_object, Scene};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

pub(crate) fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_to_string(value).unwrap_or_default())
}

pub(crate) fn strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_strings(value))
}

pub(crate) fn string_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let map = match value {
        Value::Object(entries) => entries
            .into_iter()
            .map(|(key, value)| (key, coerce_strings(value)))
            .collect(),
        _ => BTreeMap::new(),
    };
    Ok(map)
}

pub(crate) fn scenes<'de, D>(deserializer: D) -> Result<Vec<Scene>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let items = match value {
        Value::Array(items) => items,
        Value::Object(_) => vec![value],
        _ => Vec::new(),
    };

    let scenes = items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(_) => serde_json::from_value::<Scene>(item).ok(),
            Value::String(summary) => Some(Scene {
                summary,
                ..Scene::default()
            }),
            _ => None,
        })
        .collect();
    Ok(scenes)
}

/// A whole record; unlike the field decoders this one is strict about shape
pub(crate) fn object<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    require_object(&value).map_err(D::Error::custom)?;
    serde_json::from_value(value).map_err(D::Error::custom)
}

fn coerce_strings(value: Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.into_iter().filter_map(scalar_to_string).collect(),
        other => scalar_to_string(other).into_iter().collect(),
    }
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        // Nested structures are kept verbatim as compact JSON
        other => Some(other.to_string()),
    }
}
