//! Helpers for the schema-free tree that sits between DSL text and the typed model.
//!
//! The tree is plain [`serde_json::Value`] built with `preserve_order`, so map keys keep
//! the order they were inserted in and emitted text is stable across runs.
//!
//! Two groups of helpers live here:
//!
//! - lenient extractors used when reading the node envelope, where a value of the wrong
//!   kind falls back to the field's default;
//! - emptiness predicates used by `skip_serializing_if`, so that the rule deciding whether a
//!   field is omitted on output sits right next to the default it is parsed with.

use serde::{Deserialize, Deserializer};

pub use serde_json::{Map, Value};

/// A string-keyed, insertion-ordered map of arbitrary tree values.
pub type Tree = Map<String, Value>;

/// Human readable name of a value's kind, used in error messages.
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "map",
    }
}

/// Renders a scalar for an error message: strings verbatim, everything else as compact JSON.
pub fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A key counts as present only when it exists and is not `null`.
pub fn is_present(map: &Tree, key: &str) -> bool {
    map.get(key).is_some_and(|v| !v.is_null())
}

pub fn str_or(map: &Tree, key: &str, default: &str) -> String {
    map.get(key)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

pub fn opt_str(map: &Tree, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(str::to_string)
}

pub fn bool_or(map: &Tree, key: &str, default: bool) -> bool {
    map.get(key).and_then(Value::as_bool).unwrap_or(default)
}

pub fn opt_bool(map: &Tree, key: &str) -> Option<bool> {
    map.get(key).and_then(Value::as_bool)
}

/// Integers only; floats and strings are ignored.
pub fn opt_i64(map: &Tree, key: &str) -> Option<i64> {
    map.get(key).and_then(Value::as_i64)
}

pub fn opt_map<'a>(map: &'a Tree, key: &str) -> Option<&'a Tree> {
    map.get(key).and_then(Value::as_object)
}

// Emptiness predicates for `skip_serializing_if`.

pub fn is_false(value: &bool) -> bool {
    !*value
}

pub fn is_zero(value: &i64) -> bool {
    *value == 0
}

/// Null, empty strings, empty sequences and empty maps are all "nothing to emit".
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Deserializes a generic map field.
///
/// `null` and an empty sequence both mean "no entries"; the format's exporters write
/// `[]` for an empty map in several places.
pub fn map_or_empty<'de, D>(deserializer: D) -> Result<Tree, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Tree::new()),
        Value::Array(items) if items.is_empty() => Ok(Tree::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected map, got {}",
            kind_name(&other)
        ))),
    }
}

/// Like [`map_or_empty`], for fields where absence and emptiness must stay distinguishable.
pub fn opt_map_or_empty<'de, D>(deserializer: D) -> Result<Option<Tree>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Object(map) => Ok(Some(map)),
        Value::Array(items) if items.is_empty() => Ok(Some(Tree::new())),
        other => Err(serde::de::Error::custom(format!(
            "expected map, got {}",
            kind_name(&other)
        ))),
    }
}

/// Deserializes an opaque field that is left out on output when empty, reading every empty
/// value as `null` so a parsed document equals its re-parsed output.
pub fn empty_as_null<'de, D>(deserializer: D) -> Result<Value, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(if is_empty_value(&value) {
        Value::Null
    } else {
        value
    })
}

/// Deserializes an optional list field where `null` means empty.
pub fn seq_or_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Turns a whole-number float into an integer value so `100.0` is written as `100`.
pub fn number(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Value::from(value as i64)
    } else {
        Value::from(value)
    }
}
