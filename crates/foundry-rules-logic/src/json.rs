//! Helpers for probing untyped JSON documents.

use serde_json::{Map, Value};

/// Whether a value counts as present: not null, false, zero, or empty.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// `value[key]` when it is a non-empty object.
pub(crate) fn object_field<'a>(value: &'a Value, key: &str) -> Option<&'a Map<String, Value>> {
    value
        .get(key)
        .and_then(Value::as_object)
        .filter(|o| !o.is_empty())
}

/// `value[key]` when it is a non-empty string.
pub(crate) fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Render a JSON value for a message; absent values print as `None`.
pub(crate) fn describe(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "None".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
