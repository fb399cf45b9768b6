//! Type casts
//!
//! Each cast takes an optional default that is returned when the input
//! cannot be converted. Without a default the fallback is `null`.

use flowq_core::types::{format_number, parse_number};
use flowq_core::Value;

fn fallback(default: &Value) -> Value {
    match default {
        Value::Missing => Value::Null,
        other => other.clone(),
    }
}

/// Integer cast: finite numbers and numeric strings are truncated toward zero
pub(crate) fn to_int(value: &Value, default: &Value) -> Value {
    let n = match value {
        Value::Number(n) => Some(*n),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => parse_number(s),
        _ => None,
    };
    match n {
        Some(n) if n.is_finite() => Value::Number(n.trunc()),
        _ => fallback(default),
    }
}

/// Float cast: numbers pass through, numeric strings must parse to a finite value
pub(crate) fn to_float(value: &Value, default: &Value) -> Value {
    match value {
        Value::Number(n) => Value::Number(*n),
        Value::Bool(b) => Value::Number(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => match parse_number(s) {
            Some(n) if n.is_finite() => Value::Number(n),
            _ => fallback(default),
        },
        _ => fallback(default),
    }
}

/// String cast: arrays and objects become JSON text, absent values fall back
pub(crate) fn to_string(value: &Value, default: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(s.clone()),
        Value::Number(n) => Value::String(format_number(*n)),
        Value::Bool(b) => Value::String(b.to_string()),
        Value::Array(_) | Value::Object(_) => Value::String(value.to_json_string()),
        Value::Null | Value::Missing => fallback(default),
    }
}

/// Boolean cast.
///
/// Strings `"true"`/`"1"` (case-insensitive) are true, `"false"`/`"0"`/`""`
/// are false and any other text is true. Numbers are true when non-zero.
pub(crate) fn to_bool(value: &Value, default: &Value) -> Value {
    match value {
        Value::Bool(b) => Value::Bool(*b),
        Value::Number(n) => Value::Bool(*n != 0.0 && !n.is_nan()),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "false" | "0" | "" => Value::Bool(false),
            _ => Value::Bool(true),
        },
        _ => fallback(default),
    }
}
