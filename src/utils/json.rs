// src/utils/json.rs

//! Loose readers for JSON written by clients we do not control.

use serde_json::Value;

/// A non-negative whole number. `2` and `2.0` both read as 2; fractions,
/// negatives and non-numbers do not.
pub fn integral(value: &Value) -> Option<u64> {
    let Value::Number(n) = value else {
        return None;
    };
    if let Some(i) = n.as_u64() {
        return Some(i);
    }
    let f = n.as_f64()?;
    (f.fract() == 0.0 && f >= 0.0 && f <= u64::MAX as f64).then_some(f as u64)
}

/// Truthiness as a browser client reads it: `null`, `false`, `0` and `""`
/// are false, everything else is true.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
