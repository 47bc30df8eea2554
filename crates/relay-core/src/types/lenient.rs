//! Forgiving field deserializers for externally authored JSON.
//!
//! Charting alert templates and hand-written frontends send numbers both as
//! JSON numbers and as quoted strings, and routinely omit fields. These helpers
//! never fail: anything that cannot be read as the target type becomes `None`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Reads a number or numeric string as `f64`.
pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value))
}

/// Reads a non-negative whole number (or its string form) as `u32`.
pub fn integer<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value).and_then(|n| {
        if n.fract() == 0.0 && n >= 0.0 && n <= u32::MAX as f64 {
            Some(n as u32)
        } else {
            None
        }
    }))
}

/// Reads a string, rendering bare numbers and booleans as text.
pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}
