//! Serde helpers for currency and numeric fields.
//!
//! The backend serializes `numeric` columns as strings (`"1500.00"`), as
//! numbers, or as `null`. These helpers coerce all three into `f64`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Parse a loosely formatted amount. Accepts `"1500.5"`, `" 1500 "` and
/// comma-decimal forms such as `"1.500,50"`.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(value) = trimmed.parse::<f64>() {
        return value.is_finite().then_some(value);
    }
    if trimmed.contains(',') {
        let normalized = trimmed.replace('.', "").replace(',', ".");
        if let Ok(value) = normalized.parse::<f64>() {
            return value.is_finite().then_some(value);
        }
    }
    None
}

fn coerce(value: Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_amount(&s),
        _ => None,
    }
}

/// Deserialize a required amount; unparsable or missing values become `0.0`.
pub fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(coerce).unwrap_or(0.0))
}

/// Deserialize an optional amount; unparsable or missing values become `None`.
pub fn deserialize_optional_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(coerce))
}
