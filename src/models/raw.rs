//! Lenient field decoding for raw planner records.
//!
//! The upstream schema is unstable: lists show up as `null`, counts arrive as
//! numbers in one payload and numeric strings in the next, and string fields
//! are occasionally numeric. These helpers are wired in with
//! `#[serde(deserialize_with = ...)]` so the typed raw models still load.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Treats `null` as the type's default.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts a string, a number, a bool, or `null` and yields a string.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

/// Accepts a number, a numeric string, or `null` and yields an optional `f64`.
///
/// Non-numeric strings decode to `None` rather than failing the record.
pub fn lenient_count<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

/// Accepts a bool, `0`/`1`, `"true"`/`"false"`, or `null`.
pub fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_i64().is_some_and(|v| v != 0),
        Value::String(s) => s.eq_ignore_ascii_case("true"),
        _ => false,
    })
}
