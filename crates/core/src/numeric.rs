//! Numeric coercion and rounding
//!
//! Every number that enters the calculator goes through one of the lenient
//! deserializers below: non-finite, negative or unparseable values become 0,
//! numeric strings are accepted. Rounding follows "round half up", so 2.5
//! rounds to 3 and 0.5 rounds to 1.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// Round to the nearest integer, ties toward positive infinity
#[inline]
pub fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Round a non-negative quantity to an integer count (days, currency units)
///
/// Non-finite and negative values collapse to 0.
pub fn to_count(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        round_half_up(value) as u64
    } else {
        0
    }
}

/// Round a monetary amount to the nearest multiple of `granularity`
///
/// A granularity of 0 is treated as 1.
pub fn round_to_granularity(amount: f64, granularity: u64) -> u64 {
    let step = granularity.max(1) as f64;
    to_count(round_half_up(amount / step) * step)
}

/// Coerce an arbitrary JSON value to a finite, non-negative number
pub fn coerce_non_negative(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|v| v.is_finite() && *v >= 0.0)
        .unwrap_or(0.0)
}

fn coerce_u32(value: &Value) -> u32 {
    let v = coerce_non_negative(value).trunc();
    if v >= u32::MAX as f64 {
        u32::MAX
    } else {
        v as u32
    }
}

/// Deserialize a finite non-negative `f64`, defaulting to 0 on garbage
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_non_negative(&value))
}

/// Deserialize a non-negative integer, truncating fractions
pub fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_u32(&value))
}

/// Deserialize an optional count; absent, null or non-numeric values stay unset
pub fn lenient_opt_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| {
        let parsed = match &v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        parsed.filter(|n| n.is_finite()).map(|_| coerce_u32(&v))
    }))
}

/// Deserialize a rounding granularity; anything below 1 becomes 1
pub fn lenient_granularity<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok((coerce_non_negative(&value).trunc() as u64).max(1))
}

/// Deserialize a key → days map, coercing every value
pub fn lenient_u32_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .map(|(key, value)| (key, coerce_u32(&value)))
        .collect())
}
