//! Per-item regional multipliers

use crate::numeric::coerce_non_negative;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Sparse key → multiplier map
///
/// Absent keys mean 1.0. Zero, negative and unparseable values are dropped on
/// load, so every stored multiplier is positive.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MultiplierMap(BTreeMap<String, f64>);

impl MultiplierMap {
    /// The all-1.0 map
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> f64 {
        self.0.get(key).copied().unwrap_or(1.0)
    }

    /// New map with one entry replaced; non-positive values reset it to 1.0
    pub fn with_override(&self, key: &str, multiplier: f64) -> Self {
        let mut next = self.0.clone();
        if multiplier.is_finite() && multiplier > 0.0 && multiplier != 1.0 {
            next.insert(key.to_string(), multiplier);
        } else {
            next.remove(key);
        }
        Self(next)
    }

    /// The all-1.0 default with `overrides` merged on top
    pub fn merged_over_default(overrides: &MultiplierMap) -> Self {
        overrides
            .iter()
            .fold(Self::identity(), |acc, (k, v)| acc.with_override(k, v))
    }

    pub fn reset(&self) -> Self {
        Self::identity()
    }

    pub fn is_identity(&self) -> bool {
        self.0.values().all(|v| *v == 1.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for MultiplierMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
        Ok(raw
            .into_iter()
            .map(|(k, v)| (k, coerce_non_negative(&v)))
            .filter(|(_, v)| *v > 0.0)
            .collect::<BTreeMap<_, _>>()
            .into())
    }
}

impl From<BTreeMap<String, f64>> for MultiplierMap {
    fn from(map: BTreeMap<String, f64>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for MultiplierMap {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        iter.into_iter().fold(Self::identity(), |acc, (k, v)| {
            let key: String = k.into();
            acc.with_override(&key, v)
        })
    }
}
