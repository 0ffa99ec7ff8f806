//! Risk profile and lookup table

use crate::numeric::coerce_non_negative;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ClientRelationship {
    New,
    #[default]
    Existing,
    Returning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum MigrationPath {
    #[default]
    Greenfield,
    EccMigration,
    LegacyMigration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum TimelinePressure {
    #[default]
    Standard,
    Aggressive,
    Relaxed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ComplexityLevel {
    Simple,
    #[default]
    Standard,
    Complex,
    VeryComplex,
}

/// The four categorical risk selections
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskProfile {
    #[serde(default)]
    pub client: ClientRelationship,
    #[serde(default)]
    pub migration: MigrationPath,
    #[serde(default)]
    pub timeline: TimelinePressure,
    #[serde(default)]
    pub complexity: ComplexityLevel,
}

fn positive_factors<'de, D, K>(deserializer: D) -> Result<BTreeMap<K, f64>, D::Error>
where
    D: Deserializer<'de>,
    K: Deserialize<'de> + Ord,
{
    let raw = BTreeMap::<K, Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(k, v)| (k, coerce_non_negative(&v)))
        .filter(|(_, v)| *v > 0.0)
        .collect())
}

/// Multiplier per risk category value
///
/// A missing entry contributes 1.0, so the composed multiplier stays positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskTable {
    #[serde(default = "default_client", deserialize_with = "positive_factors")]
    pub client_relationship: BTreeMap<ClientRelationship, f64>,
    #[serde(default = "default_migration", deserialize_with = "positive_factors")]
    pub migration_path: BTreeMap<MigrationPath, f64>,
    #[serde(default = "default_timeline", deserialize_with = "positive_factors")]
    pub timeline_pressure: BTreeMap<TimelinePressure, f64>,
    #[serde(default = "default_complexity", deserialize_with = "positive_factors")]
    pub complexity: BTreeMap<ComplexityLevel, f64>,
}

fn default_client() -> BTreeMap<ClientRelationship, f64> {
    BTreeMap::from([
        (ClientRelationship::New, 1.15),
        (ClientRelationship::Existing, 1.0),
        (ClientRelationship::Returning, 0.95),
    ])
}

fn default_migration() -> BTreeMap<MigrationPath, f64> {
    BTreeMap::from([
        (MigrationPath::Greenfield, 1.0),
        (MigrationPath::EccMigration, 1.25),
        (MigrationPath::LegacyMigration, 1.35),
    ])
}

fn default_timeline() -> BTreeMap<TimelinePressure, f64> {
    BTreeMap::from([
        (TimelinePressure::Standard, 1.0),
        (TimelinePressure::Aggressive, 1.3),
        (TimelinePressure::Relaxed, 0.9),
    ])
}

fn default_complexity() -> BTreeMap<ComplexityLevel, f64> {
    BTreeMap::from([
        (ComplexityLevel::Simple, 0.9),
        (ComplexityLevel::Standard, 1.0),
        (ComplexityLevel::Complex, 1.2),
        (ComplexityLevel::VeryComplex, 1.4),
    ])
}

impl Default for RiskTable {
    fn default() -> Self {
        Self {
            client_relationship: default_client(),
            migration_path: default_migration(),
            timeline_pressure: default_timeline(),
            complexity: default_complexity(),
        }
    }
}

impl RiskTable {
    /// The four factors for a profile, in category order
    pub fn factors(&self, profile: &RiskProfile) -> [f64; 4] {
        [
            self.client_relationship.get(&profile.client).copied().unwrap_or(1.0),
            self.migration_path.get(&profile.migration).copied().unwrap_or(1.0),
            self.timeline_pressure.get(&profile.timeline).copied().unwrap_or(1.0),
            self.complexity.get(&profile.complexity).copied().unwrap_or(1.0),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_factors() {
        let table = RiskTable::default();
        let profile = RiskProfile {
            client: ClientRelationship::New,
            migration: MigrationPath::LegacyMigration,
            timeline: TimelinePressure::Relaxed,
            complexity: ComplexityLevel::VeryComplex,
        };
        assert_eq!(table.factors(&profile), [1.15, 1.35, 0.9, 1.4]);
        assert_eq!(table.factors(&RiskProfile::default()), [1.0; 4]);
    }

    #[test]
    fn test_partial_table_falls_back_to_one() {
        let yaml = "complexity:\n  complex: 1.5\n  simple: -2\n";
        let table: RiskTable = serde_yaml::from_str(yaml).unwrap();
        let profile = RiskProfile {
            complexity: ComplexityLevel::Simple,
            ..Default::default()
        };
        // negative factor dropped, other categories keep their defaults
        assert_eq!(table.factors(&profile)[3], 1.0);
        assert_eq!(table.client_relationship.len(), 3);
    }

    #[test]
    fn test_profile_wire_names() {
        let profile: RiskProfile = serde_json::from_str(
            r#"{"client":"returning","migration":"eccMigration","timeline":"aggressive","complexity":"veryComplex"}"#,
        )
        .unwrap();
        assert_eq!(profile.migration, MigrationPath::EccMigration);
        assert_eq!(profile.complexity, ComplexityLevel::VeryComplex);
    }
}
