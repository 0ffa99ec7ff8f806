//! Report grouping over the fine-grained buckets

use erp_calc_core::{Bucket, EffortBuckets};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Ordered rows of an effort table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLayout {
    pub name: String,
    pub rows: Vec<Bucket>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub bucket: Bucket,
    pub label: String,
    pub days: u64,
}

impl ReportLayout {
    /// Forms and interfaces merged into one FRICEW row
    pub fn fricew() -> Self {
        Self {
            name: "fricew".to_string(),
            rows: vec![Bucket::Functional, Bucket::Fricew, Bucket::Technical, Bucket::Wrapper],
        }
    }

    /// Every bucket on its own row
    pub fn detailed() -> Self {
        Self {
            name: "detailed".to_string(),
            rows: vec![
                Bucket::Functional,
                Bucket::Forms,
                Bucket::Interfaces,
                Bucket::Technical,
                Bucket::Wrapper,
            ],
        }
    }

    /// FRICEW merged, technical and wrapper merged
    pub fn compact() -> Self {
        Self {
            name: "compact".to_string(),
            rows: vec![Bucket::Functional, Bucket::Fricew, Bucket::TechnicalAndWrapper],
        }
    }

    pub fn render(&self, buckets: &EffortBuckets) -> Vec<ReportRow> {
        self.rows
            .iter()
            .map(|&bucket| ReportRow {
                bucket,
                label: bucket.label().to_string(),
                days: buckets.get(bucket),
            })
            .collect()
    }
}

impl Default for ReportLayout {
    fn default() -> Self {
        Self::fricew()
    }
}

impl FromStr for ReportLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fricew" => Ok(Self::fricew()),
            "detailed" => Ok(Self::detailed()),
            "compact" => Ok(Self::compact()),
            other => Err(format!("unknown report layout '{}'", other)),
        }
    }
}
