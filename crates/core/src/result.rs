//! Engine output
//!
//! Plain serialisable data, recomputed in full for every input.

use crate::preset::Tier;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which catalog items counted toward functional effort
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSummary {
    pub bundles: Vec<String>,
    pub atomic: Vec<String>,
    /// Selected atomic items subsumed by a selected bundle
    pub suppressed: Vec<String>,
}

/// Fine-grained effort buckets (days)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffortBuckets {
    /// Functional days before regional adjustment
    pub functional_raw: u64,
    /// Functional days after multipliers and template days
    pub functional: u64,
    pub forms: u64,
    pub interfaces: u64,
    pub technical: u64,
    pub wrapper: u64,
}

impl EffortBuckets {
    /// Forms plus interfaces
    pub fn fricew(&self) -> u64 {
        self.forms + self.interfaces
    }

    /// Pre-risk total
    pub fn total(&self) -> u64 {
        self.functional + self.forms + self.interfaces + self.technical + self.wrapper
    }

    pub fn get(&self, bucket: Bucket) -> u64 {
        match bucket {
            Bucket::Functional => self.functional,
            Bucket::Forms => self.forms,
            Bucket::Interfaces => self.interfaces,
            Bucket::Fricew => self.fricew(),
            Bucket::Technical => self.technical,
            Bucket::Wrapper => self.wrapper,
            Bucket::TechnicalAndWrapper => self.technical + self.wrapper,
        }
    }
}

/// A report row; some rows merge fine-grained buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Bucket {
    Functional,
    Forms,
    Interfaces,
    Fricew,
    Technical,
    Wrapper,
    TechnicalAndWrapper,
}

impl Bucket {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Functional => "Functional",
            Self::Forms => "Forms",
            Self::Interfaces => "Interfaces",
            Self::Fricew => "FRICEW (Forms + Interfaces)",
            Self::Technical => "Technical",
            Self::Wrapper => "Delivery Wrapper",
            Self::TechnicalAndWrapper => "Technical & Wrapper",
        }
    }
}

/// Result of the two-step discount cascade
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountOutcome {
    pub risked_days: u64,
    pub final_days: u64,
    pub base_rate: f64,
    pub final_rate: u64,
    /// Days removed by the manday discount
    pub days_delta: u64,
    /// Rate removed by the rate discount
    pub rate_delta: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub weeks: u64,
    pub months: f64,
    pub utilization_pct: u64,
}

/// Priced support add-on
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddonQuote {
    pub tier: Option<String>,
    pub days: u64,
    pub price: u64,
    pub base_days: u64,
    pub base_price: u64,
}

/// Comparison against the reference offering, priced in the billing currency
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceFigures {
    /// Unadjusted functional days
    pub days: u64,
    pub price: u64,
    /// Saving of final days against the reference days; may be negative
    pub efficiency_pct: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryCode {
    MissingBaseline,
    MandayDiscountAboveCap,
    RateDiscountAboveCap,
    WrapperUnderScoped,
    HighRisk,
    LargeScope,
    LongTimeline,
}

impl AdvisoryCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingBaseline => "missing_baseline",
            Self::MandayDiscountAboveCap => "manday_discount_above_cap",
            Self::RateDiscountAboveCap => "rate_discount_above_cap",
            Self::WrapperUnderScoped => "wrapper_under_scoped",
            Self::HighRisk => "high_risk",
            Self::LargeScope => "large_scope",
            Self::LongTimeline => "long_timeline",
        }
    }
}

impl fmt::Display for AdvisoryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-blocking warning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advisory {
    pub code: AdvisoryCode,
    pub message: String,
}

impl Advisory {
    pub fn new(code: AdvisoryCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateResult {
    pub tier: Tier,
    pub resolved: ResolvedSummary,
    pub buckets: EffortBuckets,
    /// Sum of buckets before risk
    pub raw_total_days: u64,
    pub risk_multiplier: f64,
    pub risked_days: u64,
    pub discount: DiscountOutcome,
    pub final_days: u64,
    pub final_rate: u64,
    pub final_price: u64,
    /// Final price plus the add-on price when it is included
    pub grand_total: u64,
    pub timeline: Timeline,
    pub addon: AddonQuote,
    pub reference: ReferenceFigures,
    pub warnings: Vec<Advisory>,
}

impl EstimateResult {
    pub fn has_warning(&self, code: AdvisoryCode) -> bool {
        self.warnings.iter().any(|w| w.code == code)
    }
}
