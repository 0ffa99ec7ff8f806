//! Advisory thresholds

use crate::catalog::LineOfBusiness;
use serde::{Deserialize, Serialize};

/// Soft limits checked by the warnings evaluator
///
/// None of these clamp a computed value; crossing one only raises an advisory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyThresholds {
    /// Manday discount ceiling (%)
    #[serde(default = "default_max_manday_discount")]
    pub max_manday_discount_pct: f64,
    /// Rate discount ceiling (%)
    #[serde(default = "default_max_rate_discount")]
    pub max_rate_discount_pct: f64,
    /// Wrapper effort below this looks under-scoped
    #[serde(default = "default_min_wrapper_days")]
    pub min_wrapper_days: u64,
    #[serde(default = "default_high_risk_multiplier")]
    pub high_risk_multiplier: f64,
    #[serde(default = "default_large_scope_days")]
    pub large_scope_days: u64,
    #[serde(default = "default_long_timeline_weeks")]
    pub long_timeline_weeks: u64,
    /// At least one selected item should come from this line of business
    #[serde(default = "default_baseline_line_of_business")]
    pub baseline_line_of_business: LineOfBusiness,
}

fn default_max_manday_discount() -> f64 {
    15.0
}

fn default_max_rate_discount() -> f64 {
    10.0
}

fn default_min_wrapper_days() -> u64 {
    40
}

fn default_high_risk_multiplier() -> f64 {
    1.3
}

fn default_large_scope_days() -> u64 {
    800
}

fn default_long_timeline_weeks() -> u64 {
    30
}

fn default_baseline_line_of_business() -> LineOfBusiness {
    LineOfBusiness::Finance
}

impl Default for PolicyThresholds {
    fn default() -> Self {
        Self {
            max_manday_discount_pct: default_max_manday_discount(),
            max_rate_discount_pct: default_max_rate_discount(),
            min_wrapper_days: default_min_wrapper_days(),
            high_risk_multiplier: default_high_risk_multiplier(),
            large_scope_days: default_large_scope_days(),
            long_timeline_weeks: default_long_timeline_weeks(),
            baseline_line_of_business: default_baseline_line_of_business(),
        }
    }
}
