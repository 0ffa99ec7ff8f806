//! Risk composition

use erp_calc_core::{to_count, RiskProfile, RiskTable};

/// Product of the four categorical factors; never clamped
pub fn compute_risk_multiplier(profile: &RiskProfile, table: &RiskTable) -> f64 {
    table.factors(profile).iter().product()
}

/// `round(pre_risk_total × multiplier)`
pub fn apply_risk(pre_risk_total: u64, multiplier: f64) -> u64 {
    to_count(pre_risk_total as f64 * multiplier)
}
