//! Support add-on pricing
//!
//! Independent of risk and of the main discount cascade.

use erp_calc_core::{round_to_granularity, to_count, AddonQuote, AddonTier};

pub fn compute_addon(
    tier: Option<&AddonTier>,
    horizon_years: u32,
    discount_pct: f64,
    per_day_rate: f64,
    granularity: u64,
) -> AddonQuote {
    let Some(tier) = tier else {
        return AddonQuote::default();
    };

    let base_days = tier.days_per_year as u64 * horizon_years as u64;
    let pct = if discount_pct.is_finite() {
        discount_pct.clamp(0.0, 100.0)
    } else {
        0.0
    };
    let days = to_count(base_days as f64 * (1.0 - pct / 100.0));

    AddonQuote {
        tier: Some(tier.key.clone()),
        days,
        price: round_to_granularity(days as f64 * per_day_rate, granularity),
        base_days,
        base_price: round_to_granularity(base_days as f64 * per_day_rate, granularity),
    }
}
