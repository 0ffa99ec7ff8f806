//! Pricing and rounding

use erp_calc_core::{round_half_up, round_to_granularity, AddonQuote, ReferenceFigures};

/// `roundTo(final_days × final_rate, granularity)`
pub fn price(final_days: u64, final_rate: u64, granularity: u64) -> u64 {
    round_to_granularity(final_days as f64 * final_rate as f64, granularity)
}

pub fn grand_total(project_price: u64, addon: &AddonQuote, include_addon: bool) -> u64 {
    if include_addon {
        project_price + addon.price
    } else {
        project_price
    }
}

/// Reference offering priced in the billing currency, plus the efficiency of
/// the final days against it
pub fn reference_figures(
    raw_functional_days: u64,
    reference_rate: f64,
    fx: f64,
    granularity: u64,
    final_days: u64,
) -> ReferenceFigures {
    let price = round_to_granularity(raw_functional_days as f64 * reference_rate * fx, granularity);
    let ratio = final_days as f64 / raw_functional_days.max(1) as f64;
    ReferenceFigures {
        days: raw_functional_days,
        price,
        efficiency_pct: round_half_up((1.0 - ratio) * 100.0) as i64,
    }
}
