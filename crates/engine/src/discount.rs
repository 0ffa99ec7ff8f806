//! Discount cascade: manday discount, then rate discount
//!
//! Policy ceilings are advisory; nothing here clamps to them. Percentages are
//! only bounded to 0..=100 so a factor never turns negative.

use erp_calc_core::{to_count, DiscountOutcome};

fn factor(pct: f64) -> f64 {
    let pct = if pct.is_finite() { pct.clamp(0.0, 100.0) } else { 0.0 };
    1.0 - pct / 100.0
}

pub fn apply_discounts(
    risked_days: u64,
    base_rate: f64,
    manday_pct: f64,
    manday_enabled: bool,
    rate_pct: f64,
) -> DiscountOutcome {
    let manday_factor = if manday_enabled { factor(manday_pct) } else { 1.0 };
    let final_days = to_count(risked_days as f64 * manday_factor);
    let final_rate = to_count(base_rate * factor(rate_pct));

    DiscountOutcome {
        risked_days,
        final_days,
        base_rate,
        final_rate,
        days_delta: risked_days.saturating_sub(final_days),
        rate_delta: base_rate - final_rate as f64,
    }
}
