//! Timeline estimation from capacity

use erp_calc_core::{round_half_up, Timeline};

/// Weeks, months and utilisation for `final_days` of work
///
/// Team size and working days floor at 1 and weeks floor at 1, so the result
/// is always finite and positive.
pub fn estimate_timeline(
    final_days: u64,
    team_size: u32,
    working_days_per_week: u32,
    weeks_per_month: f64,
) -> Timeline {
    let capacity = team_size.max(1) as u64 * working_days_per_week.max(1) as u64;
    let weeks = final_days.div_ceil(capacity).max(1);

    let weeks_per_month = if weeks_per_month.is_finite() && weeks_per_month > 0.0 {
        weeks_per_month
    } else {
        4.33
    };
    let months = round_half_up(weeks as f64 / weeks_per_month * 10.0) / 10.0;

    let utilization = round_half_up(final_days as f64 / (capacity * weeks) as f64 * 100.0);
    Timeline {
        weeks,
        months,
        utilization_pct: (utilization as u64).min(100),
    }
}
