//! Regional adjustment of functional effort
//!
//! Each counted item is scaled by its multiplier and rounded on its own; the
//! template's flat days are added once at the end.

use crate::effort::item_days;
use crate::resolver::Resolved;
use erp_calc_core::{to_count, MultiplierMap};
use std::collections::BTreeMap;

pub fn apply_regional_adjustment(
    resolved: &Resolved<'_>,
    day_overrides: &BTreeMap<String, u32>,
    multipliers: &MultiplierMap,
    template_additional_days: u32,
) -> u64 {
    let scaled: u64 = resolved
        .counted()
        .map(|item| {
            let days = item_days(item, day_overrides) as f64;
            to_count(days * multipliers.get(&item.key))
        })
        .sum();

    scaled + template_additional_days as u64
}
