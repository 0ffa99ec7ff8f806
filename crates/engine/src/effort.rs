//! Effort aggregation across the five buckets

use crate::regional::apply_regional_adjustment;
use crate::resolver::Resolved;
use erp_calc_core::{
    Catalog, CatalogItem, EffortBuckets, EffortSliders, EstimateInput, EstimationConstants,
    Selection,
};
use std::collections::BTreeMap;

/// Days for one functional item: override first, then catalog days
pub fn item_days(item: &CatalogItem, day_overrides: &BTreeMap<String, u32>) -> u32 {
    day_overrides.get(&item.key).copied().unwrap_or(item.days)
}

/// Unadjusted functional days
pub fn aggregate_functional_days(resolved: &Resolved<'_>, day_overrides: &BTreeMap<String, u32>) -> u64 {
    resolved
        .counted()
        .map(|item| item_days(item, day_overrides) as u64)
        .sum()
}

pub fn forms_days(selected: &Selection, catalog: &Catalog) -> u64 {
    selected
        .iter()
        .filter_map(|key| catalog.form(key))
        .map(|f| f.days as u64)
        .sum()
}

pub fn interfaces_days(selected: &Selection, catalog: &Catalog) -> u64 {
    selected
        .iter()
        .filter_map(|key| catalog.interface(key))
        .map(|i| i.days as u64)
        .sum()
}

/// Security + tenant operations + migration cycles × per-cycle days
pub fn technical_days(effort: &EffortSliders, constants: &EstimationConstants) -> u64 {
    effort.security as u64
        + effort.tenant as u64
        + effort.migration_cycles as u64 * constants.migration_days_per_cycle as u64
}

/// Programme management + cutover + training + hypercare
pub fn wrapper_days(effort: &EffortSliders) -> u64 {
    effort.pmo as u64 + effort.cutover as u64 + effort.training as u64 + effort.hypercare as u64
}

/// Fill every bucket for one input
pub fn aggregate(resolved: &Resolved<'_>, input: &EstimateInput, catalog: &Catalog) -> EffortBuckets {
    let template_days = catalog.template_additional_days(&input.industry_template);
    EffortBuckets {
        functional_raw: aggregate_functional_days(resolved, &input.day_overrides),
        functional: apply_regional_adjustment(
            resolved,
            &input.day_overrides,
            &input.multipliers,
            template_days,
        ),
        forms: forms_days(&input.selected_forms, catalog),
        interfaces: interfaces_days(&input.selected_interfaces, catalog),
        technical: technical_days(&input.effort, catalog.constants()),
        wrapper: wrapper_days(&input.effort),
    }
}
