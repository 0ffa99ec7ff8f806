//! The full estimation pipeline
//!
//! selection → resolver → buckets (+ regional adjustment) → risk → discounts
//! → price; final days → timeline; add-on priced on its own; warnings last.

use crate::addon::compute_addon;
use crate::discount::apply_discounts;
use crate::effort::aggregate;
use crate::pricing::{grand_total, price, reference_figures};
use crate::resolver::resolve;
use crate::risk::{apply_risk, compute_risk_multiplier};
use crate::timeline::estimate_timeline;
use crate::warnings::{evaluate_warnings, WarningContext};
use erp_calc_core::{
    Catalog, EstimateInput, EstimateResult, EstimationEngine, PolicyThresholds, NO_TEMPLATE,
};
use std::sync::Arc;

/// Catalog-backed estimation engine
#[derive(Debug, Clone)]
pub struct Estimator {
    catalog: Arc<Catalog>,
    policy: PolicyThresholds,
}

impl Estimator {
    /// Engine using the catalog's own advisory thresholds
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let policy = catalog.policy().clone();
        Self { catalog, policy }
    }

    pub fn with_policy(mut self, policy: PolicyThresholds) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &PolicyThresholds {
        &self.policy
    }

    fn has_baseline_item(&self, input: &EstimateInput) -> bool {
        let baseline = self.policy.baseline_line_of_business;
        input
            .selected_items
            .iter()
            .filter_map(|key| self.catalog.item(key))
            .any(|item| item.line_of_business == baseline)
    }
}

impl EstimationEngine for Estimator {
    fn estimate(&self, input: &EstimateInput) -> EstimateResult {
        let catalog = self.catalog.as_ref();

        if input.industry_template != NO_TEMPLATE && catalog.template(&input.industry_template).is_none() {
            tracing::warn!(template = %input.industry_template, "Unknown industry template, adding no days");
        }

        let resolved = resolve(&input.selected_items, catalog);
        let buckets = aggregate(&resolved, input, catalog);
        let raw_total_days = buckets.total();

        let risk_multiplier = compute_risk_multiplier(&input.risk, catalog.risk_table());
        let risked_days = apply_risk(raw_total_days, risk_multiplier);

        let c = &input.commercial;
        let discount = apply_discounts(
            risked_days,
            c.base_rate,
            c.manday_discount_pct,
            c.manday_discount_enabled,
            c.rate_discount_pct,
        );
        let final_price = price(discount.final_days, discount.final_rate, c.rounding);

        let timeline = estimate_timeline(
            discount.final_days,
            input.team.team_size,
            input.team.working_days_per_week,
            catalog.constants().weeks_per_month,
        );

        let addon_tier = input.addon.tier.as_deref().and_then(|key| {
            let tier = catalog.addon_tier(key);
            if tier.is_none() {
                tracing::warn!(tier = %key, "Unknown add-on tier, pricing no add-on");
            }
            tier
        });
        let addon = compute_addon(
            addon_tier,
            catalog.constants().addon_horizon_years,
            input.addon.discount_pct,
            input.addon.rate,
            c.rounding,
        );

        let reference = reference_figures(
            buckets.functional_raw,
            c.reference_rate,
            c.fx,
            c.rounding,
            discount.final_days,
        );

        let warnings = evaluate_warnings(
            &WarningContext {
                has_baseline_item: self.has_baseline_item(input),
                admin_override: input.admin_override,
                manday_discount_pct: c.manday_discount_pct,
                manday_discount_enabled: c.manday_discount_enabled,
                rate_discount_pct: c.rate_discount_pct,
                wrapper_days: buckets.wrapper,
                risk_multiplier,
                final_days: discount.final_days,
                weeks: timeline.weeks,
            },
            &self.policy,
        );

        tracing::debug!(
            tier = %input.tier,
            bundles = resolved.bundles.len(),
            atomic = resolved.atomic.len(),
            suppressed = resolved.suppressed.len(),
            raw_total_days,
            risk_multiplier,
            final_days = discount.final_days,
            final_rate = discount.final_rate,
            final_price,
            weeks = timeline.weeks,
            warnings = warnings.len(),
            "Estimate computed"
        );

        EstimateResult {
            tier: input.tier,
            resolved: resolved.summary(),
            buckets,
            raw_total_days,
            risk_multiplier,
            risked_days,
            final_days: discount.final_days,
            final_rate: discount.final_rate,
            final_price,
            grand_total: grand_total(final_price, &addon, input.addon.include_in_total),
            discount,
            timeline,
            addon,
            reference,
            warnings,
        }
    }

    fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::catalog;
    use erp_calc_core::{AdvisoryCode, Selection};

    fn engine() -> Estimator {
        Estimator::new(Arc::new(catalog()))
    }

    #[test]
    fn test_pipeline_end_to_end() {
        let mut input = EstimateInput::default();
        input.selected_items = ["fin_base", "p2p", "drc"].into_iter().collect();
        input.selected_forms = ["f_invoice"].into_iter().collect();
        input.selected_interfaces = ["if_payroll"].into_iter().collect();

        let result = engine().estimate(&input);

        // functional 424 + 39, forms 4, interfaces 5, technical 75, wrapper 97
        assert_eq!(result.buckets.functional, 463);
        assert_eq!(result.raw_total_days, 463 + 4 + 5 + 75 + 97);
        assert_eq!(result.final_days, 644);
        assert_eq!(result.final_rate, 2000);
        assert_eq!(result.final_price, 644 * 2000);
        assert_eq!(result.grand_total, result.final_price);
        assert_eq!(result.resolved.suppressed, vec!["p2p".to_string()]);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_input_is_not_mutated() {
        let mut input = EstimateInput::default();
        input.selected_items = ["crm"].into_iter().collect();
        let before = input.clone();
        let _ = engine().estimate(&input);
        assert_eq!(input, before);
    }

    #[test]
    fn test_non_baseline_selection_warns() {
        let mut input = EstimateInput::default();
        input.selected_items = Selection::new().with("crm");
        let result = engine().estimate(&input);
        assert!(result.has_warning(AdvisoryCode::MissingBaseline));

        input.admin_override = true;
        assert!(!engine().estimate(&input).has_warning(AdvisoryCode::MissingBaseline));
    }

    #[test]
    fn test_unknown_addon_tier_prices_nothing() {
        let mut input = EstimateInput::default();
        input.addon.tier = Some("ams99".to_string());
        input.addon.include_in_total = true;
        let result = engine().estimate(&input);
        assert_eq!(result.addon.price, 0);
        assert_eq!(result.grand_total, result.final_price);
    }

    #[test]
    fn test_custom_policy() {
        let mut policy = PolicyThresholds::default();
        policy.min_wrapper_days = 200;
        let engine = engine().with_policy(policy);

        let mut input = EstimateInput::default();
        input.selected_items = Selection::new().with("p2p");
        assert!(engine
            .estimate(&input)
            .has_warning(AdvisoryCode::WrapperUnderScoped));
    }
}
