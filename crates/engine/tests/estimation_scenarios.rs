//! End-to-end estimation scenarios against the default catalog

use erp_calc_config::CatalogConfig;
use erp_calc_core::{
    AdvisoryCode, ClientRelationship, ComplexityLevel, EstimateInput, MigrationPath,
    RiskProfile, Selection, Tier, TimelinePressure,
};
use erp_calc_engine::{apply_template, apply_tier, EstimationEngine, Estimator};
use std::sync::Arc;

fn engine() -> Estimator {
    let catalog = CatalogConfig::embedded()
        .expect("embedded catalog parses")
        .clone()
        .into_catalog();
    Estimator::new(Arc::new(catalog))
}

/// An input whose pre-risk total is exactly 500 days
/// (328 functional + 75 technical + 97 wrapper)
fn five_hundred_day_input() -> EstimateInput {
    let mut input = EstimateInput::default();
    input.selected_items = Selection::new().with("fin_master_data_mgt");
    input.day_overrides.insert("fin_master_data_mgt".to_string(), 328);
    input
}

#[test]
fn test_bundle_absorbs_item_in_same_scope() {
    let engine = engine();
    let mut input = EstimateInput::default();
    input.selected_items = ["p2p_inv_acct", "finance_base_424"].into_iter().collect();

    let result = engine.estimate(&input);
    assert_eq!(result.buckets.functional_raw, 424);
    assert_eq!(result.resolved.suppressed, vec!["p2p_inv_acct".to_string()]);

    // deselecting the bundle brings the item back
    input.selected_items = input.selected_items.without("finance_base_424");
    let result = engine.estimate(&input);
    assert_eq!(result.buckets.functional_raw, 90);
    assert!(result.resolved.suppressed.is_empty());
}

#[test]
fn test_selection_order_is_irrelevant() {
    let engine = engine();
    let mut a = EstimateInput::default();
    a.selected_items = ["finance_base_424", "drc_tax", "lease"].into_iter().collect();
    let mut b = EstimateInput::default();
    b.selected_items = ["lease", "drc_tax", "finance_base_424"].into_iter().collect();

    assert_eq!(engine.estimate(&a), engine.estimate(&b));
}

#[test]
fn test_discount_cascade_reference_figures() {
    let mut input = five_hundred_day_input();
    input.commercial.manday_discount_pct = 15.0;
    input.commercial.rate_discount_pct = 10.0;

    let result = engine().estimate(&input);
    assert_eq!(result.risked_days, 500);
    assert_eq!(result.final_days, 425);
    assert_eq!(result.final_rate, 1800);
    assert_eq!(result.final_price, 765_000);
    assert_eq!(result.discount.days_delta, 75);
    // 15% and 10% sit exactly on the ceilings: no advisory
    assert!(!result.has_warning(AdvisoryCode::MandayDiscountAboveCap));
    assert!(!result.has_warning(AdvisoryCode::RateDiscountAboveCap));
}

#[test]
fn test_timeline_reference_figures() {
    let result = engine().estimate(&five_hundred_day_input());
    assert_eq!(result.final_days, 500);
    assert_eq!(result.timeline.weeks, 20);
    assert!((result.timeline.months - 4.6).abs() < 1e-9);
    assert_eq!(result.timeline.utilization_pct, 100);
}

#[test]
fn test_addon_reference_figures() {
    let mut input = five_hundred_day_input();
    input.addon.tier = Some("ams40".to_string());
    input.addon.discount_pct = 15.0;
    input.addon.rate = 1900.0;

    let result = engine().estimate(&input);
    assert_eq!(result.addon.base_days, 120);
    assert_eq!(result.addon.days, 102);
    assert_eq!(result.addon.price, 102 * 1900);
    // not folded in unless asked
    assert_eq!(result.grand_total, result.final_price);

    input.addon.include_in_total = true;
    let result = engine().estimate(&input);
    assert_eq!(result.grand_total, result.final_price + 102 * 1900);
}

#[test]
fn test_premium_preset() {
    let engine = engine();
    let input = apply_tier(&EstimateInput::default(), Tier::Premium, engine.catalog(), None)
        .expect("premium preset exists");

    let result = engine.estimate(&input);
    // 424 + 193 + 129 + 123 + 129 + 39
    assert_eq!(result.buckets.functional, 1037);
    assert_eq!(result.buckets.technical, 110);
    assert_eq!(result.buckets.wrapper, 143);
    assert_eq!(result.final_days, 1290);
    assert_eq!(result.final_price, 2_580_000);
    assert_eq!(result.timeline.weeks, 52);
    assert!(result.has_warning(AdvisoryCode::LargeScope));
    assert!(result.has_warning(AdvisoryCode::LongTimeline));
}

#[test]
fn test_standard_preset_with_food_processing_template() {
    let engine = engine();
    let input = apply_tier(&EstimateInput::default(), Tier::Standard, engine.catalog(), None)
        .and_then(|input| apply_template(&input, "foodProcessing", engine.catalog()))
        .expect("preset and template exist");

    let result = engine.estimate(&input);
    assert_eq!(result.buckets.functional_raw, 451);
    // collections 26 × 1.1 → 29, plus 20 template days
    assert_eq!(result.buckets.functional, 474);
    assert_eq!(result.buckets.forms, 16);
    assert_eq!(result.buckets.interfaces, 13);
    assert_eq!(result.raw_total_days, 723);
    assert!(result.warnings.is_empty());
}

#[test]
fn test_essential_preset_excludes_synchronised_key() {
    let engine = engine();
    let mut input = EstimateInput::default();
    input.selected_items = Selection::new().with("drc_tax");
    let input = apply_tier(&input, Tier::Essential, engine.catalog(), None).unwrap();
    assert!(!input.selected_items.contains("drc_tax"));
    assert_eq!(input.selected_items.len(), 7);
}

#[test]
fn test_high_risk_profile() {
    let mut input = five_hundred_day_input();
    input.risk = RiskProfile {
        client: ClientRelationship::New,
        migration: MigrationPath::LegacyMigration,
        timeline: TimelinePressure::Aggressive,
        complexity: ComplexityLevel::VeryComplex,
    };

    let result = engine().estimate(&input);
    assert!((result.risk_multiplier - 2.82555).abs() < 1e-9);
    assert_eq!(result.risked_days, 1413);
    assert!(result.has_warning(AdvisoryCode::HighRisk));
}

#[test]
fn test_garbage_json_input_still_estimates() {
    let input: EstimateInput = serde_json::from_str(
        r#"{
            "selectedItems": ["drc_tax", "not_a_key"],
            "commercial": {"baseRate": "abc", "rounding": -10},
            "team": {"teamSize": 0, "workingDaysPerWeek": "0"},
            "effort": {"pmo": null}
        }"#,
    )
    .expect("lenient input parses");

    let result = engine().estimate(&input);
    assert_eq!(result.final_rate, 0);
    assert_eq!(result.final_price, 0);
    assert!(result.timeline.weeks >= 1);
    assert!(result.timeline.months.is_finite());
}
