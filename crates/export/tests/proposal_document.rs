//! Proposal building and rendering against the default catalog

use chrono::{DateTime, NaiveDate, Utc};
use erp_calc_config::CatalogConfig;
use erp_calc_core::{EstimateInput, EstimationEngine, Selection};
use erp_calc_engine::{Estimator, ReportLayout};
use erp_calc_export::{
    create_renderer, DocumentRenderer, HtmlProposalRenderer, ProposalOptions, ProposalPayload,
};
use std::sync::Arc;

fn engine() -> Estimator {
    let catalog = CatalogConfig::embedded()
        .expect("embedded catalog parses")
        .clone()
        .into_catalog();
    Estimator::new(Arc::new(catalog))
}

fn generated_at() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(1_767_571_200, 0).unwrap()
}

/// 500 pre-risk days (323 + 5 interface + 75 technical + 97 wrapper),
/// 15% manday and 10% rate discount
fn discounted_input() -> EstimateInput {
    let mut input = EstimateInput::default();
    input.selected_items = Selection::new().with("fin_master_data_mgt");
    input.selected_forms = ["not_a_form"].into_iter().collect();
    input.selected_interfaces = ["if_bank_export"].into_iter().collect();
    input.day_overrides.insert("fin_master_data_mgt".to_string(), 323);
    input.commercial.manday_discount_pct = 15.0;
    input.commercial.rate_discount_pct = 10.0;
    input
}

fn build(input: &EstimateInput, options: &ProposalOptions) -> ProposalPayload {
    let engine = engine();
    let result = engine.estimate(input);
    ProposalPayload::build(input, &result, engine.catalog(), options, generated_at())
}

#[test]
fn test_financials_reconcile() {
    let proposal = build(&discounted_input(), &ProposalOptions::default());
    let f = &proposal.financials;

    assert_eq!(f.base_days, 500);
    assert_eq!(f.base_amount, 1_000_000);
    assert_eq!(f.manday_discount_amount, 150_000);
    assert_eq!(f.rate_discount_amount, 85_000);
    assert_eq!(f.implementation_subtotal, 765_000);
    assert_eq!(
        f.base_amount - f.manday_discount_amount - f.rate_discount_amount,
        f.implementation_subtotal
    );
    assert_eq!(
        proposal.milestones.iter().map(|m| m.amount).sum::<u64>(),
        765_000
    );
    // no add-on row without an add-on
    assert_eq!(proposal.commercials.len(), 1);
}

#[test]
fn test_header_fields() {
    let options = ProposalOptions {
        client_name: "Acme Foods Berhad".to_string(),
        start_date: NaiveDate::from_ymd_opt(2026, 2, 2),
        ..Default::default()
    };
    let proposal = build(&discounted_input(), &options);

    assert_eq!(proposal.client_short, "ACMEFOODSBERHAD");
    assert!(proposal.proposal_id.starts_with("ABMY-"));
    assert_eq!(proposal.validity_days, 30);
    assert_eq!(proposal.valid_until, NaiveDate::from_ymd_opt(2026, 2, 4).unwrap());
    assert_eq!(proposal.timeline_weeks, 17);
    assert_eq!(proposal.phases.len(), 6);
    assert_eq!(proposal.phases[0].start, NaiveDate::from_ymd_opt(2026, 2, 2).unwrap());
}

#[test]
fn test_scope_lists_only_known_selections() {
    let proposal = build(&discounted_input(), &ProposalOptions::default());
    let columns = &proposal.scope_columns;

    assert_eq!(columns[0].items, vec!["Financial Master Data Management".to_string()]);
    assert!(columns[1].items.is_empty());
    assert_eq!(columns[2].items, vec!["Bank Export File (payment)".to_string()]);
}

#[test]
fn test_addon_row_when_priced() {
    let mut input = discounted_input();
    input.addon.tier = Some("ams40".to_string());
    input.addon.include_in_total = true;

    let proposal = build(&input, &ProposalOptions::default());
    assert_eq!(proposal.commercials.len(), 2);
    assert_eq!(proposal.commercials[1].net, 102 * 1900);
    assert_eq!(proposal.grand_total, 765_000 + 102 * 1900);
    assert!(proposal.financials.addon_included);
}

#[test]
fn test_html_is_escaped_and_follows_layout() {
    let options = ProposalOptions {
        client_name: "<script>alert('x')</script>".to_string(),
        ..Default::default()
    };
    let proposal = build(&discounted_input(), &options);

    let html = HtmlProposalRenderer::new(ReportLayout::detailed())
        .render(&proposal)
        .unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;"));
    assert!(html.contains("<td>Interfaces</td>"));
    assert!(html.contains("RM 765,000"));

    let html = HtmlProposalRenderer::new(ReportLayout::fricew())
        .render(&proposal)
        .unwrap();
    assert!(html.contains("FRICEW"));
    assert!(!html.contains("<td>Interfaces</td>"));
}

#[test]
fn test_warnings_render_as_considerations() {
    let mut input = discounted_input();
    input.commercial.rate_discount_pct = 12.5;

    let proposal = build(&input, &ProposalOptions::default());
    let html = create_renderer("html", ReportLayout::default())
        .unwrap()
        .render(&proposal)
        .unwrap();
    assert!(html.contains("rate_discount_above_cap"));
    assert!(!html.contains("No open considerations"));
}

#[test]
fn test_json_renderer_and_unknown_format() {
    let proposal = build(&discounted_input(), &ProposalOptions::default());
    let renderer = create_renderer("JSON", ReportLayout::default()).unwrap();
    assert_eq!(renderer.content_type(), "application/json");

    let value: serde_json::Value = serde_json::from_str(&renderer.render(&proposal).unwrap()).unwrap();
    assert_eq!(value["financials"]["implementationSubtotal"], 765_000);
    assert_eq!(value["packageTier"], "essential");

    assert!(create_renderer("pdf", ReportLayout::default()).is_err());
}
