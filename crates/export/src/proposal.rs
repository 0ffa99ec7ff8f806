//! Client-facing proposal payload
//!
//! Everything a proposal document shows, derived from one estimate. The
//! payload is plain data so it can be rendered to HTML or handed to another
//! consumer as JSON.

use crate::format::{base36, currency, percent, CURRENCY_SYMBOL};
use chrono::{DateTime, Days, NaiveDate, Utc};
use erp_calc_core::{
    round_half_up, to_count, Advisory, Catalog, EffortBuckets, EstimateInput, EstimateResult,
    Selection, Tier, NO_TEMPLATE,
};
use serde::{Deserialize, Serialize};

pub const VALIDITY_DAYS: u64 = 30;

pub const PRICE_NOTE: &str = "Client pricing is based on mandays × rate. Taxes excluded.";

/// Delivery phases and their share of the timeline
const PHASE_SPLIT: [(&str, f64); 6] = [
    ("Project Prep", 0.10),
    ("Explore/Design", 0.25),
    ("Build/Configure", 0.30),
    ("Test", 0.18),
    ("Cutover", 0.10),
    ("Go-Live & Hypercare", 0.07),
];

/// Payment milestones: name, trigger, share of the implementation subtotal
const MILESTONE_SPLIT: [(&str, &str, f64); 3] = [
    ("Project Start", "Kick-off", 0.30),
    ("UAT Start", "UAT begins", 0.40),
    ("Go-Live", "Go-live", 0.30),
];

/// Caller-supplied details that are not part of the estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProposalOptions {
    pub client_name: String,
    pub client_short: Option<String>,
    /// First day of the project; defaults to the generation date
    pub start_date: Option<NaiveDate>,
    pub currency_symbol: String,
}

impl Default for ProposalOptions {
    fn default() -> Self {
        Self {
            client_name: "Client".to_string(),
            client_short: None,
            start_date: None,
            currency_symbol: CURRENCY_SYMBOL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub weeks: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommercialRow {
    pub label: String,
    pub base: u64,
    pub net: u64,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub name: String,
    pub when: String,
    pub amount: u64,
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeColumn {
    pub title: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRow {
    pub key: String,
    pub value: String,
}

impl AuditRow {
    fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// The exact commercial figures a proposal quotes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Financials {
    pub base_days: u64,
    pub base_rate: f64,
    pub base_amount: u64,
    pub manday_pct: f64,
    pub rate_pct: f64,
    pub manday_days_delta: u64,
    pub manday_discount_amount: u64,
    pub rate_discount_amount: u64,
    pub final_days: u64,
    pub final_rate: u64,
    pub implementation_subtotal: u64,
    pub addon_base_days: u64,
    pub addon_base_price: u64,
    pub addon_days: u64,
    pub addon_price: u64,
    pub addon_included: bool,
    pub rounding: u64,
    pub grand_total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalPayload {
    pub client_name: String,
    pub client_short: String,
    pub package_tier: Tier,
    pub proposal_id: String,
    pub validity_days: u64,
    pub valid_until: NaiveDate,
    pub generated_at: DateTime<Utc>,
    pub currency_symbol: String,

    pub grand_total: u64,
    pub total_mandays: u64,
    pub timeline_weeks: u64,
    pub team_size: u32,
    pub timeline_summary: String,
    pub industry_template: Option<String>,

    pub phases: Vec<Phase>,
    pub commercials: Vec<CommercialRow>,
    pub price_note: String,
    pub milestones: Vec<Milestone>,
    pub scope_columns: Vec<ScopeColumn>,
    pub input_audit: Vec<AuditRow>,

    pub effort: EffortBuckets,
    pub warnings: Vec<Advisory>,
    pub financials: Financials,
}

impl ProposalPayload {
    pub fn build(
        input: &EstimateInput,
        result: &EstimateResult,
        catalog: &Catalog,
        options: &ProposalOptions,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let symbol = options.currency_symbol.as_str();
        let client_name = match options.client_name.trim() {
            "" => "Client".to_string(),
            name => name.to_string(),
        };
        let client_short = options
            .client_short
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(&client_name)
            .split_whitespace()
            .collect::<String>()
            .to_uppercase();

        let financials = financials(input, result);
        let start = options
            .start_date
            .unwrap_or_else(|| generated_at.date_naive());

        let industry_template = if input.industry_template == NO_TEMPLATE {
            None
        } else {
            catalog
                .template(&input.industry_template)
                .map(|t| t.name.clone())
        };

        let payload = Self {
            proposal_id: proposal_id(generated_at),
            validity_days: VALIDITY_DAYS,
            valid_until: add_days(generated_at.date_naive(), VALIDITY_DAYS),
            generated_at,
            currency_symbol: symbol.to_string(),
            package_tier: result.tier,
            grand_total: result.grand_total,
            total_mandays: result.final_days,
            timeline_weeks: result.timeline.weeks,
            team_size: input.team.team_size,
            timeline_summary: format!(
                "{} weeks · {} FTE · {} days/week",
                result.timeline.weeks, input.team.team_size, input.team.working_days_per_week
            ),
            industry_template,
            phases: schedule_phases(result.timeline.weeks, start),
            commercials: commercial_rows(result, catalog, &financials, symbol),
            price_note: PRICE_NOTE.to_string(),
            milestones: milestones(financials.implementation_subtotal, symbol),
            scope_columns: scope_columns(input, catalog),
            input_audit: input_audit(input, result, symbol),
            effort: result.buckets,
            warnings: result.warnings.clone(),
            financials,
            client_name,
            client_short,
        };

        tracing::debug!(
            proposal_id = %payload.proposal_id,
            tier = %payload.package_tier,
            grand_total = payload.grand_total,
            phases = payload.phases.len(),
            "Proposal payload built"
        );
        payload
    }
}

/// `ABMY-` followed by the base-36 millisecond timestamp
pub fn proposal_id(at: DateTime<Utc>) -> String {
    let millis = u64::try_from(at.timestamp_millis()).unwrap_or(0);
    format!("ABMY-{}", base36(millis))
}

fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days))
        .unwrap_or(NaiveDate::MAX)
}

/// Lay the phases end to end from `start`, each at least one week long
pub fn schedule_phases(total_weeks: u64, start: NaiveDate) -> Vec<Phase> {
    let mut cursor = start;
    PHASE_SPLIT
        .iter()
        .map(|&(name, share)| {
            let weeks = to_count(round_half_up(total_weeks as f64 * share)).max(1);
            let end = add_days(cursor, weeks.saturating_mul(7) - 1);
            let phase = Phase {
                name: name.to_string(),
                start: cursor,
                end,
                weeks,
            };
            cursor = add_days(end, 1);
            phase
        })
        .collect()
}

/// Split the implementation subtotal 30/40/30; the last milestone absorbs
/// rounding so the amounts always sum to the subtotal
pub fn milestones(subtotal: u64, symbol: &str) -> Vec<Milestone> {
    let mut allocated = 0u64;
    let last = MILESTONE_SPLIT.len() - 1;
    MILESTONE_SPLIT
        .iter()
        .enumerate()
        .map(|(i, &(name, when, share))| {
            let amount = if i == last {
                subtotal.saturating_sub(allocated)
            } else {
                to_count(round_half_up(subtotal as f64 * share)).min(subtotal - allocated)
            };
            allocated += amount;
            Milestone {
                name: name.to_string(),
                when: when.to_string(),
                amount,
                display: currency(symbol, amount),
            }
        })
        .collect()
}

fn financials(input: &EstimateInput, result: &EstimateResult) -> Financials {
    let c = &input.commercial;
    let d = &result.discount;
    Financials {
        base_days: d.risked_days,
        base_rate: d.base_rate,
        base_amount: to_count(d.risked_days as f64 * d.base_rate),
        manday_pct: if c.manday_discount_enabled {
            c.manday_discount_pct
        } else {
            0.0
        },
        rate_pct: c.rate_discount_pct,
        manday_days_delta: d.days_delta,
        manday_discount_amount: to_count(d.days_delta as f64 * d.base_rate),
        rate_discount_amount: to_count(d.final_days as f64 * d.rate_delta),
        final_days: d.final_days,
        final_rate: d.final_rate,
        implementation_subtotal: result.final_price,
        addon_base_days: result.addon.base_days,
        addon_base_price: result.addon.base_price,
        addon_days: result.addon.days,
        addon_price: result.addon.price,
        addon_included: input.addon.include_in_total && result.addon.price > 0,
        rounding: c.rounding,
        grand_total: result.grand_total,
    }
}

fn commercial_rows(
    result: &EstimateResult,
    catalog: &Catalog,
    f: &Financials,
    symbol: &str,
) -> Vec<CommercialRow> {
    let mut rows = vec![CommercialRow {
        label: "Implementation".to_string(),
        base: f.base_amount,
        net: f.implementation_subtotal,
        notes: format!(
            "{} md @ {}",
            f.final_days,
            currency(symbol, f.final_rate)
        ),
    }];

    if f.addon_price > 0 {
        let horizon = catalog.constants().addon_horizon_years;
        let label = result
            .addon
            .tier
            .as_deref()
            .and_then(|key| catalog.addon_tier(key))
            .map(|tier| tier.label.clone())
            .unwrap_or_else(|| format!("AMS ({} years)", horizon));
        rows.push(CommercialRow {
            label,
            base: f.addon_base_price,
            net: f.addon_price,
            notes: if f.addon_included {
                "Included in total".to_string()
            } else {
                "Quoted separately".to_string()
            },
        });
    }

    rows
}

fn labels_in_catalog_order<'a, I>(entries: I, selection: &Selection) -> Vec<String>
where
    I: Iterator<Item = (&'a str, &'a str)>,
{
    entries
        .filter(|(key, _)| selection.contains(key))
        .map(|(_, label)| label.to_string())
        .collect()
}

fn scope_columns(input: &EstimateInput, catalog: &Catalog) -> Vec<ScopeColumn> {
    vec![
        ScopeColumn {
            title: "Selected Capabilities".to_string(),
            items: labels_in_catalog_order(
                catalog.items().iter().map(|i| (i.key.as_str(), i.label.as_str())),
                &input.selected_items,
            ),
        },
        ScopeColumn {
            title: "Forms".to_string(),
            items: labels_in_catalog_order(
                catalog.forms().iter().map(|f| (f.key.as_str(), f.label.as_str())),
                &input.selected_forms,
            ),
        },
        ScopeColumn {
            title: "Interfaces".to_string(),
            items: labels_in_catalog_order(
                catalog
                    .interfaces()
                    .iter()
                    .map(|i| (i.key.as_str(), i.label.as_str())),
                &input.selected_interfaces,
            ),
        },
    ]
}

fn input_audit(input: &EstimateInput, result: &EstimateResult, symbol: &str) -> Vec<AuditRow> {
    let c = &input.commercial;
    let manday = if c.manday_discount_enabled {
        percent(c.manday_discount_pct)
    } else {
        "off".to_string()
    };

    vec![
        AuditRow::new("Package Tier", input.tier.display_name()),
        AuditRow::new(
            format!("Rate ({}/day)", symbol),
            currency(symbol, to_count(c.base_rate)),
        ),
        AuditRow::new("Manday Discount %", manday),
        AuditRow::new("Rate Discount %", percent(c.rate_discount_pct)),
        AuditRow::new(format!("Rounding ({})", symbol), currency(symbol, c.rounding)),
        AuditRow::new("Team Size (FTE)", input.team.team_size.to_string()),
        AuditRow::new(
            "Working Days/Week",
            input.team.working_days_per_week.to_string(),
        ),
        AuditRow::new("Risk Multiplier", format!("{:.2}", result.risk_multiplier)),
    ]
}
