//! Estimation engine for the ERP package calculator
//!
//! A pure, synchronous pipeline over an injected [`Catalog`]:
//!
//! ```text
//! selection ─► resolver ─► effort buckets ─► risk ─► discounts ─► price
//!                 (+ regional adjustment)               │
//!                                        final days ─► timeline
//! add-on tier ─► add-on quote ──────────────────────► grand total
//! all outputs ─► warnings
//! ```
//!
//! Around the pipeline sit the preset/template operations and the report
//! grouping used by document export.

pub mod addon;
pub mod discount;
pub mod effort;
pub mod estimator;
pub mod presets;
pub mod pricing;
pub mod regional;
pub mod report;
pub mod resolver;
pub mod risk;
pub mod timeline;
pub mod warnings;

pub use addon::compute_addon;
pub use discount::apply_discounts;
pub use effort::{aggregate, aggregate_functional_days};
pub use estimator::Estimator;
pub use presets::{apply_template, apply_tier, reset_multipliers, with_addon_toggled};
pub use pricing::{grand_total, price, reference_figures};
pub use regional::apply_regional_adjustment;
pub use report::{ReportLayout, ReportRow};
pub use resolver::{resolve, Resolved};
pub use risk::{apply_risk, compute_risk_multiplier};
pub use timeline::estimate_timeline;
pub use warnings::{evaluate_warnings, WarningContext};

pub use erp_calc_core::{Catalog, EstimateInput, EstimateResult, EstimationEngine};
