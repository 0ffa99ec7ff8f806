//! Engine input
//!
//! Wire names are camelCase. Every numeric field goes through a lenient
//! deserializer, so a request never fails on a bad number: it becomes 0.

use crate::multipliers::MultiplierMap;
use crate::numeric::{
    lenient_f64, lenient_granularity, lenient_opt_u32, lenient_u32, lenient_u32_map,
};
use crate::preset::Tier;
use crate::risk::RiskProfile;
use crate::selection::Selection;
use crate::NO_TEMPLATE;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Technical and delivery-wrapper effort sliders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EffortSliders {
    #[serde(deserialize_with = "lenient_u32")]
    pub security: u32,
    #[serde(deserialize_with = "lenient_u32")]
    pub tenant: u32,
    #[serde(alias = "migrate", deserialize_with = "lenient_u32")]
    pub migration_cycles: u32,
    #[serde(deserialize_with = "lenient_u32")]
    pub pmo: u32,
    #[serde(deserialize_with = "lenient_u32")]
    pub cutover: u32,
    #[serde(deserialize_with = "lenient_u32")]
    pub training: u32,
    #[serde(alias = "hyper", deserialize_with = "lenient_u32")]
    pub hypercare: u32,
}

impl Default for EffortSliders {
    fn default() -> Self {
        Self {
            security: 20,
            tenant: 15,
            migration_cycles: 2,
            pmo: 55,
            cutover: 12,
            training: 15,
            hypercare: 15,
        }
    }
}

/// Partial slider set stored with a preset override
///
/// Only the fields that are set replace the current sliders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EffortOverride {
    #[serde(deserialize_with = "lenient_opt_u32", skip_serializing_if = "Option::is_none")]
    pub security: Option<u32>,
    #[serde(deserialize_with = "lenient_opt_u32", skip_serializing_if = "Option::is_none")]
    pub tenant: Option<u32>,
    #[serde(
        alias = "migrate",
        deserialize_with = "lenient_opt_u32",
        skip_serializing_if = "Option::is_none"
    )]
    pub migration_cycles: Option<u32>,
    #[serde(deserialize_with = "lenient_opt_u32", skip_serializing_if = "Option::is_none")]
    pub pmo: Option<u32>,
    #[serde(deserialize_with = "lenient_opt_u32", skip_serializing_if = "Option::is_none")]
    pub cutover: Option<u32>,
    #[serde(deserialize_with = "lenient_opt_u32", skip_serializing_if = "Option::is_none")]
    pub training: Option<u32>,
    #[serde(
        alias = "hyper",
        deserialize_with = "lenient_opt_u32",
        skip_serializing_if = "Option::is_none"
    )]
    pub hypercare: Option<u32>,
}

impl EffortOverride {
    pub fn apply_to(&self, base: &EffortSliders) -> EffortSliders {
        EffortSliders {
            security: self.security.unwrap_or(base.security),
            tenant: self.tenant.unwrap_or(base.tenant),
            migration_cycles: self.migration_cycles.unwrap_or(base.migration_cycles),
            pmo: self.pmo.unwrap_or(base.pmo),
            cutover: self.cutover.unwrap_or(base.cutover),
            training: self.training.unwrap_or(base.training),
            hypercare: self.hypercare.unwrap_or(base.hypercare),
        }
    }
}

impl From<EffortSliders> for EffortOverride {
    fn from(e: EffortSliders) -> Self {
        Self {
            security: Some(e.security),
            tenant: Some(e.tenant),
            migration_cycles: Some(e.migration_cycles),
            pmo: Some(e.pmo),
            cutover: Some(e.cutover),
            training: Some(e.training),
            hypercare: Some(e.hypercare),
        }
    }
}

/// Rates, discounts and rounding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommercialInputs {
    /// Per-day rate in the billing currency
    #[serde(deserialize_with = "lenient_f64")]
    pub base_rate: f64,
    /// Per-day rate of the reference offering, in its own currency
    #[serde(deserialize_with = "lenient_f64")]
    pub reference_rate: f64,
    /// Reference currency → billing currency
    #[serde(deserialize_with = "lenient_f64")]
    pub fx: f64,
    /// Monetary totals round to a multiple of this
    #[serde(deserialize_with = "lenient_granularity")]
    pub rounding: u64,
    #[serde(deserialize_with = "lenient_f64")]
    pub manday_discount_pct: f64,
    pub manday_discount_enabled: bool,
    #[serde(deserialize_with = "lenient_f64")]
    pub rate_discount_pct: f64,
}

impl Default for CommercialInputs {
    fn default() -> Self {
        Self {
            base_rate: 2000.0,
            reference_rate: 700.0,
            fx: 3.4,
            rounding: 1,
            manday_discount_pct: 0.0,
            manday_discount_enabled: true,
            rate_discount_pct: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamSizing {
    #[serde(deserialize_with = "lenient_u32")]
    pub team_size: u32,
    #[serde(deserialize_with = "lenient_u32")]
    pub working_days_per_week: u32,
}

impl Default for TeamSizing {
    fn default() -> Self {
        Self {
            team_size: 5,
            working_days_per_week: 5,
        }
    }
}

/// Support add-on selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddonSelection {
    /// Add-on tier key; `None` means no add-on
    pub tier: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub discount_pct: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub rate: f64,
    /// Fold the add-on price into the grand total
    pub include_in_total: bool,
}

impl Default for AddonSelection {
    fn default() -> Self {
        Self {
            tier: None,
            discount_pct: 15.0,
            rate: 1900.0,
            include_in_total: false,
        }
    }
}

/// Everything the engine needs for one estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EstimateInput {
    pub tier: Tier,
    pub selected_items: Selection,
    pub selected_forms: Selection,
    pub selected_interfaces: Selection,
    /// Per-item day overrides; take precedence over catalog days
    #[serde(deserialize_with = "lenient_u32_map")]
    pub day_overrides: BTreeMap<String, u32>,
    pub multipliers: MultiplierMap,
    pub industry_template: String,
    pub risk: RiskProfile,
    pub effort: EffortSliders,
    pub commercial: CommercialInputs,
    pub team: TeamSizing,
    pub addon: AddonSelection,
    /// Skips the baseline line-of-business check
    pub admin_override: bool,
}

impl Default for EstimateInput {
    fn default() -> Self {
        Self {
            tier: Tier::default(),
            selected_items: Selection::new(),
            selected_forms: Selection::new(),
            selected_interfaces: Selection::new(),
            day_overrides: BTreeMap::new(),
            multipliers: MultiplierMap::identity(),
            industry_template: NO_TEMPLATE.to_string(),
            risk: RiskProfile::default(),
            effort: EffortSliders::default(),
            commercial: CommercialInputs::default(),
            team: TeamSizing::default(),
            addon: AddonSelection::default(),
            admin_override: false,
        }
    }
}
