//! Catalog records
//!
//! The catalog is injected configuration: it is loaded once by the config
//! crate and passed to the engine by reference. Nothing in here is global.

use crate::multipliers::MultiplierMap;
use crate::numeric::{lenient_f64, lenient_u32};
use crate::policy::PolicyThresholds;
use crate::preset::{PresetDefinition, Tier};
use crate::risk::RiskTable;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Template id meaning "no industry template"
pub const NO_TEMPLATE: &str = "none";

/// Line of business a functional item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LineOfBusiness {
    Finance,
    #[serde(rename = "SCM")]
    Scm,
    #[serde(rename = "HCM")]
    Hcm,
    #[serde(rename = "ARIBA")]
    Ariba,
    #[serde(rename = "CX")]
    Cx,
}

impl LineOfBusiness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Finance => "Finance",
            Self::Scm => "SCM",
            Self::Hcm => "HCM",
            Self::Ariba => "ARIBA",
            Self::Cx => "CX",
        }
    }
}

impl fmt::Display for LineOfBusiness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// (line of business, product, package) triple used for bundle matching
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScopeTriple {
    pub line_of_business: LineOfBusiness,
    pub product: String,
    pub package: String,
}

/// A functional capability that can be selected
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    pub key: String,
    pub label: String,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub days: u32,
    pub line_of_business: LineOfBusiness,
    pub product: String,
    pub package: String,
    /// Whether this item subsumes the atomic items in its scope
    #[serde(default)]
    pub bundle: bool,
    /// Explicit scope; a bundle without one covers its own triple
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_scope: Option<ScopeTriple>,
}

impl CatalogItem {
    /// The item's own (line of business, product, package)
    pub fn triple(&self) -> ScopeTriple {
        ScopeTriple {
            line_of_business: self.line_of_business,
            product: self.product.clone(),
            package: self.package.clone(),
        }
    }

    /// The scope this item covers when it is a bundle
    pub fn scope(&self) -> ScopeTriple {
        self.bundle_scope.clone().unwrap_or_else(|| self.triple())
    }

    /// True when this non-bundle item is subsumed by `bundle`
    pub fn is_in_scope_of(&self, bundle: &CatalogItem) -> bool {
        if self.bundle || !bundle.bundle || self.key == bundle.key {
            return false;
        }
        let scope = bundle.scope();
        self.line_of_business == scope.line_of_business
            && self.product == scope.product
            && self.package == scope.package
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

/// A printable form (part of FRICEW)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormItem {
    pub key: String,
    pub label: String,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub days: u32,
    #[serde(default)]
    pub priority: Priority,
    /// Required by local statutory rules
    #[serde(default)]
    pub region_specific: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceComplexity {
    Low,
    #[default]
    Medium,
    High,
}

/// An integration interface (part of FRICEW)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterfaceItem {
    pub key: String,
    pub label: String,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub days: u32,
    #[serde(default)]
    pub complexity: InterfaceComplexity,
}

/// Industry template: sparse multipliers, seeded forms/interfaces, flat days
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndustryTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub multipliers: MultiplierMap,
    #[serde(default)]
    pub required_forms: Vec<String>,
    #[serde(default)]
    pub required_interfaces: Vec<String>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub additional_days: u32,
}

/// Add-on support tier (days per year over the add-on horizon)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddonTier {
    pub key: String,
    pub label: String,
    #[serde(deserialize_with = "lenient_u32")]
    pub days_per_year: u32,
}

/// Fixed constants used by the estimation pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimationConstants {
    #[serde(default = "default_migration_days_per_cycle")]
    pub migration_days_per_cycle: u32,
    #[serde(default = "default_addon_horizon_years")]
    pub addon_horizon_years: u32,
    #[serde(default = "default_weeks_per_month", deserialize_with = "lenient_f64")]
    pub weeks_per_month: f64,
    /// Catalog key kept in sync with the include flag of a preset
    #[serde(default = "default_synced_addon_key")]
    pub synced_addon_key: String,
}

fn default_migration_days_per_cycle() -> u32 {
    20
}

fn default_addon_horizon_years() -> u32 {
    3
}

fn default_weeks_per_month() -> f64 {
    4.33
}

fn default_synced_addon_key() -> String {
    "drc_tax".to_string()
}

impl Default for EstimationConstants {
    fn default() -> Self {
        Self {
            migration_days_per_cycle: default_migration_days_per_cycle(),
            addon_horizon_years: default_addon_horizon_years(),
            weeks_per_month: default_weeks_per_month(),
            synced_addon_key: default_synced_addon_key(),
        }
    }
}

/// Raw catalog contents, as loaded from configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogParts {
    #[serde(default)]
    pub items: Vec<CatalogItem>,
    #[serde(default)]
    pub forms: Vec<FormItem>,
    #[serde(default)]
    pub interfaces: Vec<InterfaceItem>,
    #[serde(default)]
    pub templates: Vec<IndustryTemplate>,
    #[serde(default)]
    pub addon_tiers: Vec<AddonTier>,
    #[serde(default)]
    pub risk: RiskTable,
    #[serde(default)]
    pub constants: EstimationConstants,
    #[serde(default)]
    pub policy: PolicyThresholds,
    #[serde(default)]
    pub presets: Vec<PresetDefinition>,
}

/// Indexed, read-only catalog handed to the engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "CatalogParts")]
pub struct Catalog {
    items: Vec<CatalogItem>,
    forms: Vec<FormItem>,
    interfaces: Vec<InterfaceItem>,
    templates: Vec<IndustryTemplate>,
    addon_tiers: Vec<AddonTier>,
    risk: RiskTable,
    constants: EstimationConstants,
    policy: PolicyThresholds,
    presets: Vec<PresetDefinition>,
    #[serde(skip)]
    item_index: HashMap<String, usize>,
    #[serde(skip)]
    form_index: HashMap<String, usize>,
    #[serde(skip)]
    interface_index: HashMap<String, usize>,
}

fn index_by_key<T>(records: &[T], key: impl Fn(&T) -> &str) -> HashMap<String, usize> {
    records
        .iter()
        .enumerate()
        .map(|(i, r)| (key(r).to_string(), i))
        .collect()
}

impl From<CatalogParts> for Catalog {
    fn from(parts: CatalogParts) -> Self {
        let item_index = index_by_key(&parts.items, |i| i.key.as_str());
        let form_index = index_by_key(&parts.forms, |f| f.key.as_str());
        let interface_index = index_by_key(&parts.interfaces, |i| i.key.as_str());
        Self {
            items: parts.items,
            forms: parts.forms,
            interfaces: parts.interfaces,
            templates: parts.templates,
            addon_tiers: parts.addon_tiers,
            risk: parts.risk,
            constants: parts.constants,
            policy: parts.policy,
            presets: parts.presets,
            item_index,
            form_index,
            interface_index,
        }
    }
}

impl Catalog {
    pub fn new(parts: CatalogParts) -> Self {
        parts.into()
    }

    /// Functional items in catalog order
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn item(&self, key: &str) -> Option<&CatalogItem> {
        self.item_index.get(key).map(|&i| &self.items[i])
    }

    /// Position of an item in catalog order
    pub fn position(&self, key: &str) -> Option<usize> {
        self.item_index.get(key).copied()
    }

    pub fn forms(&self) -> &[FormItem] {
        &self.forms
    }

    pub fn form(&self, key: &str) -> Option<&FormItem> {
        self.form_index.get(key).map(|&i| &self.forms[i])
    }

    pub fn interfaces(&self) -> &[InterfaceItem] {
        &self.interfaces
    }

    pub fn interface(&self, key: &str) -> Option<&InterfaceItem> {
        self.interface_index.get(key).map(|&i| &self.interfaces[i])
    }

    pub fn templates(&self) -> &[IndustryTemplate] {
        &self.templates
    }

    pub fn template(&self, id: &str) -> Option<&IndustryTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Flat days added by a template; unknown ids and "none" add nothing
    pub fn template_additional_days(&self, id: &str) -> u32 {
        self.template(id).map(|t| t.additional_days).unwrap_or(0)
    }

    pub fn addon_tiers(&self) -> &[AddonTier] {
        &self.addon_tiers
    }

    pub fn addon_tier(&self, key: &str) -> Option<&AddonTier> {
        self.addon_tiers.iter().find(|t| t.key == key)
    }

    pub fn risk_table(&self) -> &RiskTable {
        &self.risk
    }

    pub fn constants(&self) -> &EstimationConstants {
        &self.constants
    }

    pub fn policy(&self) -> &PolicyThresholds {
        &self.policy
    }

    pub fn presets(&self) -> &[PresetDefinition] {
        &self.presets
    }

    pub fn preset(&self, tier: Tier) -> Option<&PresetDefinition> {
        self.presets.iter().find(|p| p.tier == tier)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
