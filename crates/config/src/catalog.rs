//! Catalog configuration
//!
//! Loaded from YAML: functional items, forms, interfaces, industry templates,
//! risk table, add-on tiers, advisory thresholds and preset tiers. A default
//! catalog is compiled in so the calculator runs without any files on disk.

use erp_calc_core::{Catalog, CatalogParts, Tier};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

static EMBEDDED_YAML: &str = include_str!("../../../config/catalog.yaml");
static EMBEDDED: OnceCell<CatalogConfig> = OnceCell::new();

/// Errors when loading or validating a catalog
#[derive(Error, Debug)]
pub enum CatalogConfigError {
    #[error("Catalog not found at {0}: {1}")]
    FileNotFound(String, String),

    #[error("Failed to parse catalog: {0}")]
    ParseError(String),

    #[error("Invalid catalog entry {field}: {message}")]
    Invalid { field: String, message: String },
}

impl CatalogConfigError {
    fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Catalog file contents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogConfig {
    pub parts: CatalogParts,
}

impl CatalogConfig {
    /// Load from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            CatalogConfigError::FileNotFound(path.as_ref().display().to_string(), e.to_string())
        })?;

        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, CatalogConfigError> {
        serde_yaml::from_str(content).map_err(|e| CatalogConfigError::ParseError(e.to_string()))
    }

    /// The compiled-in default catalog, parsed once
    pub fn embedded() -> Result<&'static CatalogConfig, CatalogConfigError> {
        EMBEDDED.get_or_try_init(|| Self::from_yaml_str(EMBEDDED_YAML))
    }

    /// Reject catalogs the engine could not price consistently
    pub fn validate(&self) -> Result<(), CatalogConfigError> {
        let p = &self.parts;

        let items = unique_keys("items", p.items.iter().map(|i| i.key.as_str()))?;
        let forms = unique_keys("forms", p.forms.iter().map(|f| f.key.as_str()))?;
        let interfaces = unique_keys("interfaces", p.interfaces.iter().map(|i| i.key.as_str()))?;
        unique_keys("templates", p.templates.iter().map(|t| t.id.as_str()))?;
        unique_keys("addon_tiers", p.addon_tiers.iter().map(|t| t.key.as_str()))?;

        for item in &p.items {
            if item.bundle_scope.is_some() && !item.bundle {
                tracing::warn!(key = %item.key, "bundle_scope set on a non-bundle item; ignored");
            }
        }

        for template in &p.templates {
            for (key, multiplier) in template.multipliers.iter() {
                if !(multiplier.is_finite() && multiplier > 0.0) {
                    return Err(CatalogConfigError::invalid(
                        format!("templates.{}.multipliers.{}", template.id, key),
                        format!("multiplier must be positive, got {}", multiplier),
                    ));
                }
                if !items.contains(key) {
                    tracing::debug!(
                        template = %template.id,
                        key = %key,
                        "Template multiplier targets no catalog item"
                    );
                }
            }
            for form in &template.required_forms {
                if !forms.contains(form.as_str()) {
                    return Err(CatalogConfigError::invalid(
                        format!("templates.{}.required_forms", template.id),
                        format!("unknown form '{}'", form),
                    ));
                }
            }
            for interface in &template.required_interfaces {
                if !interfaces.contains(interface.as_str()) {
                    return Err(CatalogConfigError::invalid(
                        format!("templates.{}.required_interfaces", template.id),
                        format!("unknown interface '{}'", interface),
                    ));
                }
            }
        }

        let mut seen_tiers = HashSet::new();
        for preset in &p.presets {
            if !seen_tiers.insert(preset.tier) {
                return Err(CatalogConfigError::invalid(
                    "presets",
                    format!("tier '{}' defined twice", preset.tier),
                ));
            }
            if let Some(missing) = preset.keys.iter().find(|k| !items.contains(k.as_str())) {
                return Err(CatalogConfigError::invalid(
                    format!("presets.{}", preset.tier),
                    format!("unknown item '{}'", missing),
                ));
            }
        }
        for tier in Tier::ALL {
            if !seen_tiers.contains(&tier) {
                tracing::warn!(tier = %tier, "No built-in preset for tier");
            }
        }

        let synced = &p.constants.synced_addon_key;
        if !synced.is_empty() && !items.contains(synced.as_str()) {
            return Err(CatalogConfigError::invalid(
                "constants.synced_addon_key",
                format!("unknown item '{}'", synced),
            ));
        }

        if !(p.constants.weeks_per_month.is_finite() && p.constants.weeks_per_month > 0.0) {
            return Err(CatalogConfigError::invalid(
                "constants.weeks_per_month",
                "must be positive",
            ));
        }

        for (field, pct) in [
            ("policy.max_manday_discount_pct", p.policy.max_manday_discount_pct),
            ("policy.max_rate_discount_pct", p.policy.max_rate_discount_pct),
        ] {
            if !(0.0..=100.0).contains(&pct) {
                return Err(CatalogConfigError::invalid(
                    field,
                    format!("must be within 0..=100, got {}", pct),
                ));
            }
        }

        Ok(())
    }

    pub fn into_catalog(self) -> Catalog {
        Catalog::new(self.parts)
    }
}

fn unique_keys<'a>(
    section: &str,
    keys: impl Iterator<Item = &'a str>,
) -> Result<HashSet<&'a str>, CatalogConfigError> {
    let mut seen = HashSet::new();
    for key in keys {
        if !seen.insert(key) {
            return Err(CatalogConfigError::invalid(
                section,
                format!("duplicate key '{}'", key),
            ));
        }
    }
    Ok(seen)
}
