//! Preset tiers and user-edited preset overrides

use crate::error::Error;
use crate::input::{EffortOverride, EffortSliders};
use crate::selection::Selection;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Essential,
    Standard,
    Premium,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Essential, Tier::Standard, Tier::Premium];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Essential => "essential",
            Self::Standard => "standard",
            Self::Premium => "premium",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Essential => "Essential",
            Self::Standard => "Standard",
            Self::Premium => "Premium",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "essential" => Ok(Self::Essential),
            "standard" => Ok(Self::Standard),
            "premium" => Ok(Self::Premium),
            other => Err(Error::UnknownTier(other.to_string())),
        }
    }
}

/// Built-in preset for a tier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetDefinition {
    pub tier: Tier,
    #[serde(default)]
    pub description: String,
    pub keys: Vec<String>,
    /// Whether the synchronised add-on key is part of the preset
    #[serde(default)]
    pub include_addon_key: bool,
    #[serde(default)]
    pub effort: EffortSliders,
}

/// A user-curated replacement for a built-in preset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetOverride {
    pub keys: Selection,
    #[serde(default, alias = "includeDRC")]
    pub include_flag: bool,
    #[serde(default, alias = "wrapper", skip_serializing_if = "Option::is_none")]
    pub wrapper_days: Option<EffortOverride>,
}

/// The persisted override document: one optional override per tier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PresetOverrides {
    #[serde(default)]
    pub essential: Option<PresetOverride>,
    #[serde(default)]
    pub standard: Option<PresetOverride>,
    #[serde(default)]
    pub premium: Option<PresetOverride>,
}

impl PresetOverrides {
    /// Key under which the document is stored
    pub const STORAGE_KEY: &'static str = "presetOverrides";

    pub fn get(&self, tier: Tier) -> Option<&PresetOverride> {
        match tier {
            Tier::Essential => self.essential.as_ref(),
            Tier::Standard => self.standard.as_ref(),
            Tier::Premium => self.premium.as_ref(),
        }
    }

    /// New document with the tier's override replaced (or cleared with `None`)
    pub fn with(&self, tier: Tier, value: Option<PresetOverride>) -> Self {
        let mut next = self.clone();
        match tier {
            Tier::Essential => next.essential = value,
            Tier::Standard => next.standard = value,
            Tier::Premium => next.premium = value,
        }
        next
    }
}
