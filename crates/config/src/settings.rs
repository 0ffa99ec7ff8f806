//! Main settings module

use config::{Config, Environment, File};
use erp_calc_core::{Catalog, EstimateInput};
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogConfig;
use crate::constants::{commercial, paths, server, team};
use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Development mode - relaxed validation, warnings only
    #[default]
    Development,
    Staging,
    /// Production mode - all validations enforced
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Check if strict validation should be applied
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Preset override storage
    #[serde(default)]
    pub persistence: PersistenceConfig,

    /// Defaults seeded into a fresh estimate
    #[serde(default)]
    pub commercial: CommercialDefaults,

    #[serde(default)]
    pub presets: PresetSettings,

    /// Alternative catalog file; the embedded catalog is used when unset
    #[serde(default)]
    pub catalog_path: Option<String>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_commercial()?;
        self.validate_persistence()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        let server = &self.server;

        if server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "Port cannot be 0".to_string(),
            });
        }

        if server.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.timeout_seconds".to_string(),
                message: "Timeout must be at least 1 second".to_string(),
            });
        }

        if self.environment.is_production() && server.cors_enabled && server.cors_origins.is_empty()
        {
            tracing::warn!(
                "CORS is enabled in production but no origins are configured. \
                 This may block legitimate requests."
            );
        }

        Ok(())
    }

    fn validate_commercial(&self) -> Result<(), ConfigError> {
        let c = &self.commercial;

        if c.rounding == 0 {
            return Err(ConfigError::InvalidValue {
                field: "commercial.rounding".to_string(),
                message: "Rounding granularity must be at least 1".to_string(),
            });
        }

        for (field, value) in [
            ("commercial.base_rate", c.base_rate),
            ("commercial.addon_rate", c.addon_rate),
            ("commercial.reference_rate", c.reference_rate),
            ("commercial.fx", c.fx),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    message: format!("Must be a non-negative number, got {}", value),
                });
            }
        }

        if !(0.0..=100.0).contains(&c.addon_discount_pct) {
            return Err(ConfigError::InvalidValue {
                field: "commercial.addon_discount_pct".to_string(),
                message: format!("Must be within 0..=100, got {}", c.addon_discount_pct),
            });
        }

        Ok(())
    }

    fn validate_persistence(&self) -> Result<(), ConfigError> {
        if self.persistence.store == StoreKind::File && self.persistence.file_path.trim().is_empty()
        {
            return Err(ConfigError::MissingField("persistence.file_path".to_string()));
        }

        if self.environment.is_strict() && self.persistence.store == StoreKind::Memory {
            tracing::warn!("Preset overrides are kept in memory and will not survive a restart");
        }

        Ok(())
    }

    /// Load the configured catalog, falling back to the embedded one
    pub fn load_catalog(&self) -> Result<Catalog, ConfigError> {
        let config = match &self.catalog_path {
            Some(path) => {
                tracing::info!(path = %path, "Loading catalog from file");
                CatalogConfig::load(path)?
            }
            None => CatalogConfig::embedded()?.clone(),
        };
        config.validate()?;
        Ok(config.into_catalog())
    }

    /// A fresh estimate input carrying the configured commercial defaults
    pub fn seed_input(&self) -> EstimateInput {
        let mut input = EstimateInput::default();
        let c = &self.commercial;
        input.commercial.base_rate = c.base_rate;
        input.commercial.reference_rate = c.reference_rate;
        input.commercial.fx = c.fx;
        input.commercial.rounding = c.rounding.max(1);
        input.addon.rate = c.addon_rate;
        input.addon.discount_pct = c.addon_discount_pct;
        input.team.team_size = c.team_size;
        input.team.working_days_per_week = c.working_days_per_week;
        input
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// CORS allowed origins
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    server::HOST.to_string()
}
fn default_port() -> u16 {
    server::PORT
}
fn default_timeout() -> u64 {
    server::TIMEOUT_SECS
}
fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout_seconds: default_timeout(),
            cors_enabled: true,
            cors_origins: Vec::new(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,

    /// Expose Prometheus metrics on /metrics
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            metrics_enabled: true,
        }
    }
}

/// Backend for the preset override document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Memory,
    File,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    #[serde(default)]
    pub store: StoreKind,

    /// JSON file used when `store = file`
    #[serde(default = "default_store_file")]
    pub file_path: String,
}

fn default_store_file() -> String {
    paths::PRESET_STORE_FILE.to_string()
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            store: StoreKind::Memory,
            file_path: default_store_file(),
        }
    }
}

/// Commercial and team defaults for new estimates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommercialDefaults {
    #[serde(default = "default_base_rate")]
    pub base_rate: f64,
    #[serde(default = "default_addon_rate")]
    pub addon_rate: f64,
    #[serde(default = "default_reference_rate")]
    pub reference_rate: f64,
    #[serde(default = "default_fx")]
    pub fx: f64,
    #[serde(default = "default_rounding")]
    pub rounding: u64,
    #[serde(default = "default_addon_discount")]
    pub addon_discount_pct: f64,
    #[serde(default = "default_team_size")]
    pub team_size: u32,
    #[serde(default = "default_working_days")]
    pub working_days_per_week: u32,
}

fn default_base_rate() -> f64 {
    commercial::BASE_RATE
}
fn default_addon_rate() -> f64 {
    commercial::ADDON_RATE
}
fn default_reference_rate() -> f64 {
    commercial::REFERENCE_RATE
}
fn default_fx() -> f64 {
    commercial::FX
}
fn default_rounding() -> u64 {
    commercial::ROUNDING
}
fn default_addon_discount() -> f64 {
    commercial::ADDON_DISCOUNT_PCT
}
fn default_team_size() -> u32 {
    team::TEAM_SIZE
}
fn default_working_days() -> u32 {
    team::WORKING_DAYS_PER_WEEK
}

impl Default for CommercialDefaults {
    fn default() -> Self {
        Self {
            base_rate: default_base_rate(),
            addon_rate: default_addon_rate(),
            reference_rate: default_reference_rate(),
            fx: default_fx(),
            rounding: default_rounding(),
            addon_discount_pct: default_addon_discount(),
            team_size: default_team_size(),
            working_days_per_week: default_working_days(),
        }
    }
}

/// Preset behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetSettings {
    /// Apply stored overrides instead of the built-in presets when present
    #[serde(default = "default_true")]
    pub overrides_enabled: bool,
}

impl Default for PresetSettings {
    fn default() -> Self {
        Self {
            overrides_enabled: true,
        }
    }
}

/// Load settings from files and environment
///
/// Priority (highest to lowest):
/// 1. Environment variables (ERP_CALC_ prefix, `__` separator)
/// 2. config/{env}.yaml (if env specified)
/// 3. config/default.yaml
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(
        File::with_name(&format!("{}/default", paths::SETTINGS_DIR)).required(false),
    );

    if let Some(env_name) = env {
        if env_name.is_empty() || env_name.contains(['/', '\\', '.']) {
            return Err(ConfigError::Environment(format!(
                "invalid environment name '{}'",
                env_name
            )));
        }
        builder = builder.add_source(
            File::with_name(&format!("{}/{}", paths::SETTINGS_DIR, env_name)).required(false),
        );
    }

    builder = builder.add_source(
        Environment::with_prefix(paths::ENV_PREFIX)
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}
