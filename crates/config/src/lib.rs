//! Configuration management for the ERP package calculator
//!
//! Supports loading configuration from:
//! - YAML files (`config/default.yaml`, `config/{env}.yaml`)
//! - Environment variables (ERP_CALC_ prefix, `__` separator)
//!
//! # Catalog
//!
//! The catalog (items, forms, interfaces, templates, risk table, add-on
//! tiers, thresholds, presets) is a separate YAML document. A default copy is
//! embedded at compile time; `Settings::catalog_path` points at an override.

pub mod catalog;
pub mod constants;
pub mod settings;

pub use catalog::{CatalogConfig, CatalogConfigError};
pub use settings::{
    load_settings, CommercialDefaults, ObservabilityConfig, PersistenceConfig, PresetSettings,
    RuntimeEnvironment, ServerConfig, Settings, StoreKind,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Environment error: {0}")]
    Environment(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<CatalogConfigError> for ConfigError {
    fn from(err: CatalogConfigError) -> Self {
        match err {
            CatalogConfigError::FileNotFound(path, _) => ConfigError::FileNotFound(path),
            CatalogConfigError::ParseError(msg) => ConfigError::ParseError(msg),
            CatalogConfigError::Invalid { field, message } => {
                ConfigError::InvalidValue { field, message }
            }
        }
    }
}
