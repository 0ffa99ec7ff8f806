//! Centralized defaults
//!
//! Single source for the commercial defaults and file locations used when no
//! configuration overrides them.

/// Commercial defaults (billing currency RM)
pub mod commercial {
    /// Per-day implementation rate
    pub const BASE_RATE: f64 = 2000.0;

    /// Per-day support add-on rate
    pub const ADDON_RATE: f64 = 1900.0;

    /// Per-day rate of the reference offering (reference currency)
    pub const REFERENCE_RATE: f64 = 700.0;

    /// Reference currency → billing currency
    pub const FX: f64 = 3.4;

    /// Monetary rounding granularity
    pub const ROUNDING: u64 = 1;

    /// Default add-on discount (%)
    pub const ADDON_DISCOUNT_PCT: f64 = 15.0;
}

/// Delivery team defaults
pub mod team {
    pub const TEAM_SIZE: u32 = 5;
    pub const WORKING_DAYS_PER_WEEK: u32 = 5;
}

/// Configuration and data locations
pub mod paths {
    /// Base name of the layered settings files (`config/default.yaml`, ...)
    pub const SETTINGS_DIR: &str = "config";

    /// Environment variable prefix (`ERP_CALC__SERVER__PORT=9000`)
    pub const ENV_PREFIX: &str = "ERP_CALC";

    /// Default file for the JSON-backed preset store
    pub const PRESET_STORE_FILE: &str = "data/preset-overrides.json";
}

/// HTTP defaults
pub mod server {
    pub const HOST: &str = "0.0.0.0";
    pub const PORT: u16 = 8080;
    pub const TIMEOUT_SECS: u64 = 30;
}
