//! Application State
//!
//! Shared state across all handlers.

use parking_lot::RwLock;
use std::sync::Arc;

use erp_calc_config::{load_settings, Settings};
use erp_calc_core::{Catalog, EstimateInput, PresetOverrides};
use erp_calc_engine::Estimator;
use erp_calc_persistence::{InMemoryStore, KeyValueStore, PresetOverrideStore};

use crate::ServerError;

#[derive(Clone)]
pub struct AppState {
    /// Settings, reloadable at runtime
    pub config: Arc<RwLock<Settings>>,
    pub catalog: Arc<Catalog>,
    pub engine: Arc<Estimator>,
    pub presets: PresetOverrideStore,
    /// Environment name for config reload
    env: Option<String>,
}

impl AppState {
    /// State with an in-memory preset store
    pub fn new(config: Settings, catalog: Catalog) -> Self {
        Self::with_store(config, catalog, Arc::new(InMemoryStore::new()))
    }

    pub fn with_store(config: Settings, catalog: Catalog, store: Arc<dyn KeyValueStore>) -> Self {
        let catalog = Arc::new(catalog);
        Self {
            config: Arc::new(RwLock::new(config)),
            engine: Arc::new(Estimator::new(catalog.clone())),
            catalog,
            presets: PresetOverrideStore::new(store),
            env: None,
        }
    }

    pub fn with_env(mut self, env: Option<String>) -> Self {
        self.env = env;
        self
    }

    /// Reload settings from disk
    ///
    /// The catalog and store backend are fixed for the life of the process;
    /// only commercial defaults, preset toggles and logging flags change.
    pub fn reload_config(&self) -> Result<(), ServerError> {
        let new_config = load_settings(self.env.as_deref())?;
        *self.config.write() = new_config;
        tracing::info!("Configuration reloaded successfully");
        Ok(())
    }

    pub fn get_config(&self) -> parking_lot::RwLockReadGuard<'_, Settings> {
        self.config.read()
    }

    /// A new input carrying the configured commercial defaults
    pub fn seed_input(&self) -> EstimateInput {
        self.config.read().seed_input()
    }

    /// Stored overrides, or `None` when overrides are switched off
    pub async fn active_overrides(&self) -> Option<PresetOverrides> {
        let enabled = self.config.read().presets.overrides_enabled;
        if !enabled {
            return None;
        }
        Some(self.presets.load().await)
    }

    pub fn overrides_enabled(&self) -> bool {
        self.config.read().presets.overrides_enabled
    }

    pub fn is_durable_store(&self) -> bool {
        self.presets.backend().is_durable()
    }
}
