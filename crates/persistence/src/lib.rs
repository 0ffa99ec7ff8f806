//! Persistence layer for the ERP package calculator
//!
//! Provides:
//! - A [`KeyValueStore`] abstraction over JSON values
//! - [`InMemoryStore`] and [`JsonFileStore`] backends
//! - [`PresetOverrideStore`] for user-curated preset tiers

pub mod error;
pub mod file;
pub mod memory;
pub mod presets;
pub mod store;

pub use error::PersistenceError;
pub use file::JsonFileStore;
pub use memory::InMemoryStore;
pub use presets::PresetOverrideStore;
pub use store::KeyValueStore;

use std::path::PathBuf;
use std::sync::Arc;

/// Which backend to open
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    File(PathBuf),
}

/// Initialized persistence services
#[derive(Clone)]
pub struct PersistenceLayer {
    pub store: Arc<dyn KeyValueStore>,
    pub presets: PresetOverrideStore,
}

/// Open the configured backend and wire the services on top of it
pub fn init(backend: StoreBackend) -> PersistenceLayer {
    let store: Arc<dyn KeyValueStore> = match backend {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory store, preset overrides will not survive a restart");
            Arc::new(InMemoryStore::new())
        }
        StoreBackend::File(path) => {
            tracing::info!(path = %path.display(), "Using JSON file store");
            Arc::new(JsonFileStore::new(path))
        }
    };

    PersistenceLayer {
        presets: PresetOverrideStore::new(store.clone()),
        store,
    }
}
