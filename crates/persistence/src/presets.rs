//! Preset override persistence
//!
//! The override document lives under one key of an injected
//! [`KeyValueStore`]. Plain reads never fail: a missing or unreadable
//! document falls back to "no overrides" so the built-in presets keep
//! working. Tier updates are serialised and refuse to write over a document
//! they could not decode.

use crate::error::PersistenceError;
use crate::store::KeyValueStore;
use erp_calc_core::{PresetOverride, PresetOverrides, Tier};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct PresetOverrideStore {
    store: Arc<dyn KeyValueStore>,
    /// Held across load, modify and save of a tier update
    update_lock: Arc<Mutex<()>>,
}

impl PresetOverrideStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            update_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn backend(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Current override document; empty on any read or decode failure
    pub async fn load(&self) -> PresetOverrides {
        match self.try_load().await {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read preset overrides, using built-in presets");
                PresetOverrides::default()
            }
        }
    }

    /// Like [`load`](Self::load) but surfaces the failure
    pub async fn try_load(&self) -> Result<PresetOverrides, PersistenceError> {
        match self.store.get(PresetOverrides::STORAGE_KEY).await? {
            None | Some(serde_json::Value::Null) => Ok(PresetOverrides::default()),
            Some(value) => Ok(serde_json::from_value(value)?),
        }
    }

    pub async fn save(&self, doc: &PresetOverrides) -> Result<(), PersistenceError> {
        let value = serde_json::to_value(doc)?;
        self.store.set(PresetOverrides::STORAGE_KEY, value).await
    }

    async fn update_tier(
        &self,
        tier: Tier,
        value: Option<PresetOverride>,
    ) -> Result<PresetOverrides, PersistenceError> {
        let _guard = self.update_lock.lock().await;
        let next = self.try_load().await?.with(tier, value);
        self.save(&next).await?;
        Ok(next)
    }

    /// Replace one tier's override and persist; returns the new document
    pub async fn set_tier(
        &self,
        tier: Tier,
        value: PresetOverride,
    ) -> Result<PresetOverrides, PersistenceError> {
        let next = self.update_tier(tier, Some(value)).await?;
        tracing::info!(tier = %tier, "Preset override saved");
        Ok(next)
    }

    /// Drop one tier's override so the built-in preset applies again
    pub async fn clear_tier(&self, tier: Tier) -> Result<PresetOverrides, PersistenceError> {
        let next = self.update_tier(tier, None).await?;
        tracing::info!(tier = %tier, "Preset override cleared");
        Ok(next)
    }

    /// Remove the whole document
    pub async fn clear_all(&self) -> Result<(), PersistenceError> {
        let _guard = self.update_lock.lock().await;
        self.store.remove(PresetOverrides::STORAGE_KEY).await
    }
}

impl std::fmt::Debug for PresetOverrideStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresetOverrideStore")
            .field("durable", &self.store.is_durable())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;
    use serde_json::json;

    fn store() -> (Arc<InMemoryStore>, PresetOverrideStore) {
        let backend = Arc::new(InMemoryStore::new());
        let presets = PresetOverrideStore::new(backend.clone());
        (backend, presets)
    }

    fn override_with(keys: &[&str]) -> PresetOverride {
        PresetOverride {
            keys: keys.iter().copied().collect(),
            include_flag: true,
            wrapper_days: None,
        }
    }

    #[tokio::test]
    async fn test_empty_store_loads_default() {
        let (_, presets) = store();
        assert_eq!(presets.load().await, PresetOverrides::default());
    }

    #[tokio::test]
    async fn test_set_and_clear_tier() {
        let (_, presets) = store();
        let doc = presets
            .set_tier(Tier::Premium, override_with(&["gl", "lease"]))
            .await
            .unwrap();
        assert!(doc.get(Tier::Premium).is_some());
        assert_eq!(presets.load().await, doc);

        let doc = presets.clear_tier(Tier::Premium).await.unwrap();
        assert!(doc.get(Tier::Premium).is_none());
    }

    #[tokio::test]
    async fn test_corrupt_document_falls_back() {
        let (backend, presets) = store();
        backend
            .set(PresetOverrides::STORAGE_KEY, json!({"standard": {"keys": 42}}))
            .await
            .unwrap();

        assert!(presets.try_load().await.is_err());
        assert_eq!(presets.load().await, PresetOverrides::default());
    }

    #[tokio::test]
    async fn test_update_refuses_to_overwrite_undecodable_document() {
        let (backend, presets) = store();
        let stored = json!({
            "essential": {"keys": ["gl"], "includeFlag": true},
            "standard": {"keys": 42}
        });
        backend
            .set(PresetOverrides::STORAGE_KEY, stored.clone())
            .await
            .unwrap();

        assert!(presets
            .set_tier(Tier::Premium, override_with(&["lease"]))
            .await
            .is_err());
        assert!(presets.clear_tier(Tier::Standard).await.is_err());
        // the valid essential override is still there
        assert_eq!(
            backend.get(PresetOverrides::STORAGE_KEY).await.unwrap(),
            Some(stored)
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_tier_updates_are_not_lost() {
        let (_, presets) = store();
        for round in 0..50 {
            let (a, b) = (presets.clone(), presets.clone());
            let essential = tokio::spawn(async move {
                a.set_tier(Tier::Essential, override_with(&["gl"])).await
            });
            let premium = tokio::spawn(async move {
                b.set_tier(Tier::Premium, override_with(&["lease"])).await
            });
            essential.await.unwrap().unwrap();
            premium.await.unwrap().unwrap();

            let doc = presets.try_load().await.unwrap();
            assert!(doc.get(Tier::Essential).is_some(), "round {}", round);
            assert!(doc.get(Tier::Premium).is_some(), "round {}", round);
            presets.clear_all().await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_null_tiers_are_written() {
        let (backend, presets) = store();
        presets
            .set_tier(Tier::Essential, override_with(&["gl"]))
            .await
            .unwrap();

        let raw = backend
            .get(PresetOverrides::STORAGE_KEY)
            .await
            .unwrap()
            .unwrap();
        assert!(raw["standard"].is_null());
        assert_eq!(raw["essential"]["keys"], json!(["gl"]));
    }
}
