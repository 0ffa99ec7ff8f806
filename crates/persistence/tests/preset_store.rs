//! Preset overrides against the durable file backend

use erp_calc_core::{EffortOverride, EffortSliders, PresetOverride, PresetOverrides, Tier};
use erp_calc_persistence::{init, KeyValueStore, StoreBackend};

fn standard_override() -> PresetOverride {
    PresetOverride {
        keys: ["finance_base_424", "lease"].into_iter().collect(),
        include_flag: true,
        wrapper_days: Some(
            EffortSliders {
                pmo: 70,
                ..Default::default()
            }
            .into(),
        ),
    }
}

#[tokio::test]
async fn test_overrides_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data/preset-overrides.json");

    let layer = init(StoreBackend::File(path.clone()));
    assert!(layer.store.is_durable());
    layer
        .presets
        .set_tier(Tier::Standard, standard_override())
        .await
        .unwrap();

    let reopened = init(StoreBackend::File(path));
    let doc = reopened.presets.load().await;
    let standard = doc.get(Tier::Standard).expect("override persisted");
    assert!(standard.keys.contains("lease"));
    assert_eq!(standard.wrapper_days.and_then(|w| w.pmo), Some(70));
    assert!(doc.get(Tier::Premium).is_none());
}

#[tokio::test]
async fn test_persisted_layout_uses_tier_names() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");

    let layer = init(StoreBackend::File(path.clone()));
    layer
        .presets
        .set_tier(Tier::Standard, standard_override())
        .await
        .unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let doc = &raw[PresetOverrides::STORAGE_KEY];
    assert!(doc["essential"].is_null());
    assert_eq!(doc["standard"]["includeFlag"], true);
    assert_eq!(doc["standard"]["wrapperDays"]["pmo"], 70);
    assert_eq!(doc["standard"]["wrapperDays"]["migrationCycles"], 2);
}

#[tokio::test]
async fn test_garbage_file_does_not_break_presets() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    std::fs::write(&path, "{ not json").unwrap();

    let layer = init(StoreBackend::File(path));
    assert_eq!(layer.presets.load().await, PresetOverrides::default());
    // writing over a corrupt file is refused rather than silently discarding it
    assert!(layer
        .presets
        .set_tier(Tier::Essential, standard_override())
        .await
        .is_err());
}

#[tokio::test]
async fn test_other_keys_are_preserved() {
    let dir = tempfile::tempdir().unwrap();
    let layer = init(StoreBackend::File(dir.path().join("store.json")));

    layer
        .store
        .set("lastClient", serde_json::json!("Acme"))
        .await
        .unwrap();
    layer
        .presets
        .set_tier(Tier::Premium, standard_override())
        .await
        .unwrap();
    layer.presets.clear_all().await.unwrap();

    assert_eq!(
        layer.store.get("lastClient").await.unwrap(),
        Some(serde_json::json!("Acme"))
    );
    assert!(layer
        .store
        .get(PresetOverrides::STORAGE_KEY)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_partial_wrapper_is_stored_as_given() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");

    let layer = init(StoreBackend::File(path.clone()));
    let value = PresetOverride {
        keys: ["lease"].into_iter().collect(),
        include_flag: false,
        wrapper_days: Some(EffortOverride {
            pmo: Some(70),
            ..Default::default()
        }),
    };
    layer.presets.set_tier(Tier::Premium, value).await.unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(
        raw[PresetOverrides::STORAGE_KEY]["premium"]["wrapperDays"],
        serde_json::json!({"pmo": 70})
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_updates_on_file_store_keep_both_tiers() {
    let dir = tempfile::tempdir().unwrap();
    let layer = init(StoreBackend::File(dir.path().join("store.json")));

    for round in 0..50 {
        let (a, b) = (layer.presets.clone(), layer.presets.clone());
        let essential = tokio::spawn(async move {
            a.set_tier(Tier::Essential, standard_override()).await
        });
        let premium = tokio::spawn(async move {
            b.set_tier(Tier::Premium, standard_override()).await
        });
        essential.await.unwrap().unwrap();
        premium.await.unwrap().unwrap();

        let doc = layer.presets.try_load().await.unwrap();
        assert!(doc.get(Tier::Essential).is_some(), "round {}", round);
        assert!(doc.get(Tier::Premium).is_some(), "round {}", round);
        layer.presets.clear_all().await.unwrap();
    }
}

#[tokio::test]
async fn test_undecodable_document_is_not_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let layer = init(StoreBackend::File(dir.path().join("store.json")));
    let stored = serde_json::json!({
        "essential": {"keys": ["gl"], "includeFlag": true},
        "standard": {"keys": 42}
    });
    layer
        .store
        .set(PresetOverrides::STORAGE_KEY, stored.clone())
        .await
        .unwrap();

    assert!(layer
        .presets
        .set_tier(Tier::Premium, standard_override())
        .await
        .is_err());
    assert_eq!(
        layer.store.get(PresetOverrides::STORAGE_KEY).await.unwrap(),
        Some(stored)
    );
}
