use std::cell::RefCell;

use koleksi_core::{CollectionItem, Generation, LoraEntry, TensorSettings};
use koleksi_db::{CatalogStore, MemoryStore, SqliteStore, StoreError};
use koleksi_import::*;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn sample_items() -> Vec<CollectionItem> {
    vec![
        CollectionItem {
            id: Some(2),
            image: "data:image/png;base64,AAAA".to_string(),
            prompt: "lighthouse at dawn".to_string(),
            negative_prompt: String::new(),
            model: "V6".to_string(),
            tags: vec!["coast".to_string(), "dawn".to_string()],
            notes: "upscaled twice".to_string(),
            generation: Generation::Midjourney,
        },
        CollectionItem {
            id: Some(5),
            image: "data:image/webp;base64,BBBB".to_string(),
            prompt: "portrait, film look".to_string(),
            negative_prompt: "blurry".to_string(),
            model: "my-merge-v3".to_string(),
            tags: vec![],
            notes: String::new(),
            generation: Generation::Tensor(TensorSettings {
                vae: "kl-f8-anime2.vae".to_string(),
                sampler: "euler_ancestral".to_string(),
                cfg: 6.5,
                steps: 28,
                seed: "42".to_string(),
                lora: vec![LoraEntry::new("film_grain", 0.35).unwrap()],
                ..TensorSettings::default()
            }),
        },
    ]
}

#[tokio::test]
async fn import_of_export_restores_catalog_with_ids() {
    init_logging();
    let source = MemoryStore::with_items(&sample_items()).unwrap();
    let bytes = export_catalog(&source).await.unwrap();

    let target = SqliteStore::open_memory().unwrap();
    target
        .add(&sample_items()[0].clone().with_id(99))
        .await
        .unwrap();
    let stats = import_catalog(&target, &bytes, Some(&LogProgress)).await.unwrap();

    assert_eq!(stats.total_records, 2);
    assert_eq!(stats.tensor_records, 1);
    assert_eq!(stats.assigned_ids, 0);
    assert_eq!(target.list().await.unwrap(), sample_items());
}

#[tokio::test]
async fn export_writes_flat_camel_case_array() {
    let store = MemoryStore::with_items(&sample_items()).unwrap();
    let bytes = export_catalog(&store).await.unwrap();

    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let array = value.as_array().unwrap();
    assert_eq!(array.len(), 2);

    assert_eq!(array[0]["id"], 2);
    assert_eq!(array[0]["platform"], "midjourney");
    assert_eq!(array[0]["lora"], serde_json::json!([]));
    assert!(array[0].get("sampler").is_none());

    assert_eq!(array[1]["negativePrompt"], "blurry");
    assert_eq!(array[1]["lora"], serde_json::json!(["film_grain:0.35"]));
    assert_eq!(array[1]["steps"], 28);
}

#[tokio::test]
async fn export_of_empty_catalog_is_empty_array() {
    let store = MemoryStore::new();
    let bytes = export_catalog(&store).await.unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value, serde_json::json!([]));
}

#[tokio::test]
async fn non_array_payload_is_format_error() {
    let store = MemoryStore::with_items(&sample_items()).unwrap();

    for payload in [&b"{\"items\": []}"[..], b"42", b"not json at all"] {
        let result = import_catalog(&store, payload, None).await;
        assert!(
            matches!(result, Err(ImportError::Format(_))),
            "payload {:?} gave {:?}",
            String::from_utf8_lossy(payload),
            result
        );
    }
    assert_eq!(store.list().await.unwrap(), sample_items());
}

#[tokio::test]
async fn bad_element_leaves_catalog_intact() {
    let store = SqliteStore::open_memory().unwrap();
    store.bulk_add(&sample_items()).await.unwrap();

    let payload = br#"[
        {"id": 1, "image": "data:image/png;base64,CC", "platform": "gemini",
         "prompt": "ok", "model": "Gemini 2.5 Pro"},
        {"id": 2, "image": "data:image/png;base64,DD", "platform": "dalle",
         "prompt": "unknown platform", "model": "x"}
    ]"#;
    match import_catalog(&store, payload, None).await {
        Err(ImportError::Record { index, .. }) => assert_eq!(index, 1),
        other => panic!("expected Record error, got {:?}", other),
    }

    let not_object = br#"[{"image": "a", "platform": "gemini", "prompt": "p", "model": "m"}, "x"]"#;
    assert!(matches!(
        import_catalog(&store, not_object, None).await,
        Err(ImportError::Record { index: 1, .. })
    ));

    assert_eq!(store.list().await.unwrap(), sample_items());
}

#[tokio::test]
async fn duplicate_ids_fail_whole_import() {
    let store = MemoryStore::with_items(&sample_items()).unwrap();
    let payload = br#"[
        {"id": 7, "image": "a", "platform": "leonardo", "prompt": "p", "model": "Anime"},
        {"id": 7, "image": "b", "platform": "leonardo", "prompt": "q", "model": "Anime"}
    ]"#;

    assert!(matches!(
        import_catalog(&store, payload, None).await,
        Err(ImportError::Store(StoreError::BulkInsert { index: 1, .. }))
    ));
    assert_eq!(store.list().await.unwrap(), sample_items());
}

#[test]
fn parse_fills_defaults_and_normalizes() {
    let payload = br#"[
        {"image": "data:image/png;base64,EE", "platform": "tensor",
         "prompt": "castle", "model": "SDXL", "tags": "stone, , keep ",
         "cfg": "7", "steps": null, "lora": ["abc:1.5", "", ":0", "xyz:bad"],
         "extra": "ignored"},
        {"image": "data:image/png;base64,FF", "platform": "Gemini",
         "prompt": "sky", "model": "Gemini 2.5 Flash", "sampler": "euler",
         "lora": ["stray:1"]}
    ]"#;
    let items = parse_snapshot(payload, None).unwrap();

    assert_eq!(items[0].id, None);
    assert_eq!(items[0].tags, vec!["stone", "keep"]);
    let tensor = items[0].generation.tensor().unwrap();
    assert_eq!(tensor.cfg, 7.0);
    assert_eq!(tensor.steps, TensorSettings::DEFAULT_STEPS);
    let lora: Vec<String> = tensor.lora.iter().map(ToString::to_string).collect();
    assert_eq!(lora, vec!["abc:1.5", "xyz:0.8"]);

    assert_eq!(items[1].generation, Generation::Gemini);
    assert!(items[1].lora().is_empty());
}

#[test]
fn parse_rejects_missing_required_field() {
    let payload = br#"[{"image": "data:image/png;base64,EE", "platform": "piclumen", "prompt": "  "}]"#;
    match parse_snapshot(payload, None) {
        Err(ImportError::Record { index, source }) => {
            assert_eq!(index, 0);
            assert!(source.to_string().contains("prompt"), "{}", source);
        }
        other => panic!("expected Record error, got {:?}", other),
    }
}

#[derive(Default)]
struct RecordingProgress {
    events: RefCell<Vec<String>>,
}

impl ImportProgress for RecordingProgress {
    fn on_item(&self, index: usize, total: usize, item: &CollectionItem) {
        self.events
            .borrow_mut()
            .push(format!("{}/{} {}", index, total, item.prompt));
    }

    fn on_replaced(&self, stats: &ImportStats) {
        self.events.borrow_mut().push(format!(
            "replaced {} ({} tensor)",
            stats.total_records, stats.tensor_records
        ));
    }
}

#[tokio::test]
async fn progress_reports_each_entry_then_replace() {
    let store = MemoryStore::new();
    let bytes = serde_json::to_vec(&sample_items()).unwrap();
    let progress = RecordingProgress::default();

    import_catalog(&store, &bytes, Some(&progress)).await.unwrap();

    assert_eq!(
        progress.events.into_inner(),
        vec![
            "0/2 lighthouse at dawn",
            "1/2 portrait, film look",
            "replaced 2 (1 tensor)",
        ]
    );
}

#[tokio::test]
async fn failed_import_reports_no_replace() {
    let store = MemoryStore::with_items(&sample_items()).unwrap();
    let progress = RecordingProgress::default();
    let payload = br#"[{"image": "a", "platform": "gemini", "prompt": "p", "model": "m"}, 7]"#;

    assert!(import_catalog(&store, payload, Some(&progress)).await.is_err());
    assert_eq!(progress.events.into_inner(), vec!["0/2 p"]);
}

#[tokio::test]
async fn oversized_lora_list_fails_whole_import() {
    let store = SqliteStore::open_memory().unwrap();
    store.bulk_add(&sample_items()).await.unwrap();

    let payload = br#"[
        {"id": 1, "image": "data:image/png;base64,CC", "platform": "gemini",
         "prompt": "ok", "model": "Gemini 2.5 Pro"},
        {"id": 2, "image": "data:image/png;base64,DD", "platform": "tensor",
         "prompt": "stacked adapters", "model": "SDXL",
         "lora": ["a:1", "b:1", "c:1", "d:1", "e:1", "f:1", "g:1", "h:1"]}
    ]"#;
    match import_catalog(&store, payload, None).await {
        Err(ImportError::Record { index, source }) => {
            assert_eq!(index, 1);
            assert!(source.to_string().contains("LoRA"), "{}", source);
        }
        other => panic!("expected Record error, got {:?}", other),
    }
    assert_eq!(store.list().await.unwrap(), sample_items());
}
