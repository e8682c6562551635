use koleksi_core::{CollectionItem, Generation, LoraEntry, Platform, TensorSettings};
use koleksi_db::*;

fn gemini_item(prompt: &str) -> CollectionItem {
    CollectionItem {
        id: None,
        image: "data:image/png;base64,AAAA".to_string(),
        prompt: prompt.to_string(),
        negative_prompt: String::new(),
        model: "Gemini 2.5 Flash".to_string(),
        tags: vec!["landscape".to_string(), "dusk".to_string()],
        notes: String::new(),
        generation: Generation::Gemini,
    }
}

fn tensor_item(prompt: &str) -> CollectionItem {
    CollectionItem {
        id: None,
        image: "data:image/jpeg;base64,BBBB".to_string(),
        prompt: prompt.to_string(),
        negative_prompt: "lowres, watermark".to_string(),
        model: "SDXL".to_string(),
        tags: vec!["portrait".to_string(), "portrait".to_string()],
        notes: "second pass".to_string(),
        generation: Generation::Tensor(TensorSettings {
            vae: "orangemix.vae".to_string(),
            cfg: 7.5,
            steps: 42,
            seed: "123456789".to_string(),
            upscaler: true,
            lora: vec![
                LoraEntry::new("film_grain", 0.4).unwrap(),
                LoraEntry::new("add_detail", 1.0).unwrap(),
            ],
            ..TensorSettings::default()
        }),
    }
}

#[test]
fn insert_assigns_sequential_ids() {
    let conn = open_memory().unwrap();
    let a = insert_item(&conn, &gemini_item("first")).unwrap();
    let b = insert_item(&conn, &gemini_item("second")).unwrap();
    assert_eq!(a, 1);
    assert_eq!(b, 2);
}

#[test]
fn insert_ignores_caller_id() {
    let conn = open_memory().unwrap();
    let id = insert_item(&conn, &gemini_item("x").with_id(500)).unwrap();
    assert_eq!(id, 1);
}

#[test]
fn tensor_item_round_trips_every_field() {
    let conn = open_memory().unwrap();
    let original = tensor_item("android in rain");
    let id = insert_item(&conn, &original).unwrap();

    let stored = get_item(&conn, id).unwrap();
    assert_eq!(stored, original.with_id(id));
}

#[test]
fn non_tensor_rows_keep_settings_null() {
    let conn = open_memory().unwrap();
    let id = insert_item(&conn, &gemini_item("x")).unwrap();

    let (cfg, lora): (Option<f64>, String) = conn
        .query_row(
            "SELECT cfg, lora FROM collections WHERE id = ?1",
            [id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(cfg, None);
    assert_eq!(lora, "[]");
}

#[test]
fn missing_required_field_is_rejected() {
    let conn = open_memory().unwrap();
    let mut item = gemini_item("x");
    item.model = " ".to_string();
    assert!(matches!(
        insert_item(&conn, &item),
        Err(StoreError::Invalid(_))
    ));
    assert_eq!(count_items(&conn).unwrap(), 0);
}

#[test]
fn update_replaces_body_and_keeps_id() {
    let conn = open_memory().unwrap();
    let keep = insert_item(&conn, &gemini_item("untouched")).unwrap();
    let id = insert_item(&conn, &gemini_item("before")).unwrap();

    let replacement = tensor_item("after");
    update_item(&conn, id, &replacement).unwrap();

    let items = list_items(&conn).unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0], gemini_item("untouched").with_id(keep));
    assert_eq!(items[1], replacement.with_id(id));
}

#[test]
fn update_missing_id_is_not_found() {
    let conn = open_memory().unwrap();
    assert!(matches!(
        update_item(&conn, 77, &gemini_item("x")),
        Err(StoreError::NotFound(77))
    ));
}

#[test]
fn delete_removes_item_and_tags() {
    let conn = open_memory().unwrap();
    let id = insert_item(&conn, &gemini_item("gone")).unwrap();
    delete_item(&conn, id).unwrap();

    assert!(list_items(&conn).unwrap().is_empty());
    let tag_rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM collection_tags", [], |row| row.get(0))
        .unwrap();
    assert_eq!(tag_rows, 0);

    assert!(matches!(delete_item(&conn, id), Err(StoreError::NotFound(_))));
}

#[test]
fn ids_are_not_reused_after_delete_or_clear() {
    let conn = open_memory().unwrap();
    let a = insert_item(&conn, &gemini_item("a")).unwrap();
    delete_item(&conn, a).unwrap();
    let b = insert_item(&conn, &gemini_item("b")).unwrap();
    assert!(b > a);

    clear_items(&conn).unwrap();
    let c = insert_item(&conn, &gemini_item("c")).unwrap();
    assert!(c > b);
}

#[test]
fn bulk_insert_keeps_given_ids() {
    let conn = open_memory().unwrap();
    let items = vec![
        gemini_item("ten").with_id(10),
        tensor_item("three").with_id(3),
        gemini_item("fresh"),
    ];
    bulk_insert_items(&conn, &items).unwrap();

    let ids: Vec<_> = list_items(&conn).unwrap().iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![Some(3), Some(10), Some(11)]);
}

#[test]
fn bulk_insert_is_all_or_nothing() {
    let conn = open_memory().unwrap();
    let mut bad = gemini_item("bad");
    bad.image.clear();
    let items = vec![gemini_item("ok"), bad];

    match bulk_insert_items(&conn, &items) {
        Err(StoreError::BulkInsert { index, .. }) => assert_eq!(index, 1),
        other => panic!("expected BulkInsert, got {:?}", other),
    }
    assert_eq!(count_items(&conn).unwrap(), 0);
}

#[test]
fn bulk_insert_rejects_duplicate_ids() {
    let conn = open_memory().unwrap();
    let items = vec![gemini_item("a").with_id(1), gemini_item("b").with_id(1)];
    assert!(matches!(
        bulk_insert_items(&conn, &items),
        Err(StoreError::BulkInsert { index: 1, .. })
    ));
    assert_eq!(count_items(&conn).unwrap(), 0);
}

#[test]
fn failed_replace_keeps_previous_catalog() {
    let conn = open_memory().unwrap();
    insert_item(&conn, &gemini_item("keep me")).unwrap();
    let before = list_items(&conn).unwrap();

    let mut bad = tensor_item("bad");
    bad.prompt.clear();
    let result = replace_items(&conn, &[gemini_item("new").with_id(5), bad]);
    assert!(matches!(result, Err(StoreError::BulkInsert { index: 1, .. })));

    assert_eq!(list_items(&conn).unwrap(), before);
}

#[test]
fn replace_is_invisible_to_other_connections_until_commit() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.db");
    let writer = open_database(&path).unwrap();
    let reader = open_database(&path).unwrap();

    insert_item(&writer, &gemini_item("old one")).unwrap();
    insert_item(&writer, &gemini_item("old two")).unwrap();
    let before = list_items(&reader).unwrap();
    assert_eq!(before.len(), 2);

    let incoming = vec![tensor_item("new").with_id(40)];

    // Walk the replace by hand to observe the point between clear and insert
    let tx = writer.unchecked_transaction().unwrap();
    clear_items(&tx).unwrap();
    assert_eq!(list_items(&reader).unwrap(), before);

    insert_rows(&tx, &incoming).unwrap();
    assert_eq!(list_items(&reader).unwrap(), before);

    tx.commit().unwrap();
    let after = list_items(&reader).unwrap();
    assert_eq!(after.len(), 1);
    assert_eq!(after[0].id, Some(40));
}

#[test]
fn replace_items_swaps_catalog() {
    let conn = open_memory().unwrap();
    insert_item(&conn, &gemini_item("old")).unwrap();

    let incoming = vec![tensor_item("new a").with_id(7), gemini_item("new b").with_id(8)];
    replace_items(&conn, &incoming).unwrap();

    assert_eq!(list_items(&conn).unwrap(), incoming);
}

#[test]
fn tag_and_platform_lookups_use_indexes() {
    let conn = open_memory().unwrap();
    let g = insert_item(&conn, &gemini_item("g")).unwrap();
    let t = insert_item(&conn, &tensor_item("t")).unwrap();

    assert_eq!(ids_with_tag(&conn, "portrait").unwrap(), vec![t]);
    assert_eq!(ids_with_tag(&conn, "dusk").unwrap(), vec![g]);
    assert_eq!(ids_for_platform(&conn, Platform::Tensor).unwrap(), vec![t]);
    assert!(ids_for_platform(&conn, Platform::Leonardo).unwrap().is_empty());
}
