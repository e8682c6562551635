//! Write operations on the `collections` table.
//!
//! Every public function leaves the database unchanged when it fails:
//! multi-statement writes run inside a transaction.

use koleksi_core::{CollectionItem, Generation, ItemId, LoraEntry, RecordError};
use rusqlite::{Connection, params};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Catalog storage unavailable: {0}")]
    Unavailable(#[source] rusqlite::Error),
    #[error("Catalog write failed: {0}")]
    Write(#[source] rusqlite::Error),
    #[error("Collection item not found: {0}")]
    NotFound(ItemId),
    #[error("Bulk insert rejected record {index}: {reason}")]
    BulkInsert { index: usize, reason: String },
    #[error("Invalid record: {0}")]
    Invalid(#[from] RecordError),
}

/// Reject structurally invalid items before they reach SQL.
pub(crate) fn check_item(item: &CollectionItem) -> Result<(), RecordError> {
    item.validate()
}

// ── Single-item writes ──────────────────────────────────────────────────────

/// Insert a new item and return its assigned id. Any `id` on `item` is ignored.
pub fn insert_item(conn: &Connection, item: &CollectionItem) -> Result<ItemId, StoreError> {
    check_item(item)?;

    let tx = conn.unchecked_transaction().map_err(StoreError::Write)?;
    let id = write_item(&tx, None, item).map_err(StoreError::Write)?;
    tx.commit().map_err(StoreError::Write)?;

    log::debug!("Inserted collection item {}", id);
    Ok(id)
}

/// Replace the body of item `id`, keeping its id.
pub fn update_item(conn: &Connection, id: ItemId, item: &CollectionItem) -> Result<(), StoreError> {
    check_item(item)?;

    let tx = conn.unchecked_transaction().map_err(StoreError::Write)?;
    let columns = ItemColumns::from_item(item).map_err(StoreError::Write)?;
    let changed = tx
        .execute(
            "UPDATE collections SET
                 image = ?2, platform = ?3, prompt = ?4, negative_prompt = ?5,
                 model = ?6, notes = ?7, vae = ?8, sampler = ?9, scheduler = ?10,
                 cfg = ?11, steps = ?12, seed = ?13, upscaler = ?14, adetailer = ?15,
                 lora = ?16
             WHERE id = ?1",
            params![
                id,
                item.image,
                item.platform().key(),
                item.prompt,
                item.negative_prompt,
                item.model,
                item.notes,
                columns.vae,
                columns.sampler,
                columns.scheduler,
                columns.cfg,
                columns.steps,
                columns.seed,
                columns.upscaler,
                columns.adetailer,
                columns.lora,
            ],
        )
        .map_err(StoreError::Write)?;
    if changed == 0 {
        return Err(StoreError::NotFound(id));
    }

    tx.execute(
        "DELETE FROM collection_tags WHERE collection_id = ?1",
        params![id],
    )
    .map_err(StoreError::Write)?;
    write_tags(&tx, id, &item.tags).map_err(StoreError::Write)?;
    tx.commit().map_err(StoreError::Write)?;

    log::debug!("Updated collection item {}", id);
    Ok(())
}

/// Delete item `id`. Deleting an absent id reports `NotFound`.
pub fn delete_item(conn: &Connection, id: ItemId) -> Result<(), StoreError> {
    // Tags go with it through ON DELETE CASCADE
    let changed = conn
        .execute("DELETE FROM collections WHERE id = ?1", params![id])
        .map_err(StoreError::Write)?;
    if changed == 0 {
        return Err(StoreError::NotFound(id));
    }
    log::debug!("Deleted collection item {}", id);
    Ok(())
}

// ── Bulk writes ─────────────────────────────────────────────────────────────

/// Remove every item. The id sequence is kept, so ids are never reused.
pub fn clear_items(conn: &Connection) -> Result<(), StoreError> {
    let removed = conn
        .execute("DELETE FROM collections", [])
        .map_err(StoreError::Write)?;
    log::debug!("Cleared {} collection items", removed);
    Ok(())
}

/// Insert every item, keeping each item's own `id` when it has one.
///
/// All-or-nothing: if any item is invalid or collides with an existing id,
/// nothing is inserted.
pub fn bulk_insert_items(conn: &Connection, items: &[CollectionItem]) -> Result<(), StoreError> {
    let tx = conn.unchecked_transaction().map_err(StoreError::Write)?;
    insert_rows(&tx, items)?;
    tx.commit().map_err(StoreError::Write)?;
    log::debug!("Bulk inserted {} collection items", items.len());
    Ok(())
}

/// Atomically replace the whole catalog with `items`.
///
/// The clear and the inserts share one transaction, so other connections see
/// either the old catalog or the new one, and a failed insert leaves the old
/// catalog in place.
pub fn replace_items(conn: &Connection, items: &[CollectionItem]) -> Result<(), StoreError> {
    let tx = conn.unchecked_transaction().map_err(StoreError::Write)?;
    clear_items(&tx)?;
    insert_rows(&tx, items)?;
    tx.commit().map_err(StoreError::Write)?;
    log::info!("Replaced catalog with {} items", items.len());
    Ok(())
}

/// Insert every item without opening a transaction of its own.
///
/// Callers run this inside their transaction; an error leaves earlier rows
/// of the batch for that transaction to roll back.
pub fn insert_rows(conn: &Connection, items: &[CollectionItem]) -> Result<(), StoreError> {
    for (index, item) in items.iter().enumerate() {
        check_item(item).map_err(|e| StoreError::BulkInsert {
            index,
            reason: e.to_string(),
        })?;
        write_item(conn, item.id, item).map_err(|e| StoreError::BulkInsert {
            index,
            reason: e.to_string(),
        })?;
    }
    Ok(())
}

// ── Row encoding ────────────────────────────────────────────────────────────

/// Tensor-only columns, all NULL for other platforms.
#[derive(Default)]
struct ItemColumns {
    vae: Option<String>,
    sampler: Option<String>,
    scheduler: Option<String>,
    cfg: Option<f64>,
    steps: Option<u32>,
    seed: Option<String>,
    upscaler: Option<bool>,
    adetailer: Option<bool>,
    lora: String,
}

impl ItemColumns {
    fn from_item(item: &CollectionItem) -> rusqlite::Result<Self> {
        let Generation::Tensor(settings) = &item.generation else {
            return Ok(Self {
                lora: "[]".to_string(),
                ..Self::default()
            });
        };
        let lora: Vec<String> = settings.lora.iter().map(LoraEntry::to_string).collect();
        let lora = serde_json::to_string(&lora)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
        Ok(Self {
            vae: Some(settings.vae.clone()),
            sampler: Some(settings.sampler.clone()),
            scheduler: Some(settings.scheduler.clone()),
            cfg: Some(settings.cfg),
            steps: Some(settings.steps),
            seed: Some(settings.seed.clone()),
            upscaler: Some(settings.upscaler),
            adetailer: Some(settings.adetailer),
            lora,
        })
    }
}

/// Insert one row plus its tags. `id` of `None` lets SQLite assign one.
fn write_item(
    conn: &Connection,
    id: Option<ItemId>,
    item: &CollectionItem,
) -> rusqlite::Result<ItemId> {
    let columns = ItemColumns::from_item(item)?;
    conn.execute(
        "INSERT INTO collections (id, image, platform, prompt, negative_prompt, model, notes,
             vae, sampler, scheduler, cfg, steps, seed, upscaler, adetailer, lora)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        params![
            id,
            item.image,
            item.platform().key(),
            item.prompt,
            item.negative_prompt,
            item.model,
            item.notes,
            columns.vae,
            columns.sampler,
            columns.scheduler,
            columns.cfg,
            columns.steps,
            columns.seed,
            columns.upscaler,
            columns.adetailer,
            columns.lora,
        ],
    )?;
    let id = conn.last_insert_rowid();
    write_tags(conn, id, &item.tags)?;
    Ok(id)
}

fn write_tags(conn: &Connection, id: ItemId, tags: &[String]) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO collection_tags (collection_id, position, tag) VALUES (?1, ?2, ?3)",
    )?;
    for (position, tag) in tags.iter().enumerate() {
        stmt.execute(params![id, position as i64, tag])?;
    }
    Ok(())
}
