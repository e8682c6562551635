//! Read queries for the catalog database.
//!
//! Listings come back in id order, which is insertion order for items the
//! store numbered itself.

use std::collections::HashMap;

use koleksi_core::{CollectionItem, Generation, ItemId, LoraEntry, Platform, TensorSettings};
use rusqlite::types::Type;
use rusqlite::{Connection, Row, params};

use crate::operations::StoreError;

const ITEM_COLUMNS: &str = "id, image, platform, prompt, negative_prompt, model, notes,
     vae, sampler, scheduler, cfg, steps, seed, upscaler, adetailer, lora";

/// All items, in id order.
pub fn list_items(conn: &Connection) -> Result<Vec<CollectionItem>, StoreError> {
    let sql = format!("SELECT {} FROM collections ORDER BY id", ITEM_COLUMNS);
    let items = query_items(conn, &sql, [])?;
    let mut tags = load_tags(conn, None)?;
    Ok(items
        .into_iter()
        .map(|mut item| {
            if let Some(id) = item.id {
                item.tags = tags.remove(&id).unwrap_or_default();
            }
            item
        })
        .collect())
}

/// A single item by id.
pub fn get_item(conn: &Connection, id: ItemId) -> Result<CollectionItem, StoreError> {
    let sql = format!("SELECT {} FROM collections WHERE id = ?1", ITEM_COLUMNS);
    let mut item = query_items(conn, &sql, params![id])?
        .pop()
        .ok_or(StoreError::NotFound(id))?;
    item.tags = load_tags(conn, Some(id))?.remove(&id).unwrap_or_default();
    Ok(item)
}

/// Ids of items carrying `tag` (exact match), in id order.
pub fn ids_with_tag(conn: &Connection, tag: &str) -> Result<Vec<ItemId>, StoreError> {
    let mut stmt = conn
        .prepare(
            "SELECT DISTINCT collection_id FROM collection_tags
             WHERE tag = ?1 ORDER BY collection_id",
        )
        .map_err(StoreError::Unavailable)?;
    let rows = stmt
        .query_map(params![tag], |row| row.get(0))
        .map_err(StoreError::Unavailable)?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(StoreError::Unavailable)
}

/// Ids of items from `platform`, in id order.
pub fn ids_for_platform(conn: &Connection, platform: Platform) -> Result<Vec<ItemId>, StoreError> {
    let mut stmt = conn
        .prepare("SELECT id FROM collections WHERE platform = ?1 ORDER BY id")
        .map_err(StoreError::Unavailable)?;
    let rows = stmt
        .query_map(params![platform.key()], |row| row.get(0))
        .map_err(StoreError::Unavailable)?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(StoreError::Unavailable)
}

pub fn count_items(conn: &Connection) -> Result<u64, StoreError> {
    conn.query_row("SELECT COUNT(*) FROM collections", [], |row| row.get::<_, i64>(0))
        .map(|count| count as u64)
        .map_err(StoreError::Unavailable)
}

fn query_items<P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Vec<CollectionItem>, StoreError> {
    let mut stmt = conn.prepare(sql).map_err(StoreError::Unavailable)?;
    let rows = stmt
        .query_map(params, row_to_item)
        .map_err(StoreError::Unavailable)?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(StoreError::Unavailable)
}

/// Tags grouped by item, each list in entry order.
fn load_tags(
    conn: &Connection,
    only: Option<ItemId>,
) -> Result<HashMap<ItemId, Vec<String>>, StoreError> {
    let mut stmt = conn
        .prepare(
            "SELECT collection_id, tag FROM collection_tags
             WHERE ?1 IS NULL OR collection_id = ?1
             ORDER BY collection_id, position",
        )
        .map_err(StoreError::Unavailable)?;
    let rows = stmt
        .query_map(params![only], |row| {
            Ok((row.get::<_, ItemId>(0)?, row.get::<_, String>(1)?))
        })
        .map_err(StoreError::Unavailable)?;

    let mut tags: HashMap<ItemId, Vec<String>> = HashMap::new();
    for row in rows {
        let (id, tag) = row.map_err(StoreError::Unavailable)?;
        tags.entry(id).or_default().push(tag);
    }
    Ok(tags)
}

/// Decode a row selected with [`ITEM_COLUMNS`]. Tags are filled in separately.
fn row_to_item(row: &Row) -> rusqlite::Result<CollectionItem> {
    let platform: String = row.get(2)?;
    let platform: Platform = platform
        .parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;

    let generation = if platform == Platform::Tensor {
        let defaults = TensorSettings::default();
        let lora: String = row.get(15)?;
        let lora: Vec<String> = serde_json::from_str(&lora)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(15, Type::Text, Box::new(e)))?;
        Generation::Tensor(TensorSettings {
            vae: row.get::<_, Option<String>>(7)?.unwrap_or(defaults.vae),
            sampler: row.get::<_, Option<String>>(8)?.unwrap_or(defaults.sampler),
            scheduler: row.get::<_, Option<String>>(9)?.unwrap_or(defaults.scheduler),
            cfg: row.get::<_, Option<f64>>(10)?.unwrap_or(defaults.cfg),
            steps: row.get::<_, Option<u32>>(11)?.unwrap_or(defaults.steps),
            seed: row.get::<_, Option<String>>(12)?.unwrap_or(defaults.seed),
            upscaler: row.get::<_, Option<bool>>(13)?.unwrap_or(defaults.upscaler),
            adetailer: row.get::<_, Option<bool>>(14)?.unwrap_or(defaults.adetailer),
            lora: lora.iter().filter_map(|raw| LoraEntry::parse_slot(raw)).collect(),
        })
    } else {
        Generation::for_platform(platform, TensorSettings::default())
    };

    Ok(CollectionItem {
        id: Some(row.get(0)?),
        image: row.get(1)?,
        prompt: row.get(3)?,
        negative_prompt: row.get(4)?,
        model: row.get(5)?,
        notes: row.get(6)?,
        tags: Vec::new(),
        generation,
    })
}
