//! Whole-catalog export and import.
//!
//! Export reads the store listing and writes it as a pretty-printed JSON
//! array. Import decodes every element first, then hands the batch to the
//! store's atomic replace, so a bad file never touches the catalog.

use koleksi_core::{CollectionItem, Platform};
use koleksi_db::{CatalogStore, StoreError};
use serde_json::Value;
use thiserror::Error;

use crate::progress::ImportProgress;

/// Name offered for downloaded snapshots.
pub const EXPORT_FILE_NAME: &str = "koleksi-gambar-ai.json";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Could not read catalog: {0}")]
    Read(#[from] StoreError),
    #[error("Could not encode catalog: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ImportError {
    /// The payload is not JSON, or its top level is not an array.
    #[error("Invalid snapshot format: {0}")]
    Format(String),
    #[error("Snapshot entry {index} is invalid: {source}")]
    Record {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("Catalog replace failed: {0}")]
    Store(#[from] StoreError),
}

/// Statistics from a single import.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportStats {
    pub total_records: usize,
    /// Entries that arrived without an id and were assigned a fresh one.
    pub assigned_ids: usize,
    pub tensor_records: usize,
}

impl ImportStats {
    fn from_items(items: &[CollectionItem]) -> Self {
        Self {
            total_records: items.len(),
            assigned_ids: items.iter().filter(|item| item.id.is_none()).count(),
            tensor_records: items
                .iter()
                .filter(|item| item.platform() == Platform::Tensor)
                .count(),
        }
    }
}

/// Serialize the full catalog, in store order, as a UTF-8 JSON array.
pub async fn export_catalog<S: CatalogStore>(store: &S) -> Result<Vec<u8>, ExportError> {
    let items = store.list().await?;
    let bytes = serde_json::to_vec_pretty(&items)?;
    log::info!("Exported {} catalog items ({} bytes)", items.len(), bytes.len());
    Ok(bytes)
}

/// Decode a snapshot payload without touching any store.
///
/// Optional fields may be missing or null; unknown fields are ignored. Each
/// element must still be an object naming a known platform and carrying
/// `image`, `platform`, `prompt` and `model`.
pub fn parse_snapshot(
    bytes: &[u8],
    progress: Option<&dyn ImportProgress>,
) -> Result<Vec<CollectionItem>, ImportError> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| ImportError::Format(format!("not valid JSON: {}", e)))?;
    let Value::Array(elements) = value else {
        return Err(ImportError::Format(format!(
            "expected a top-level array, found {}",
            value_kind(&value)
        )));
    };

    let total = elements.len();
    let mut items = Vec::with_capacity(total);
    for (index, element) in elements.into_iter().enumerate() {
        let item: CollectionItem = serde_json::from_value(element)
            .map_err(|source| ImportError::Record { index, source })?;
        if let Some(p) = progress {
            p.on_item(index, total, &item);
        }
        items.push(item);
    }
    Ok(items)
}

/// Replace the catalog with the snapshot in `bytes`.
///
/// On any error the catalog is left exactly as it was.
pub async fn import_catalog<S: CatalogStore>(
    store: &S,
    bytes: &[u8],
    progress: Option<&dyn ImportProgress>,
) -> Result<ImportStats, ImportError> {
    let items = parse_snapshot(bytes, progress)?;
    let stats = ImportStats::from_items(&items);

    store.replace_all(&items).await?;

    log::info!("Imported {} catalog items", stats.total_records);
    if let Some(p) = progress {
        p.on_replaced(&stats);
    }
    Ok(stats)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
