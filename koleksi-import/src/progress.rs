//! Import progress reporting.

use koleksi_core::CollectionItem;

use crate::snapshot::ImportStats;

/// Receives updates while a snapshot is decoded and applied.
pub trait ImportProgress {
    /// Called after snapshot entry `index` (zero-based) of `total` is decoded.
    fn on_item(&self, index: usize, total: usize, item: &CollectionItem);

    /// Called once the catalog has been replaced.
    fn on_replaced(&self, stats: &ImportStats);
}

/// Writes import progress to the `log` crate.
pub struct LogProgress;

impl ImportProgress for LogProgress {
    fn on_item(&self, index: usize, total: usize, item: &CollectionItem) {
        log::debug!(
            "  [{}/{}] {} entry {} ({})",
            index + 1,
            total,
            item.platform().display_name(),
            item.id.map_or_else(|| "new".to_string(), |id| id.to_string()),
            item.model
        );
    }

    fn on_replaced(&self, stats: &ImportStats) {
        log::info!(
            "Catalog now holds {} imported entries ({} Tensor, {} newly numbered)",
            stats.total_records,
            stats.tensor_records,
            stats.assigned_ids
        );
    }
}
