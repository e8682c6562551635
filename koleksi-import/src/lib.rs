//! Export the image catalog to a portable JSON snapshot and import one back.
//!
//! The snapshot is a bare JSON array of entries in store order, ids included.
//! Importing replaces the whole catalog in one atomic step.

pub mod progress;
pub mod snapshot;

pub use progress::{ImportProgress, LogProgress};
pub use snapshot::{
    EXPORT_FILE_NAME, ExportError, ImportError, ImportStats, export_catalog, import_catalog,
    parse_snapshot,
};
