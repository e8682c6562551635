use koleksi_core::{ImageError, ValidationError};
use koleksi_db::{SchemaError, StoreError};
use koleksi_import::{ExportError, ImportError};
use thiserror::Error;

use crate::notice::Notice;

/// Everything a catalog action can fail with.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Form is incomplete: {0}")]
    Validation(#[from] ValidationError),

    #[error("Image rejected: {0}")]
    Image(#[from] ImageError),

    #[error("Could not open catalog: {0}")]
    Open(#[from] SchemaError),

    #[error("Could not load catalog: {0}")]
    Load(#[source] StoreError),

    #[error("Could not save entry: {0}")]
    Save(#[source] StoreError),

    #[error("Could not delete entry: {0}")]
    Delete(#[source] StoreError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    #[error("Import failed: {0}")]
    Import(#[from] ImportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CatalogError {
    /// The text shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(ValidationError::Missing(field)) => {
                format!("Please fill in the {} field.", field)
            }
            Self::Validation(ValidationError::Invalid { field, reason }) => {
                format!("Invalid {}: {}.", field, reason)
            }
            Self::Image(ImageError::TooLarge { max, .. }) => {
                format!("Image is too large (maximum {}).", format_size(*max))
            }
            Self::Image(ImageError::NotAnImage(_)) => "The selected file is not an image.".into(),
            Self::Image(ImageError::Empty) => "The selected image is empty.".into(),
            Self::Open(_) | Self::Load(_) | Self::Io(_) => "Failed to load the collection.".into(),
            Self::Save(StoreError::NotFound(_)) => {
                "This entry no longer exists and could not be updated.".into()
            }
            Self::Save(_) => "Failed to save the collection.".into(),
            Self::Delete(_) => "Failed to delete the collection.".into(),
            Self::Export(_) => "Failed to export data.".into(),
            Self::Import(ImportError::Format(_) | ImportError::Record { .. }) => {
                "Import failed. Make sure the file is a valid collection JSON array.".into()
            }
            Self::Import(ImportError::Store(_)) => {
                "Import failed. The existing collection was left unchanged.".into()
            }
        }
    }

    /// This failure as an error notice.
    pub fn notice(&self) -> Notice {
        Notice::error(self.user_message())
    }
}

/// Render a byte count for messages: `2 MB`, `1.5 MB`, `512 KB`, `900 bytes`.
fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;

    let (unit, name) = match bytes {
        b if b >= MB => (MB, "MB"),
        b if b >= KB => (KB, "KB"),
        _ => return format!("{} bytes", bytes),
    };
    if bytes % unit == 0 {
        format!("{} {}", bytes / unit, name)
    } else {
        format!("{:.1} {}", bytes as f64 / unit as f64, name)
    }
}
