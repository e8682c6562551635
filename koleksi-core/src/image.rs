//! Turning an uploaded image file into the data URI stored on an entry.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

/// Largest image accepted by default (2 MiB).
pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    #[error("image file is empty")]
    Empty,
    #[error("image is {size} bytes, larger than the {max} byte limit")]
    TooLarge { size: usize, max: usize },
    #[error("'{0}' is not an image type")]
    NotAnImage(String),
}

/// An accepted image, encoded as a self-contained data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    mime: String,
    data_uri: String,
}

impl ImagePayload {
    /// Check and encode raw file bytes.
    pub fn from_bytes(mime: &str, bytes: &[u8], max_bytes: usize) -> Result<Self, ImageError> {
        let mime = mime.trim().to_lowercase();
        if !mime.starts_with("image/") {
            return Err(ImageError::NotAnImage(mime));
        }
        if bytes.is_empty() {
            return Err(ImageError::Empty);
        }
        if bytes.len() > max_bytes {
            return Err(ImageError::TooLarge {
                size: bytes.len(),
                max: max_bytes,
            });
        }

        let data_uri = format!("data:{};base64,{}", mime, STANDARD.encode(bytes));
        Ok(Self { mime, data_uri })
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }

    pub fn into_data_uri(self) -> String {
        self.data_uri
    }
}
