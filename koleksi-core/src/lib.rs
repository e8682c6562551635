//! Image catalog data model, form mapping, and search filtering.
//!
//! This crate defines the catalog entry types without any database
//! dependencies. Consumers use these types for display, for editing through
//! [`ItemForm`], and pass them to `koleksi-db` for persistence.

pub mod filter;
pub mod form;
pub mod image;
pub mod lora;
pub mod platform;
pub mod record;
pub mod summary;
pub mod tags;
pub mod types;

pub use filter::{ItemFilter, filter_items};
pub use form::{CUSTOM_MODEL, ItemForm, ModelChoice, ValidationError};
pub use image::{ImageError, ImagePayload, MAX_IMAGE_BYTES};
pub use lora::{LORA_SLOTS, LoraEntry};
pub use platform::{ModelGroup, Platform, PlatformParseError};
pub use record::{CollectionRecord, RecordError};
pub use summary::summary_text;
pub use tags::TagsInput;
pub use types::*;
