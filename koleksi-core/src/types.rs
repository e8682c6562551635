//! Data model types for the image catalog.
//!
//! A [`CollectionItem`] is one saved image with its generation metadata. The
//! platform-specific part lives in [`Generation`], so entries from platforms
//! without sampler settings simply have no such fields.

use serde::{Deserialize, Serialize};

use crate::lora::{LORA_SLOTS, LoraEntry};
use crate::platform::Platform;
use crate::record::{CollectionRecord, RecordError};

/// Primary key assigned by the store on first save.
pub type ItemId = i64;

// ── Tensor settings ─────────────────────────────────────────────────────────

/// Sampler settings recorded for Tensor generations.
#[derive(Debug, Clone, PartialEq)]
pub struct TensorSettings {
    pub vae: String,
    pub sampler: String,
    pub scheduler: String,
    /// Guidance scale, 0–20.
    pub cfg: f64,
    /// Sampling steps, 1–150.
    pub steps: u32,
    /// Empty means a random seed; otherwise decimal digits.
    pub seed: String,
    pub upscaler: bool,
    pub adetailer: bool,
    pub lora: Vec<LoraEntry>,
}

impl TensorSettings {
    pub const DEFAULT_SAMPLER: &'static str = "dpmpp_2m";
    pub const DEFAULT_SCHEDULER: &'static str = "normal";
    pub const DEFAULT_CFG: f64 = 3.5;
    pub const DEFAULT_STEPS: u32 = 30;
}

impl Default for TensorSettings {
    fn default() -> Self {
        Self {
            vae: String::new(),
            sampler: Self::DEFAULT_SAMPLER.to_string(),
            scheduler: Self::DEFAULT_SCHEDULER.to_string(),
            cfg: Self::DEFAULT_CFG,
            steps: Self::DEFAULT_STEPS,
            seed: String::new(),
            upscaler: false,
            adetailer: true,
            lora: Vec::new(),
        }
    }
}

// ── Generation ──────────────────────────────────────────────────────────────

/// Platform of an entry together with the fields only that platform records.
#[derive(Debug, Clone, PartialEq)]
pub enum Generation {
    Tensor(TensorSettings),
    Midjourney,
    Gemini,
    Piclumen,
    Leonardo,
}

impl Generation {
    /// Build the variant for `platform`. `settings` is only kept for Tensor.
    pub fn for_platform(platform: Platform, settings: TensorSettings) -> Self {
        match platform {
            Platform::Tensor => Self::Tensor(settings),
            Platform::Midjourney => Self::Midjourney,
            Platform::Gemini => Self::Gemini,
            Platform::Piclumen => Self::Piclumen,
            Platform::Leonardo => Self::Leonardo,
        }
    }

    pub fn platform(&self) -> Platform {
        match self {
            Self::Tensor(_) => Platform::Tensor,
            Self::Midjourney => Platform::Midjourney,
            Self::Gemini => Platform::Gemini,
            Self::Piclumen => Platform::Piclumen,
            Self::Leonardo => Platform::Leonardo,
        }
    }

    pub fn tensor(&self) -> Option<&TensorSettings> {
        match self {
            Self::Tensor(settings) => Some(settings),
            _ => None,
        }
    }
}

// ── Collection item ─────────────────────────────────────────────────────────

/// One catalog entry.
///
/// Serializes to the flat export shape (camelCase field names, `platform` as
/// its key, Tensor-only fields present only for Tensor entries).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "CollectionRecord", try_from = "CollectionRecord")]
pub struct CollectionItem {
    /// `None` until the store assigns one.
    pub id: Option<ItemId>,
    /// Self-contained image payload (data URI).
    pub image: String,
    pub prompt: String,
    pub negative_prompt: String,
    pub model: String,
    pub tags: Vec<String>,
    pub notes: String,
    pub generation: Generation,
}

impl CollectionItem {
    pub fn platform(&self) -> Platform {
        self.generation.platform()
    }

    /// Adapters used for this image. Always empty for non-Tensor entries.
    pub fn lora(&self) -> &[LoraEntry] {
        self.generation
            .tensor()
            .map(|settings| settings.lora.as_slice())
            .unwrap_or(&[])
    }

    /// First required field that is blank, if any.
    pub fn missing_required_field(&self) -> Option<&'static str> {
        [
            ("image", &self.image),
            ("prompt", &self.prompt),
            ("model", &self.model),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
    }

    /// Check the invariants every stored entry satisfies: required fields
    /// are filled and at most [`LORA_SLOTS`] adapters are attached.
    pub fn validate(&self) -> Result<(), RecordError> {
        if let Some(field) = self.missing_required_field() {
            return Err(RecordError::MissingField(field));
        }
        let count = self.lora().len();
        if count > LORA_SLOTS {
            return Err(RecordError::TooManyLora {
                count,
                max: LORA_SLOTS,
            });
        }
        Ok(())
    }

    pub fn with_id(mut self, id: ItemId) -> Self {
        self.id = Some(id);
        self
    }
}
