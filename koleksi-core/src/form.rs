//! Editable form state and its mapping to and from [`CollectionItem`].
//!
//! The form holds loosely typed input: numbers as the text the user typed,
//! tags as one comma-separated string or a list, and LoRA adapters as six
//! `name:strength` slots. [`ItemForm::submit`] validates and normalizes it into
//! a record; [`ItemForm::from_item`] reverses that for editing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::lora::{self, LORA_SLOTS};
use crate::platform::{Platform, TENSOR_SAMPLERS, TENSOR_SCHEDULERS};
use crate::tags::TagsInput;
use crate::types::{CollectionItem, Generation, TensorSettings};

/// Model picker value that switches the form into custom-model mode.
pub const CUSTOM_MODEL: &str = "custom";

const CFG_RANGE: std::ops::RangeInclusive<f64> = 0.0..=20.0;
const STEPS_RANGE: std::ops::RangeInclusive<u32> = 1..=150;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required field '{0}'")]
    Missing(&'static str),
    #[error("invalid value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ValidationError {
    /// Name of the offending form field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Missing(field) => field,
            Self::Invalid { field, .. } => field,
        }
    }

    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Where the model name comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "lowercase")]
pub enum ModelChoice {
    /// A model picked from the platform's list.
    Listed(String),
    /// Free text typed by the user.
    Custom(String),
}

impl ModelChoice {
    /// The model name that would be stored, trimmed.
    pub fn resolved(&self) -> &str {
        match self {
            Self::Listed(model) | Self::Custom(model) => model.trim(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemForm {
    pub image: String,
    pub platform: Platform,
    pub prompt: String,
    pub negative_prompt: String,
    pub model: ModelChoice,
    pub tags: TagsInput,
    pub notes: String,
    pub vae: String,
    pub sampler: String,
    pub scheduler: String,
    pub cfg: String,
    pub steps: String,
    pub seed: String,
    pub upscaler: bool,
    pub adetailer: bool,
    pub lora: [String; LORA_SLOTS],
}

impl Default for ItemForm {
    fn default() -> Self {
        let platform = Platform::Gemini;
        let settings = TensorSettings::default();
        Self {
            image: String::new(),
            platform,
            prompt: String::new(),
            negative_prompt: String::new(),
            model: ModelChoice::Listed(platform.default_model().to_string()),
            tags: TagsInput::default(),
            notes: String::new(),
            vae: settings.vae,
            sampler: settings.sampler,
            scheduler: settings.scheduler,
            cfg: settings.cfg.to_string(),
            steps: settings.steps.to_string(),
            seed: settings.seed,
            upscaler: settings.upscaler,
            adetailer: settings.adetailer,
            lora: Default::default(),
        }
    }
}

impl ItemForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a stored entry for editing.
    ///
    /// LoRA adapters are padded out to six slots. A Tensor entry whose model
    /// is not in the Tensor list is loaded in custom-model mode so that
    /// submitting again keeps the free-text model.
    pub fn from_item(item: &CollectionItem) -> Self {
        let platform = item.platform();
        let model = if platform == Platform::Tensor && !platform.is_known_model(&item.model) {
            ModelChoice::Custom(item.model.clone())
        } else {
            ModelChoice::Listed(item.model.clone())
        };

        let mut form = Self {
            image: item.image.clone(),
            platform,
            prompt: item.prompt.clone(),
            negative_prompt: item.negative_prompt.clone(),
            model,
            tags: TagsInput::List(item.tags.clone()),
            notes: item.notes.clone(),
            ..Self::default()
        };

        if let Some(settings) = item.generation.tensor() {
            form.vae = settings.vae.clone();
            form.sampler = settings.sampler.clone();
            form.scheduler = settings.scheduler.clone();
            form.cfg = settings.cfg.to_string();
            form.steps = settings.steps.to_string();
            form.seed = settings.seed.clone();
            form.upscaler = settings.upscaler;
            form.adetailer = settings.adetailer;
            form.lora = lora::to_slots(&settings.lora);
        }

        form
    }

    /// Switch platform, resetting the model to that platform's default.
    pub fn select_platform(&mut self, platform: Platform) {
        self.platform = platform;
        self.model = ModelChoice::Listed(platform.default_model().to_string());
    }

    /// Apply a model picker value. [`CUSTOM_MODEL`] enters custom-model mode.
    pub fn select_model(&mut self, value: &str) {
        self.model = if value == CUSTOM_MODEL {
            ModelChoice::Custom(String::new())
        } else {
            ModelChoice::Listed(value.to_string())
        };
    }

    pub fn use_custom_model(&mut self, text: impl Into<String>) {
        self.model = ModelChoice::Custom(text.into());
    }

    pub fn is_custom_model(&self) -> bool {
        matches!(self.model, ModelChoice::Custom(_))
    }

    /// Replace the name half of LoRA slot `index`. Out-of-range indices are ignored.
    pub fn set_lora_name(&mut self, index: usize, name: &str) {
        if let Some(slot) = self.lora.get_mut(index) {
            let (_, strength) = lora::split_slot(slot);
            *slot = format!("{}:{}", name, strength);
        }
    }

    /// Replace the strength half of LoRA slot `index`. Out-of-range indices are ignored.
    pub fn set_lora_strength(&mut self, index: usize, strength: &str) {
        if let Some(slot) = self.lora.get_mut(index) {
            let (name, _) = lora::split_slot(slot);
            *slot = format!("{}:{}", name, strength);
        }
    }

    /// Validate and normalize the form into a new, unsaved record.
    ///
    /// The form itself is left untouched, so a failed submit keeps the
    /// user's input.
    pub fn submit(&self) -> Result<CollectionItem, ValidationError> {
        if self.image.trim().is_empty() {
            return Err(ValidationError::Missing("image"));
        }
        let model = self.model.resolved();
        if model.is_empty() {
            return Err(ValidationError::Missing("model"));
        }
        if self.prompt.trim().is_empty() {
            return Err(ValidationError::Missing("prompt"));
        }

        let generation = if self.platform == Platform::Tensor {
            Generation::Tensor(self.tensor_settings()?)
        } else {
            Generation::for_platform(self.platform, TensorSettings::default())
        };

        Ok(CollectionItem {
            id: None,
            image: self.image.clone(),
            prompt: self.prompt.clone(),
            negative_prompt: self.negative_prompt.clone(),
            model: model.to_string(),
            tags: self.tags.normalize(),
            notes: self.notes.clone(),
            generation,
        })
    }

    fn tensor_settings(&self) -> Result<TensorSettings, ValidationError> {
        let sampler = self.sampler.trim();
        if !TENSOR_SAMPLERS.contains(&sampler) {
            return Err(ValidationError::invalid(
                "sampler",
                format!("unknown sampler '{}'", sampler),
            ));
        }
        let scheduler = self.scheduler.trim();
        if !TENSOR_SCHEDULERS.contains(&scheduler) {
            return Err(ValidationError::invalid(
                "scheduler",
                format!("unknown scheduler '{}'", scheduler),
            ));
        }

        let cfg: f64 = self
            .cfg
            .trim()
            .parse()
            .map_err(|_| ValidationError::invalid("cfg", format!("'{}' is not a number", self.cfg)))?;
        if !CFG_RANGE.contains(&cfg) {
            return Err(ValidationError::invalid("cfg", "must be between 0 and 20"));
        }

        let steps: u32 = self.steps.trim().parse().map_err(|_| {
            ValidationError::invalid("steps", format!("'{}' is not a whole number", self.steps))
        })?;
        if !STEPS_RANGE.contains(&steps) {
            return Err(ValidationError::invalid("steps", "must be between 1 and 150"));
        }

        let seed = self.seed.trim();
        if !seed.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::invalid(
                "seed",
                "must be empty (random) or digits only",
            ));
        }

        let lora = lora::normalize_slots(&self.lora);
        let filled = self.lora.iter().filter(|slot| !slot.trim().is_empty()).count();
        if lora.len() < filled {
            log::warn!(
                "Dropped {} LoRA slot(s) with a blank name or out-of-range strength",
                filled - lora.len()
            );
        }

        Ok(TensorSettings {
            vae: self.vae.trim().to_string(),
            sampler: sampler.to_string(),
            scheduler: scheduler.to_string(),
            cfg,
            steps,
            seed: seed.to_string(),
            upscaler: self.upscaler,
            adetailer: self.adetailer,
            lora,
        })
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
