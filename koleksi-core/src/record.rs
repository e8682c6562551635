//! Flat wire shape of a catalog entry, as written to export files.
//!
//! Deserialization is lenient: missing or `null` optional fields take their
//! defaults, numbers may arrive as numeric strings, and tags may arrive as a
//! comma-separated string. Conversion into a [`CollectionItem`] is where the
//! required fields and the platform are checked.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::lora::{self, LORA_SLOTS, LoraEntry};
use crate::platform::{Platform, PlatformParseError};
use crate::tags::TagsInput;
use crate::types::{CollectionItem, Generation, ItemId, TensorSettings};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),
    #[error(transparent)]
    UnknownPlatform(#[from] PlatformParseError),
    #[error("{count} LoRA entries given, at most {max} allowed")]
    TooManyLora { count: usize, max: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub platform: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub prompt: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub negative_prompt: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub model: String,
    #[serde(default, deserialize_with = "tag_list")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vae: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sampler: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduler: Option<String>,
    #[serde(
        default,
        deserialize_with = "loose_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub cfg: Option<f64>,
    #[serde(
        default,
        deserialize_with = "loose_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub steps: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upscaler: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adetailer: Option<bool>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub lora: Vec<String>,
}

impl From<CollectionItem> for CollectionRecord {
    fn from(item: CollectionItem) -> Self {
        let platform = item.platform().key().to_string();
        let mut record = Self {
            id: item.id,
            image: item.image,
            platform,
            prompt: item.prompt,
            negative_prompt: item.negative_prompt,
            model: item.model,
            tags: item.tags,
            notes: item.notes,
            ..Self::default()
        };

        if let Generation::Tensor(settings) = item.generation {
            record.vae = Some(settings.vae);
            record.sampler = Some(settings.sampler);
            record.scheduler = Some(settings.scheduler);
            record.cfg = Some(settings.cfg);
            record.steps = Some(settings.steps);
            record.seed = Some(settings.seed);
            record.upscaler = Some(settings.upscaler);
            record.adetailer = Some(settings.adetailer);
            record.lora = settings.lora.iter().map(LoraEntry::to_string).collect();
        }

        record
    }
}

impl TryFrom<CollectionRecord> for CollectionItem {
    type Error = RecordError;

    fn try_from(record: CollectionRecord) -> Result<Self, Self::Error> {
        for (field, value) in [
            ("image", &record.image),
            ("platform", &record.platform),
            ("prompt", &record.prompt),
            ("model", &record.model),
        ] {
            if value.trim().is_empty() {
                return Err(RecordError::MissingField(field));
            }
        }

        let platform: Platform = record.platform.parse()?;
        let generation = if platform == Platform::Tensor {
            let defaults = TensorSettings::default();
            let lora = lora::normalize_slots(&record.lora);
            if lora.len() > LORA_SLOTS {
                return Err(RecordError::TooManyLora {
                    count: lora.len(),
                    max: LORA_SLOTS,
                });
            }
            if lora.len() < record.lora.len() {
                log::warn!(
                    "Dropped {} invalid LoRA entries from record {:?}",
                    record.lora.len() - lora.len(),
                    record.id
                );
            }
            Generation::Tensor(TensorSettings {
                vae: record.vae.unwrap_or(defaults.vae),
                sampler: record.sampler.unwrap_or(defaults.sampler),
                scheduler: record.scheduler.unwrap_or(defaults.scheduler),
                cfg: record.cfg.unwrap_or(defaults.cfg),
                steps: record.steps.unwrap_or(defaults.steps),
                seed: record.seed.unwrap_or(defaults.seed),
                upscaler: record.upscaler.unwrap_or(defaults.upscaler),
                adetailer: record.adetailer.unwrap_or(defaults.adetailer),
                lora,
            })
        } else {
            Generation::for_platform(platform, TensorSettings::default())
        };

        Ok(CollectionItem {
            id: record.id,
            image: record.image,
            prompt: record.prompt,
            negative_prompt: record.negative_prompt,
            model: record.model,
            tags: record.tags,
            notes: record.notes,
            generation,
        })
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn tag_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let input: Option<TagsInput> = Option::deserialize(deserializer)?;
    Ok(input.map(|tags| tags.normalize()).unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Number(f64),
    Text(String),
}

/// Accept `7`, `7.5`, `"7.5"` or `null`. Blank, unparseable or non-finite
/// values read as absent.
fn loose_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromF64,
{
    Ok(match Option::<LooseNumber>::deserialize(deserializer)? {
        Some(LooseNumber::Number(value)) => T::from_f64(value),
        Some(LooseNumber::Text(text)) => text
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(T::from_f64),
        None => None,
    })
}

trait FromF64: Sized {
    fn from_f64(value: f64) -> Option<Self>;
}

impl FromF64 for f64 {
    fn from_f64(value: f64) -> Option<Self> {
        value.is_finite().then_some(value)
    }
}

impl FromF64 for u32 {
    fn from_f64(value: f64) -> Option<Self> {
        (value.fract() == 0.0 && value >= 0.0 && value <= u32::MAX as f64).then_some(value as u32)
    }
}

#[cfg(test)]
#[path = "tests/record_tests.rs"]
mod tests;
