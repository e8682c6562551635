//! LoRA adapter references and their `name:strength` text encoding.
//!
//! Forms and export files carry each adapter as a single composite string.
//! [`LoraEntry::parse_slot`] and the `Display` impl are the only places that
//! split or join that string.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Number of LoRA slots an editable form exposes.
pub const LORA_SLOTS: usize = 6;

/// Strength substituted when a slot names an adapter but its strength is not
/// a number.
pub const DEFAULT_STRENGTH: f64 = 0.8;

/// Largest accepted adapter strength.
pub const MAX_STRENGTH: f64 = 2.0;

/// A named fine-tuning adapter with its weight. Strength lies in `(0, 2]`.
#[derive(Debug, Clone, PartialEq)]
pub struct LoraEntry {
    name: String,
    strength: f64,
}

impl LoraEntry {
    /// Build an entry, rejecting empty names, names containing `:` and
    /// strengths outside `(0, 2]`.
    pub fn new(name: impl Into<String>, strength: f64) -> Option<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() || name.contains(':') {
            return None;
        }
        if !strength.is_finite() || strength <= 0.0 || strength > MAX_STRENGTH {
            return None;
        }
        Some(Self { name, strength })
    }

    /// Decode one `name:strength` slot.
    ///
    /// The slot is split on the first `:`. Returns `None` (the slot is
    /// dropped) when the name is blank, the strength is missing, or the
    /// strength parses to a value outside `(0, 2]`. A strength that is
    /// present but not a number falls back to [`DEFAULT_STRENGTH`].
    pub fn parse_slot(raw: &str) -> Option<Self> {
        let (name, strength) = raw.split_once(':').unwrap_or((raw, ""));
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let strength = strength.trim();
        if strength.is_empty() {
            return None;
        }

        match strength.parse::<f64>() {
            Ok(value) if value.is_finite() => Self::new(name, value),
            _ => {
                log::debug!(
                    "LoRA '{}' has non-numeric strength '{}', using {}",
                    name,
                    strength,
                    DEFAULT_STRENGTH
                );
                Self::new(name, DEFAULT_STRENGTH)
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }
}

impl fmt::Display for LoraEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.strength)
    }
}

/// Split a raw slot into its name and strength halves, for editing one half
/// at a time. An untouched slot reads as `("", "0.0")`.
pub fn split_slot(raw: &str) -> (&str, &str) {
    if raw.is_empty() {
        return ("", "0.0");
    }
    raw.split_once(':').unwrap_or((raw, ""))
}

/// Normalize form slots into the stored adapter list, dropping invalid slots.
pub fn normalize_slots<S: AsRef<str>>(slots: &[S]) -> Vec<LoraEntry> {
    slots
        .iter()
        .filter_map(|slot| LoraEntry::parse_slot(slot.as_ref()))
        .collect()
}

/// Expand a stored adapter list into exactly [`LORA_SLOTS`] editable slots,
/// padding with empty strings.
pub fn to_slots(entries: &[LoraEntry]) -> [String; LORA_SLOTS] {
    let mut slots: [String; LORA_SLOTS] = Default::default();
    for (slot, entry) in slots.iter_mut().zip(entries) {
        *slot = entry.to_string();
    }
    slots
}

impl Serialize for LoraEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LoraEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse_slot(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid LoRA entry '{}'", raw)))
    }
}
