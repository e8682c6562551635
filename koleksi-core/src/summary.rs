//! Plain-text summary of an entry, for copying its generation data.

use std::fmt::Write;

use crate::lora::LoraEntry;
use crate::types::CollectionItem;

/// One `Label: value` line per populated field.
pub fn summary_text(item: &CollectionItem) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "Prompt: {}", item.prompt);
    if !item.negative_prompt.is_empty() {
        let _ = writeln!(out, "Negative Prompt: {}", item.negative_prompt);
    }
    let _ = writeln!(out, "Platform: {}", item.platform().key());
    let _ = writeln!(out, "Model: {}", item.model);
    if !item.tags.is_empty() {
        let _ = writeln!(out, "Tags: {}", item.tags.join(", "));
    }

    if let Some(settings) = item.generation.tensor() {
        let _ = writeln!(out, "Steps: {}", settings.steps);
        if settings.cfg != 0.0 {
            let _ = writeln!(out, "CFG: {}", settings.cfg);
        }
        if !settings.sampler.is_empty() {
            let _ = writeln!(out, "Sampler: {}", settings.sampler);
        }
        if !settings.scheduler.is_empty() {
            let _ = writeln!(out, "Scheduler: {}", settings.scheduler);
        }
        if !settings.seed.is_empty() {
            let _ = writeln!(out, "Seed: {}", settings.seed);
        }
        if !settings.lora.is_empty() {
            let lora: Vec<String> = settings.lora.iter().map(LoraEntry::to_string).collect();
            let _ = writeln!(out, "LoRA: {}", lora.join(", "));
        }
        if settings.upscaler {
            let _ = writeln!(out, "Upscaler: Yes");
        }
        if settings.adetailer {
            let _ = writeln!(out, "ADetailer: Yes");
        }
    }

    if !item.notes.is_empty() {
        let _ = writeln!(out, "Notes: {}", item.notes);
    }
    out
}
