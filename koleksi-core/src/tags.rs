//! Tag list normalization.

use serde::{Deserialize, Serialize};

/// Tags as they arrive from an input: either one comma-separated string or an
/// already split list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagsInput {
    Text(String),
    List(Vec<String>),
}

impl Default for TagsInput {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl TagsInput {
    /// Trimmed, non-empty tags in entry order. Duplicates are kept.
    pub fn normalize(&self) -> Vec<String> {
        match self {
            Self::Text(text) => normalize_tags(text.split(',')),
            Self::List(list) => normalize_tags(list.iter().map(String::as_str)),
        }
    }
}

/// Trim every tag and drop the ones left empty.
pub fn normalize_tags<'a>(tags: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    tags.into_iter()
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}
