//! Search and platform filtering over a catalog listing.

use crate::platform::Platform;
use crate::types::CollectionItem;

/// Criteria for the visible subset of the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    /// Case-insensitive substring; empty matches everything.
    pub search: String,
    /// `None` means every platform.
    pub platform: Option<Platform>,
}

impl ItemFilter {
    pub fn new(search: impl Into<String>, platform: Option<Platform>) -> Self {
        Self {
            search: search.into(),
            platform,
        }
    }

    pub fn matches(&self, item: &CollectionItem) -> bool {
        if self.platform.is_some_and(|platform| item.platform() != platform) {
            return false;
        }
        matches_search(item, &self.search.to_lowercase())
    }

    /// Items passing the filter, in input order.
    pub fn apply(&self, items: &[CollectionItem]) -> Vec<CollectionItem> {
        items
            .iter()
            .filter(|item| self.matches(item))
            .cloned()
            .collect()
    }
}

/// Filter `items` by search term and platform, preserving their order.
pub fn filter_items(
    items: &[CollectionItem],
    search: &str,
    platform: Option<Platform>,
) -> Vec<CollectionItem> {
    ItemFilter::new(search, platform).apply(items)
}

/// `needle` must already be lowercase.
fn matches_search(item: &CollectionItem, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let hit = |text: &str| text.to_lowercase().contains(needle);

    hit(&item.prompt)
        || item.tags.iter().any(|tag| hit(tag))
        || hit(&item.model)
        || hit(&item.negative_prompt)
        || hit(&item.notes)
}
