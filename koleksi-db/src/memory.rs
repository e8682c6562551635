//! In-memory [`CatalogStore`] with the same contract as the SQLite store.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use koleksi_core::{CollectionItem, ItemId};

use crate::operations::{StoreError, check_item};
use crate::store::CatalogStore;

#[derive(Debug, Default)]
struct MemoryState {
    /// Kept sorted by id, matching the SQLite listing order.
    items: Vec<CollectionItem>,
    /// Highest id ever handed out or stored; ids are never reused.
    last_id: ItemId,
}

impl MemoryState {
    fn position(&self, id: ItemId) -> Result<usize, usize> {
        self.items.binary_search_by_key(&Some(id), |item| item.id)
    }

    /// Validate a batch against `existing` ids and assign the missing ones.
    fn prepare_batch(
        &self,
        items: &[CollectionItem],
        existing: &HashSet<ItemId>,
    ) -> Result<(Vec<CollectionItem>, ItemId), StoreError> {
        let mut seen = existing.clone();
        let mut last_id = self.last_id;
        let mut prepared = Vec::with_capacity(items.len());

        for (index, item) in items.iter().enumerate() {
            check_item(item).map_err(|e| StoreError::BulkInsert {
                index,
                reason: e.to_string(),
            })?;
            let id = match item.id {
                Some(id) => id,
                None => last_id + 1,
            };
            if !seen.insert(id) {
                return Err(StoreError::BulkInsert {
                    index,
                    reason: format!("duplicate id {}", id),
                });
            }
            last_id = last_id.max(id);
            prepared.push(item.clone().with_id(id));
        }
        Ok((prepared, last_id))
    }
}

/// A store that keeps entries in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-filled with `items` (ids kept where present).
    pub fn with_items(items: &[CollectionItem]) -> Result<Self, StoreError> {
        let store = Self::new();
        {
            let mut state = store.lock();
            let (items, last_id) = state.prepare_batch(items, &HashSet::new())?;
            state.items = items;
            state.items.sort_by_key(|item| item.id);
            state.last_id = last_id;
        }
        Ok(store)
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CatalogStore for MemoryStore {
    async fn list(&self) -> Result<Vec<CollectionItem>, StoreError> {
        Ok(self.lock().items.clone())
    }

    async fn add(&self, item: &CollectionItem) -> Result<ItemId, StoreError> {
        check_item(item)?;
        let mut state = self.lock();
        let id = state.last_id + 1;
        state.last_id = id;
        // New ids are larger than every stored id, so push keeps the order
        state.items.push(item.clone().with_id(id));
        Ok(id)
    }

    async fn update(&self, id: ItemId, item: &CollectionItem) -> Result<(), StoreError> {
        check_item(item)?;
        let mut state = self.lock();
        let index = state.position(id).map_err(|_| StoreError::NotFound(id))?;
        state.items[index] = item.clone().with_id(id);
        Ok(())
    }

    async fn delete(&self, id: ItemId) -> Result<(), StoreError> {
        let mut state = self.lock();
        let index = state.position(id).map_err(|_| StoreError::NotFound(id))?;
        state.items.remove(index);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.lock().items.clear();
        Ok(())
    }

    async fn bulk_add(&self, items: &[CollectionItem]) -> Result<(), StoreError> {
        let mut state = self.lock();
        let existing: HashSet<ItemId> = state.items.iter().filter_map(|item| item.id).collect();
        let (prepared, last_id) = state.prepare_batch(items, &existing)?;
        state.items.extend(prepared);
        state.items.sort_by_key(|item| item.id);
        state.last_id = last_id;
        Ok(())
    }

    async fn replace_all(&self, items: &[CollectionItem]) -> Result<(), StoreError> {
        let mut state = self.lock();
        let (mut prepared, last_id) = state.prepare_batch(items, &HashSet::new())?;
        prepared.sort_by_key(|item| item.id);
        state.items = prepared;
        state.last_id = last_id;
        Ok(())
    }
}
