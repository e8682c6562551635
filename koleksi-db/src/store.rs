//! The catalog store: the single owner of persisted entries.
//!
//! [`CatalogStore`] is the seam the rest of the application talks to.
//! [`SqliteStore`] is the real implementation; `MemoryStore` in
//! [`crate::memory`] stands in for it in tests.

use std::path::Path;
use std::sync::Arc;

use koleksi_core::{CollectionItem, ItemId};
use rusqlite::Connection;
use tokio::sync::Mutex;

use crate::operations::{self, StoreError};
use crate::queries;
use crate::schema::{self, SchemaError};

/// Keyed storage of catalog entries.
///
/// Every operation may suspend while storage completes. Operations awaited
/// one after another by the same caller take effect in that order.
#[allow(async_fn_in_trait)]
pub trait CatalogStore {
    /// All entries in store order.
    async fn list(&self) -> Result<Vec<CollectionItem>, StoreError>;

    /// Insert a new entry and return its assigned id.
    async fn add(&self, item: &CollectionItem) -> Result<ItemId, StoreError>;

    /// Replace the body of entry `id`, keeping the id.
    async fn update(&self, id: ItemId, item: &CollectionItem) -> Result<(), StoreError>;

    async fn delete(&self, id: ItemId) -> Result<(), StoreError>;

    /// Remove every entry.
    async fn clear(&self) -> Result<(), StoreError>;

    /// Insert every entry, keeping ids that are present. All-or-nothing.
    async fn bulk_add(&self, items: &[CollectionItem]) -> Result<(), StoreError>;

    /// Clear then bulk add as one atomic step. Readers never observe the
    /// empty intermediate state, and on failure the old entries remain.
    async fn replace_all(&self, items: &[CollectionItem]) -> Result<(), StoreError>;
}

/// SQLite-backed store. Cloning shares the same connection.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open or create the catalog database at `path`.
    pub fn open(path: &Path) -> Result<Self, SchemaError> {
        Ok(Self::from_connection(schema::open_database(path)?))
    }

    pub fn open_memory() -> Result<Self, SchemaError> {
        Ok(Self::from_connection(schema::open_memory()?))
    }

    /// Wrap a connection that already has the catalog schema.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }
}

impl CatalogStore for SqliteStore {
    async fn list(&self) -> Result<Vec<CollectionItem>, StoreError> {
        let conn = self.conn.lock().await;
        queries::list_items(&conn)
    }

    async fn add(&self, item: &CollectionItem) -> Result<ItemId, StoreError> {
        let conn = self.conn.lock().await;
        operations::insert_item(&conn, item)
    }

    async fn update(&self, id: ItemId, item: &CollectionItem) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        operations::update_item(&conn, id, item)
    }

    async fn delete(&self, id: ItemId) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        operations::delete_item(&conn, id)
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        operations::clear_items(&conn)
    }

    async fn bulk_add(&self, items: &[CollectionItem]) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        operations::bulk_insert_items(&conn, items)
    }

    async fn replace_all(&self, items: &[CollectionItem]) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        operations::replace_items(&conn, items)
    }
}
