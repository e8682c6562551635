//! SQLite persistence layer for the image catalog.
//!
//! Provides schema creation, CRUD and bulk operations, read queries, and the
//! [`CatalogStore`] trait with SQLite-backed and in-memory implementations.

pub mod memory;
pub mod operations;
pub mod queries;
pub mod schema;
pub mod store;

pub use memory::MemoryStore;
pub use operations::{
    StoreError, bulk_insert_items, clear_items, delete_item, insert_item, insert_rows,
    replace_items, update_item,
};
pub use queries::{count_items, get_item, ids_for_platform, ids_with_tag, list_items};
pub use schema::{SchemaError, open_database, open_memory};
pub use store::{CatalogStore, SqliteStore};
