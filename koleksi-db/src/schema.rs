//! SQLite schema creation and version tracking.

use rusqlite::Connection;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Database was created by a newer version: expected schema {expected}, found {found}")]
    VersionMismatch { expected: i32, found: i32 },
}

/// Current schema version. Increment when adding migrations.
pub const CURRENT_VERSION: i32 = 1;

/// Create all tables and indexes if they don't exist.
///
/// Idempotent: existing tables and indexes are left alone.
pub fn create_schema(conn: &Connection) -> Result<(), SchemaError> {
    conn.execute_batch(SCHEMA_SQL)?;
    set_schema_version(conn, CURRENT_VERSION)?;
    Ok(())
}

/// Open or create a catalog database at the given path.
///
/// WAL mode lets readers on other connections keep seeing the last committed
/// catalog while an import transaction is in progress.
pub fn open_database(path: &std::path::Path) -> Result<Connection, SchemaError> {
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;

    let version = get_schema_version(&conn)?;
    if version == 0 {
        create_schema(&conn)?;
        log::info!("Created catalog database at {}", path.display());
    } else if version > CURRENT_VERSION {
        return Err(SchemaError::VersionMismatch {
            expected: CURRENT_VERSION,
            found: version,
        });
    }

    Ok(conn)
}

/// Open an in-memory database with the full schema. Useful for testing.
pub fn open_memory() -> Result<Connection, SchemaError> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    create_schema(&conn)?;
    Ok(conn)
}

/// Get the current schema version, or 0 if no schema exists.
pub fn get_schema_version(conn: &Connection) -> Result<i32, SchemaError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| row.get(0),
    )?;

    if !exists {
        return Ok(0);
    }

    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<(), SchemaError> {
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

const SCHEMA_SQL: &str = r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Catalog entries. AUTOINCREMENT keeps ids from being reused after deletes.
CREATE TABLE IF NOT EXISTS collections (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    image TEXT NOT NULL CHECK (trim(image) <> ''),
    platform TEXT NOT NULL
        CHECK (platform IN ('tensor', 'midjourney', 'gemini', 'piclumen', 'leonardo')),
    prompt TEXT NOT NULL CHECK (trim(prompt) <> ''),
    negative_prompt TEXT NOT NULL DEFAULT '',
    model TEXT NOT NULL CHECK (trim(model) <> ''),
    notes TEXT NOT NULL DEFAULT '',
    -- Tensor-only settings, NULL for every other platform
    vae TEXT,
    sampler TEXT,
    scheduler TEXT,
    cfg REAL,
    steps INTEGER,
    seed TEXT,
    upscaler BOOLEAN,
    adetailer BOOLEAN,
    -- JSON array of "name:strength" strings
    lora TEXT NOT NULL DEFAULT '[]'
);
CREATE INDEX IF NOT EXISTS idx_collections_platform ON collections(platform);
CREATE INDEX IF NOT EXISTS idx_collections_prompt ON collections(prompt);

-- One row per tag, in entry order
CREATE TABLE IF NOT EXISTS collection_tags (
    collection_id INTEGER NOT NULL REFERENCES collections(id) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    tag TEXT NOT NULL,
    PRIMARY KEY (collection_id, position)
);
CREATE INDEX IF NOT EXISTS idx_collection_tags_tag ON collection_tags(tag);
"#;
