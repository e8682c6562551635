//! Application layer for the image catalog.
//!
//! Frontends open a [`CatalogSession`] with [`open_catalog`] and drive it
//! with form submissions, deletes, exports and imports. Each completed
//! action yields a [`Notice`] to show the user; failures come back as
//! [`CatalogError`], whose [`CatalogError::user_message`] is the text to show.

pub mod confirm;
pub mod error;
pub mod notice;
pub mod session;
pub mod settings;

pub use confirm::{Confirm, ConfirmChannel, ConfirmRequest, confirm_channel};
pub use error::CatalogError;
pub use notice::{Notice, NoticeLevel};
pub use session::{CatalogSession, ExportFile};
pub use settings::{
    AppSettings, ExportSettings, IntakeSettings, StorageSettings, load_settings,
    load_settings_from, save_settings, save_settings_to, settings_path,
};

use koleksi_db::SqliteStore;

/// Initialize `info`-level logging for a frontend.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let _ = env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .try_init();
}

/// Open the catalog database named in `settings`, creating its directory
/// and schema on first use.
pub fn open_catalog(settings: &AppSettings) -> Result<CatalogSession<SqliteStore>, CatalogError> {
    let path = &settings.storage.database_path;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let store = SqliteStore::open(path)?;
    log::info!("Opened catalog at {}", path.display());
    Ok(CatalogSession::with_settings(store, settings))
}
