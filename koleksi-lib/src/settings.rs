//! Application settings stored in `~/.config/koleksi/settings.toml`.
//!
//! Every field has a default, so a missing or partial file is fine. A file
//! that fails to parse is reported in the log and replaced by defaults.

use std::io;
use std::path::{Path, PathBuf};

use koleksi_core::MAX_IMAGE_BYTES;
use koleksi_import::EXPORT_FILE_NAME;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppSettings {
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub intake: IntakeSettings,
    #[serde(default)]
    pub export: ExportSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeSettings {
    /// Largest image accepted into a form, in bytes.
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: usize,
}

impl Default for IntakeSettings {
    fn default() -> Self {
        Self {
            max_image_bytes: default_max_image_bytes(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSettings {
    #[serde(default = "default_export_file_name")]
    pub file_name: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            file_name: default_export_file_name(),
        }
    }
}

fn default_database_path() -> PathBuf {
    let data = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    data.join("koleksi").join("koleksi.db")
}

fn default_max_image_bytes() -> usize {
    MAX_IMAGE_BYTES
}

fn default_export_file_name() -> String {
    EXPORT_FILE_NAME.to_string()
}

/// Returns `~/.config/koleksi/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("koleksi").join("settings.toml")
}

/// Load settings from the default location.
pub fn load_settings() -> AppSettings {
    load_settings_from(&settings_path())
}

/// Load settings from `path`, returning defaults if missing or corrupt.
pub fn load_settings_from(path: &Path) -> AppSettings {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
            log::warn!("Failed to parse settings at {}: {}", path.display(), e);
            AppSettings::default()
        }),
        Err(_) => AppSettings::default(),
    }
}

/// Save settings to the default location.
pub fn save_settings(settings: &AppSettings) -> io::Result<()> {
    save_settings_to(&settings_path(), settings)
}

/// Save settings to `path` atomically (write to temp, then rename).
pub fn save_settings_to(path: &Path, settings: &AppSettings) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let contents = toml::to_string_pretty(settings).map_err(io::Error::other)?;
    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, contents)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
