//! Application settings: database and image locations, writer tuning,
//! display formats and the tab last shown.
//!
//! The CLI and any other frontend share one file,
//! `~/.config/shelf/settings.toml`, so paths resolve the same way everywhere.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shelf_catalog::TabId;
use shelf_core::{DEFAULT_DATESTAMP_FORMAT, DEFAULT_TIMESTAMP_FORMAT};

/// Default bound of the background write queue.
pub const DEFAULT_WRITE_QUEUE_CAPACITY: usize = 1024;

/// Canonical path to the shared settings file: `~/.config/shelf/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("shelf").join("settings.toml")
}

/// Directory holding the database and images unless overridden.
pub fn data_dir() -> PathBuf {
    let data = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    data.join("shelf")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database_path: PathBuf,
    /// Game images live here as `{game id}.{ext}`.
    pub images_path: PathBuf,
    pub write_queue_capacity: usize,
    /// chrono format for timestamps shown to the user.
    pub timestamp_format: String,
    pub datestamp_format: String,
    /// Executables under this directory are stored relative to it.
    pub default_exe_dir: Option<PathBuf>,
    /// Tab the game list shows; `None` is the default view.
    pub display_tab: Option<TabId>,
}

impl Default for Settings {
    fn default() -> Self {
        let data = data_dir();
        Self {
            database_path: data.join("db.sqlite3"),
            images_path: data.join("images"),
            write_queue_capacity: DEFAULT_WRITE_QUEUE_CAPACITY,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            datestamp_format: DEFAULT_DATESTAMP_FORMAT.to_string(),
            default_exe_dir: None,
            display_tab: None,
        }
    }
}

impl Settings {
    /// Load from the shared settings file. See [`Settings::load_from`].
    pub fn load() -> Self {
        Self::load_from(&settings_path())
    }

    /// Load settings from `path`.
    ///
    /// A missing file gives the defaults. An unreadable or malformed file
    /// also gives the defaults, with a warning.
    pub fn load_from(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                log::warn!("Could not read {}: {e}; using defaults", path.display());
                return Self::default();
            }
        };
        match toml::from_str(&contents) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring malformed {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self) -> io::Result<()> {
        self.save_to(&settings_path())
    }

    /// Write the settings to `path` atomically.
    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let serialized = toml::to_string_pretty(self).map_err(io::Error::other)?;
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, &serialized)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Apply a command-line database override.
    pub fn with_database_path(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.database_path = path;
        }
        self
    }
}

/// Load the settings file as a pretty-printed TOML string for display.
pub fn load_settings_string() -> Option<String> {
    let contents = std::fs::read_to_string(settings_path()).ok()?;
    let doc: toml::Value = contents.parse().ok()?;
    toml::to_string_pretty(&doc).ok()
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
