//! Centralized application directory paths.
//!
//! Uses the [`dirs`] crate for platform-appropriate directory resolution.
//!
//! | Purpose | macOS | Linux |
//! |---------|-------|-------|
//! | App data | `~/Library/Application Support/gantt/` | `~/.local/share/gantt/` |
//! | Config | `~/Library/Application Support/gantt/` | `~/.config/gantt/` |
//!
//! # Environment Overrides
//!
//! - `GANTT_DATA_DIR` overrides [`data_dir`]
//! - `GANTT_CONFIG_DIR` overrides [`config_dir`]

use std::path::PathBuf;

/// Application data root directory.
///
/// Holds the default SQLite database and log files.
#[must_use]
pub fn data_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("GANTT_DATA_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::data_dir()
        .map(|d| d.join("gantt"))
        .unwrap_or_else(|| PathBuf::from("/tmp/gantt-data"))
}

/// Application config directory (holds `config.toml`).
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("GANTT_CONFIG_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join("gantt"))
        .unwrap_or_else(|| PathBuf::from("/tmp/gantt-config"))
}

/// Default SQLite database file (`data_dir()/gantt.db`).
#[must_use]
pub fn database_file() -> PathBuf {
    data_dir().join("gantt.db")
}
