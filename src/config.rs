//! Configuration types for the gantt service.
//!
//! Values come from an optional TOML file, then from the environment
//! (`DATABASE_URL`, `PORT`). Both are read once at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::store::OwnerKey;

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "GANTT_CONFIG";

/// Environment variable carrying the database connection string.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Environment variable carrying the listen port.
pub const PORT_ENV: &str = "PORT";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GanttConfig {
    /// Persistence store settings.
    pub database: DatabaseConfig,
    /// HTTP listener settings.
    pub server: ServerConfig,
    /// Which (user, project) row this process edits.
    pub session: SessionConfig,
    /// Periodic auto-save settings.
    pub autosave: AutoSaveConfig,
    /// Task editing rules.
    pub editor: EditorConfig,
    /// Log output settings.
    pub logging: LoggingConfig,
}

/// Persistence store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection string: a file path, `sqlite://<path>`, or `:memory:`.
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: crate::gantt_dirs::database_file().display().to_string(),
        }
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host.
    pub host: String,
    /// Bind port (0 = auto-assign).
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_owned(),
            port: 8050,
        }
    }
}

/// Session identity. There is no authentication; one fixed pair per process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub user_id: String,
    pub project_id: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            user_id: "default_user".to_owned(),
            project_id: "my_project".to_owned(),
        }
    }
}

impl SessionConfig {
    /// Store key for this session.
    pub fn owner_key(&self) -> OwnerKey {
        OwnerKey::new(&self.user_id, &self.project_id)
    }
}

/// Auto-save timer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoSaveConfig {
    /// Whether the background auto-save loop runs.
    pub enabled: bool,
    /// Seconds between auto-save ticks.
    pub interval_secs: u64,
}

impl Default for AutoSaveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 5,
        }
    }
}

impl AutoSaveConfig {
    /// Tick interval, never shorter than one second.
    pub fn interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.interval_secs.max(1))
    }
}

/// Task editing rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Reject added tasks with `finish < start` or completion outside 0..=100.
    ///
    /// Off by default: values are accepted as entered.
    pub validate_tasks: bool,
}

/// Log output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
    /// Directory for daily-rolling log files. `None` = stderr only.
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "gantt=info".to_owned(),
            log_dir: None,
        }
    }
}

impl GanttConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::error::GanttError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::GanttError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `<config_dir>/config.toml`.
    pub fn default_config_path() -> PathBuf {
        crate::gantt_dirs::config_dir().join("config.toml")
    }

    /// Startup load: config file (from `GANTT_CONFIG`, else the default path
    /// if it exists), then environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named config file cannot be loaded.
    /// Rejected overrides are returned so they can be logged once tracing is up.
    pub fn load_startup() -> crate::error::Result<(Self, Vec<RejectedOverride>)> {
        let mut config = match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => {
                let path = Self::default_config_path();
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    Self::default()
                }
            }
        };
        let rejected = config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok((config, rejected))
    }

    /// Apply `DATABASE_URL` and `PORT` from `lookup`, returning the values
    /// that could not be applied.
    pub fn apply_env_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Vec<RejectedOverride> {
        let mut rejected = Vec::new();
        if let Some(url) = lookup(DATABASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.database.url = url.trim().to_owned();
        }
        if let Some(raw) = lookup(PORT_ENV) {
            match raw.trim().parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(e) => rejected.push(RejectedOverride {
                    key: PORT_ENV,
                    value: raw,
                    reason: e.to_string(),
                }),
            }
        }
        rejected
    }
}

/// An environment override that was present but unusable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedOverride {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

impl std::fmt::Display for RejectedOverride {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ignoring {}={:?}: {}", self.key, self.value, self.reason)
    }
}
