//! Persistence store for chart state.
//!
//! One row per (user, project) holding the whole serialized task list.
//! Writes are upserts (last writer wins); reads are all-or-nothing.
//!
//! Sub-modules:
//! - `schema`: SQLite DDL.
//! - `sqlite`: [`SqliteChartStore`], the durable backend.
//! - `memory`: [`InMemoryChartStore`], for ephemeral runs and tests.

pub mod memory;
pub(crate) mod schema;
pub mod sqlite;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::task::{Task, TaskList};

pub use memory::InMemoryChartStore;
pub use sqlite::SqliteChartStore;

/// Row key: which user's copy of which project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerKey {
    pub user_id: String,
    pub project_id: String,
}

impl OwnerKey {
    pub fn new(user_id: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            project_id: project_id.into(),
        }
    }
}

impl std::fmt::Display for OwnerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.user_id, self.project_id)
    }
}

/// A stored row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    pub owner: OwnerKey,
    pub tasks: TaskList,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

/// Errors raised by store backends.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("state codec error: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("lock poisoned: {0}")]
    Lock(String),

    #[error("unsupported database url: {0}")]
    UnsupportedUrl(String),
}

/// Keyed upsert / point-read storage for task lists.
pub trait ChartStore: Send + Sync {
    /// Serialize `tasks` and upsert the row for `owner`.
    ///
    /// Saving the same list twice leaves the same stored list.
    fn save(&self, owner: &OwnerKey, tasks: &[Task]) -> Result<PersistedState, StoreError>;

    /// Read the row for `owner`, if any.
    fn fetch(&self, owner: &OwnerKey) -> Result<Option<PersistedState>, StoreError>;

    /// Fail-soft read: any error is logged and reported as absent.
    fn load(&self, owner: &OwnerKey) -> Option<TaskList> {
        match self.fetch(owner) {
            Ok(Some(state)) => {
                debug!(%owner, tasks = state.tasks.len(), "loaded chart state");
                Some(state.tasks)
            }
            Ok(None) => {
                debug!(%owner, "no stored chart state");
                None
            }
            Err(e) => {
                warn!(%owner, "cannot load chart state, treating as absent: {e}");
                None
            }
        }
    }
}

/// Open the backend named by a connection string.
///
/// Accepts a plain path, `sqlite://<path>`, `sqlite::memory:`, or `:memory:`.
///
/// # Errors
///
/// Returns [`StoreError::UnsupportedUrl`] for other schemes, or the
/// backend's error if the database cannot be opened.
pub fn open_store(url: &str) -> Result<SqliteChartStore, StoreError> {
    let url = url.trim();
    if url == ":memory:" || url == "sqlite::memory:" || url == "sqlite://:memory:" {
        return SqliteChartStore::open_in_memory();
    }
    if let Some(path) = url.strip_prefix("sqlite://") {
        return SqliteChartStore::open(std::path::Path::new(path));
    }
    if url.is_empty() || url.contains("://") {
        return Err(StoreError::UnsupportedUrl(url.to_owned()));
    }
    SqliteChartStore::open(std::path::Path::new(url))
}
