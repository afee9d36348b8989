//! SQLite-backed chart store.
//!
//! A single database file holds the `gantt_states` table. Saves are one
//! `INSERT ... ON CONFLICT DO UPDATE` statement, so a row is never observed
//! half-written.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::info;

use super::schema::{apply_schema, read_schema_version};
use super::{ChartStore, OwnerKey, PersistedState, StoreError};
use crate::task::{Task, TaskList};

/// SQLite-backed chart store.
///
/// Thread-safe via an internal `Mutex<Connection>`; all statements are
/// serialized.
#[derive(Debug)]
pub struct SqliteChartStore {
    conn: Mutex<Connection>,
}

impl SqliteChartStore {
    /// Open (or create) the database at `path`, creating parent directories.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Io(e.to_string()))?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        apply_schema(&conn)?;
        let version = read_schema_version(&conn)?.unwrap_or(0);
        info!("opened chart store at {} (schema v{version})", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Private in-memory database; contents vanish with the store.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Read the current schema version from the database.
    pub fn schema_version(&self) -> Result<Option<u32>, StoreError> {
        let conn = self.lock()?;
        Ok(read_schema_version(&conn)?)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))
    }
}

impl ChartStore for SqliteChartStore {
    fn save(&self, owner: &OwnerKey, tasks: &[Task]) -> Result<PersistedState, StoreError> {
        let state_json = serde_json::to_string(tasks)?;
        let now = Utc::now().timestamp_millis();

        let conn = self.lock()?;
        let (created_at, updated_at): (i64, i64) = conn
            .query_row(
                "INSERT INTO gantt_states (user_id, project_id, state_data, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?4) \
                 ON CONFLICT (user_id, project_id) \
                 DO UPDATE SET state_data = excluded.state_data, updated_at = excluded.updated_at \
                 RETURNING created_at, updated_at",
                params![owner.user_id, owner.project_id, state_json, now],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?;

        Ok(PersistedState {
            owner: owner.clone(),
            tasks: tasks.to_vec(),
            created_at: millis_to_datetime(created_at),
            last_updated: millis_to_datetime(updated_at),
        })
    }

    fn fetch(&self, owner: &OwnerKey) -> Result<Option<PersistedState>, StoreError> {
        let conn = self.lock()?;
        let row: Option<(String, i64, i64)> = conn
            .query_row(
                "SELECT state_data, created_at, updated_at FROM gantt_states \
                 WHERE user_id = ?1 AND project_id = ?2",
                params![owner.user_id, owner.project_id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;
        drop(conn);

        let Some((state_json, created_at, updated_at)) = row else {
            return Ok(None);
        };
        let tasks: TaskList = serde_json::from_str(&state_json)?;
        Ok(Some(PersistedState {
            owner: owner.clone(),
            tasks,
            created_at: millis_to_datetime(created_at),
            last_updated: millis_to_datetime(updated_at),
        }))
    }
}

fn millis_to_datetime(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}
