//! In-process chart store.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;

use super::{ChartStore, OwnerKey, PersistedState, StoreError};
use crate::task::Task;

/// Map-backed store with the same upsert semantics as the SQLite backend.
#[derive(Debug, Default)]
pub struct InMemoryChartStore {
    rows: Mutex<HashMap<OwnerKey, PersistedState>>,
}

impl InMemoryChartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        self.rows.lock().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ChartStore for InMemoryChartStore {
    fn save(&self, owner: &OwnerKey, tasks: &[Task]) -> Result<PersistedState, StoreError> {
        let mut rows = self
            .rows
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))?;
        let now = Utc::now();
        let created_at = rows.get(owner).map_or(now, |existing| existing.created_at);
        let state = PersistedState {
            owner: owner.clone(),
            tasks: tasks.to_vec(),
            created_at,
            last_updated: now,
        };
        rows.insert(owner.clone(), state.clone());
        Ok(state)
    }

    fn fetch(&self, owner: &OwnerKey) -> Result<Option<PersistedState>, StoreError> {
        let rows = self
            .rows
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))?;
        Ok(rows.get(owner).cloned())
    }
}
