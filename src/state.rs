//! Task state manager: the session's authoritative task list.

use tracing::{debug, info};

use crate::store::{ChartStore, OwnerKey};
use crate::task::{Task, TaskList, default_seed_tasks};

/// Where the list came from on initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitSource {
    /// A list was already held; nothing happened.
    AlreadyHeld,
    /// Loaded from the store.
    Loaded,
    /// Store had nothing usable; the seed schedule was used.
    Seeded,
}

/// Holds the in-memory task list. `None` until first initialized.
#[derive(Debug, Clone, Default)]
pub struct TaskState {
    tasks: Option<TaskList>,
}

impl TaskState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State seeded with an existing list (e.g. a client-held snapshot).
    pub fn with_tasks(tasks: TaskList) -> Self {
        Self { tasks: Some(tasks) }
    }

    pub fn is_initialized(&self) -> bool {
        self.tasks.is_some()
    }

    /// Load from the store if nothing is held yet, else fall back to the seed.
    pub fn initialize(&mut self, store: &dyn ChartStore, owner: &OwnerKey) -> InitSource {
        if self.tasks.is_some() {
            return InitSource::AlreadyHeld;
        }
        match load_non_empty(store, owner) {
            Some(tasks) => {
                info!(%owner, tasks = tasks.len(), "initialized chart from store");
                self.tasks = Some(tasks);
                InitSource::Loaded
            }
            None => {
                info!(%owner, "initialized chart from seed schedule");
                self.tasks = Some(default_seed_tasks());
                InitSource::Seeded
            }
        }
    }

    /// Append a task. No de-duplication or range checks.
    pub fn add_task(&mut self, task: Task) {
        debug!(name = %task.name, "appending task");
        self.tasks.get_or_insert_with(Vec::new).push(task);
    }

    /// Replace the list with the stored one; keep the current list if the
    /// store has nothing. Returns `true` when the list was replaced.
    pub fn reload(&mut self, store: &dyn ChartStore, owner: &OwnerKey) -> bool {
        match load_non_empty(store, owner) {
            Some(tasks) => {
                info!(%owner, tasks = tasks.len(), "reloaded chart from store");
                self.tasks = Some(tasks);
                true
            }
            None => {
                debug!(%owner, "reload found nothing stored, keeping current list");
                false
            }
        }
    }

    /// Read-only view of the current list (empty if uninitialized).
    pub fn current_list(&self) -> &[Task] {
        self.tasks.as_deref().unwrap_or_default()
    }
}

/// A stored empty list counts as nothing stored.
fn load_non_empty(store: &dyn ChartStore, owner: &OwnerKey) -> Option<TaskList> {
    store.load(owner).filter(|tasks| !tasks.is_empty())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use crate::store::InMemoryChartStore;
    use chrono::NaiveDate;

    fn owner() -> OwnerKey {
        OwnerKey::new("default_user", "my_project")
    }

    fn sample(name: &str) -> Task {
        Task::new(
            name,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 5).unwrap(),
        )
    }

    #[test]
    fn initialize_seeds_when_store_empty() {
        let store = InMemoryChartStore::new();
        let mut state = TaskState::new();
        assert!(!state.is_initialized());
        assert_eq!(state.initialize(&store, &owner()), InitSource::Seeded);
        assert_eq!(state.current_list(), default_seed_tasks().as_slice());
    }

    #[test]
    fn initialize_prefers_stored_list() {
        let store = InMemoryChartStore::new();
        store.save(&owner(), &[sample("Stored")]).unwrap();
        let mut state = TaskState::new();
        assert_eq!(state.initialize(&store, &owner()), InitSource::Loaded);
        assert_eq!(state.current_list(), &[sample("Stored")]);
    }

    #[test]
    fn initialize_treats_stored_empty_list_as_absent() {
        let store = InMemoryChartStore::new();
        store.save(&owner(), &[]).unwrap();
        let mut state = TaskState::new();
        assert_eq!(state.initialize(&store, &owner()), InitSource::Seeded);
    }

    #[test]
    fn initialize_is_noop_once_held() {
        let store = InMemoryChartStore::new();
        store.save(&owner(), &[sample("Stored")]).unwrap();
        let mut state = TaskState::with_tasks(vec![sample("Held")]);
        assert_eq!(state.initialize(&store, &owner()), InitSource::AlreadyHeld);
        assert_eq!(state.current_list(), &[sample("Held")]);
    }

    #[test]
    fn add_task_appends_at_end() {
        let mut state = TaskState::with_tasks(default_seed_tasks());
        state.add_task(sample("T1"));
        state.add_task(sample("T1"));
        assert_eq!(state.current_list().len(), 8);
        assert_eq!(state.current_list().last(), Some(&sample("T1")));
    }

    #[test]
    fn reload_replaces_or_keeps() {
        let store = InMemoryChartStore::new();
        let mut state = TaskState::with_tasks(vec![sample("Memory")]);

        assert!(!state.reload(&store, &owner()));
        assert_eq!(state.current_list(), &[sample("Memory")]);

        store.save(&owner(), &[sample("Stored"), sample("Other")]).unwrap();
        assert!(state.reload(&store, &owner()));
        assert_eq!(state.current_list(), &[sample("Stored"), sample("Other")]);
    }
}
