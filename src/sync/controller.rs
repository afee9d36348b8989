//! Trigger dispatch.
//!
//! Transition rules, applied in order:
//! 1. A session with no list yet loads from the store (or seeds), whatever the trigger.
//! 2. The trigger's own action runs on top of that list.
//! 3. The resulting list is rendered and returned with a status line.

use std::sync::Arc;

use chrono::{Local, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use super::trigger::{FormEcho, Trigger};
use crate::chart::{ChartDescription, render};
use crate::state::TaskState;
use crate::store::{ChartStore, OwnerKey};
use crate::task::{TaskForm, TaskList, default_seed_tasks};

/// Wall-clock source for status timestamps.
pub type Clock = Arc<dyn Fn() -> NaiveTime + Send + Sync>;

/// Session shared between request handlers and the auto-save loop.
pub type SharedSession = Arc<tokio::sync::Mutex<Session>>;

/// One editing session: which row it edits and what it holds in memory.
#[derive(Debug, Clone)]
pub struct Session {
    owner: OwnerKey,
    state: TaskState,
}

impl Session {
    /// Fresh session; the first trigger will load from the store.
    pub fn new(owner: OwnerKey) -> Self {
        Self {
            owner,
            state: TaskState::new(),
        }
    }

    /// Session resuming from a client-held snapshot. An empty snapshot
    /// resumes from the seed schedule.
    pub fn from_snapshot(owner: OwnerKey, snapshot: TaskList) -> Self {
        let tasks = if snapshot.is_empty() {
            default_seed_tasks()
        } else {
            snapshot
        };
        Self {
            owner,
            state: TaskState::with_tasks(tasks),
        }
    }

    pub fn owner(&self) -> &OwnerKey {
        &self.owner
    }

    pub fn state(&self) -> &TaskState {
        &self.state
    }

    /// Wrap for sharing across tasks.
    pub fn shared(self) -> SharedSession {
        Arc::new(tokio::sync::Mutex::new(self))
    }
}

/// Behavior switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Reject added tasks that fail [`crate::task::Task::validate`].
    pub validate_tasks: bool,
}

/// Result of handling one trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResponse {
    pub chart: ChartDescription,
    /// The list after the trigger; the client's copy of state.
    pub snapshot: TaskList,
    /// Human-readable outcome; empty when nothing happened.
    pub status: String,
    pub fields: FormEcho,
}

/// Decides, per trigger, whether to load, mutate, save, or just re-render.
pub struct SyncController {
    store: Arc<dyn ChartStore>,
    options: SyncOptions,
    clock: Clock,
}

impl SyncController {
    pub fn new(store: Arc<dyn ChartStore>) -> Self {
        Self {
            store,
            options: SyncOptions::default(),
            clock: Arc::new(|| Local::now().time()),
        }
    }

    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    /// Override the clock used in "Saved at" messages.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &Arc<dyn ChartStore> {
        &self.store
    }

    /// Handle one trigger to completion.
    pub fn handle(&self, session: &mut Session, trigger: Trigger) -> SyncResponse {
        debug!(trigger = trigger.name(), owner = %session.owner, "handling trigger");

        let first_call = !session.state.is_initialized();
        if first_call {
            session.state.initialize(self.store.as_ref(), &session.owner);
        }

        let (status, fields) = match trigger {
            Trigger::None => (String::new(), FormEcho::unchanged()),
            Trigger::AddTask(form) => self.add_task(session, &form),
            Trigger::ManualSave => {
                let status = match self.save(session) {
                    Ok(()) => format!("Saved at {}", self.timestamp()),
                    Err(e) => format!("Save failed: {e}"),
                };
                (status, FormEcho::unchanged())
            }
            Trigger::Reload => {
                if !first_call {
                    session.state.reload(self.store.as_ref(), &session.owner);
                }
                ("Reloaded from database".to_owned(), FormEcho::unchanged())
            }
            Trigger::AutoSaveTick => {
                let status = if session.state.current_list().is_empty() {
                    String::new()
                } else {
                    match self.save(session) {
                        Ok(()) => format!("Auto-saved at {}", self.timestamp()),
                        Err(e) => format!("Auto-save failed: {e}"),
                    }
                };
                (status, FormEcho::unchanged())
            }
        };

        let tasks = session.state.current_list();
        SyncResponse {
            chart: render(tasks),
            snapshot: tasks.to_vec(),
            status,
            fields,
        }
    }

    fn add_task(&self, session: &mut Session, form: &TaskForm) -> (String, FormEcho) {
        let task = match form.to_task() {
            Ok(Some(task)) => task,
            Ok(None) => {
                debug!("add_task skipped: name, start, or end date missing");
                return (String::new(), FormEcho::unchanged());
            }
            Err(e) => {
                warn!("add_task rejected: {e}");
                return (e.to_string(), FormEcho::unchanged());
            }
        };

        if self.options.validate_tasks {
            if let Err(e) = task.validate() {
                warn!(name = %task.name, "add_task rejected: {e}");
                return (format!("Rejected: {e}"), FormEcho::unchanged());
            }
        }

        let name = task.name.clone();
        session.state.add_task(task);
        let status = match self.save(session) {
            Ok(()) => format!("Added: '{name}'"),
            Err(e) => format!("Added: '{name}' (save failed: {e})"),
        };
        (status, FormEcho::cleared())
    }

    fn save(&self, session: &Session) -> Result<(), crate::store::StoreError> {
        let tasks = session.state.current_list();
        match self.store.save(&session.owner, tasks) {
            Ok(saved) => {
                info!(
                    owner = %session.owner,
                    tasks = saved.tasks.len(),
                    updated = %saved.last_updated,
                    "saved chart state"
                );
                Ok(())
            }
            Err(e) => {
                error!(owner = %session.owner, "cannot save chart state: {e}");
                Err(e)
            }
        }
    }

    fn timestamp(&self) -> String {
        (self.clock)().format("%H:%M:%S").to_string()
    }
}
