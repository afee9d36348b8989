//! Gantt: an interactive Gantt-chart editor backend.
//!
//! A single session holds the authoritative task list. Triggers (add task,
//! save, reload, auto-save tick) flow through the sync controller, which
//! loads from or writes to the persistence store and re-renders the chart.
//!
//! # Architecture
//!
//! - **store**: Keyed upsert / point-read persistence (`rusqlite`)
//! - **state**: In-memory task list for the active session
//! - **chart**: Pure task list → chart description renderer
//! - **sync**: Trigger dispatch and reconciliation between memory and store
//! - **autosave**: Periodic auto-save tick on a tokio interval
//! - **server**: `axum` JSON API exposing the triggers

pub mod autosave;
pub mod chart;
pub mod config;
pub mod error;
pub mod gantt_dirs;
pub mod server;
pub mod state;
pub mod store;
pub mod sync;
pub mod task;

pub use chart::{ChartDescription, render};
pub use config::GanttConfig;
pub use error::{GanttError, Result};
pub use state::TaskState;
pub use store::{ChartStore, OwnerKey, PersistedState, StoreError};
pub use sync::{Session, SyncController, SyncResponse, Trigger};
pub use task::{Task, TaskForm, TaskList, default_seed_tasks};
