//! Sync controller: reconciles the session's task list, the chart, and the store.
//!
//! Each call handles exactly one [`Trigger`] to completion. Callers that share
//! a session across tasks (HTTP handlers, the auto-save loop) serialize access
//! through a [`SharedSession`] lock.

pub mod controller;
pub mod trigger;

pub use controller::{Clock, Session, SharedSession, SyncController, SyncOptions, SyncResponse};
pub use trigger::{FieldUpdate, FormEcho, Trigger, TriggerKind, TriggerRequest};
