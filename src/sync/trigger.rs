//! Trigger events and per-field output updates.

use serde::{Deserialize, Serialize};

use crate::task::TaskForm;

/// One external event. Exactly one fires per controller call.
///
/// JSON form: `{"trigger": "add_task", "form": {...}}`. Every trigger may carry
/// the form; a missing form reads as all-empty and non-add triggers ignore it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TriggerRequest", into = "TriggerRequest")]
pub enum Trigger {
    /// Initial render or unrecognized event.
    #[default]
    None,
    /// Add-task button with the current form values.
    AddTask(TaskForm),
    /// Save-now button.
    ManualSave,
    /// Reload button.
    Reload,
    /// Auto-save timer tick.
    AutoSaveTick,
}

/// Which control fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    None,
    AddTask,
    ManualSave,
    Reload,
    AutoSaveTick,
}

/// Wire shape of a trigger: the control plus the five input values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerRequest {
    pub trigger: TriggerKind,
    #[serde(default)]
    pub form: TaskForm,
}

impl From<TriggerRequest> for Trigger {
    fn from(request: TriggerRequest) -> Self {
        match request.trigger {
            TriggerKind::None => Self::None,
            TriggerKind::AddTask => Self::AddTask(request.form),
            TriggerKind::ManualSave => Self::ManualSave,
            TriggerKind::Reload => Self::Reload,
            TriggerKind::AutoSaveTick => Self::AutoSaveTick,
        }
    }
}

impl From<Trigger> for TriggerRequest {
    fn from(trigger: Trigger) -> Self {
        let (trigger, form) = match trigger {
            Trigger::None => (TriggerKind::None, TaskForm::default()),
            Trigger::AddTask(form) => (TriggerKind::AddTask, form),
            Trigger::ManualSave => (TriggerKind::ManualSave, TaskForm::default()),
            Trigger::Reload => (TriggerKind::Reload, TaskForm::default()),
            Trigger::AutoSaveTick => (TriggerKind::AutoSaveTick, TaskForm::default()),
        };
        Self { trigger, form }
    }
}

impl Trigger {
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::AddTask(_) => "add_task",
            Self::ManualSave => "manual_save",
            Self::Reload => "reload",
            Self::AutoSaveTick => "auto_save_tick",
        }
    }
}

/// New value for one output field, or leave it as the client has it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum FieldUpdate<T> {
    Changed(T),
    Unchanged,
}

/// Post-action values of the five task input fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormEcho {
    pub task_name: FieldUpdate<String>,
    pub start_date: FieldUpdate<String>,
    pub end_date: FieldUpdate<String>,
    pub resource: FieldUpdate<String>,
    pub completion: FieldUpdate<i32>,
}

impl FormEcho {
    /// Leave every field as entered.
    pub fn unchanged() -> Self {
        Self {
            task_name: FieldUpdate::Unchanged,
            start_date: FieldUpdate::Unchanged,
            end_date: FieldUpdate::Unchanged,
            resource: FieldUpdate::Unchanged,
            completion: FieldUpdate::Unchanged,
        }
    }

    /// Reset every field to blank (completion to 0).
    pub fn cleared() -> Self {
        Self {
            task_name: FieldUpdate::Changed(String::new()),
            start_date: FieldUpdate::Changed(String::new()),
            end_date: FieldUpdate::Changed(String::new()),
            resource: FieldUpdate::Changed(String::new()),
            completion: FieldUpdate::Changed(0),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn trigger_json_shapes() {
        let save: Trigger = serde_json::from_str(r#"{"trigger":"manual_save"}"#).unwrap();
        assert_eq!(save, Trigger::ManualSave);

        let add: Trigger = serde_json::from_str(
            r#"{"trigger":"add_task","form":{"task_name":"T1","start_date":"2025-01-01","end_date":"2025-01-05","completion":50}}"#,
        )
        .unwrap();
        let Trigger::AddTask(form) = add else {
            panic!("expected add_task");
        };
        assert_eq!(form.task_name.as_deref(), Some("T1"));
        assert_eq!(form.resource, None);
        assert_eq!(form.completion, Some(50));

        assert!(serde_json::from_str::<Trigger>(r#"{"trigger":"explode"}"#).is_err());
    }

    #[test]
    fn field_update_json_shape() {
        let changed = serde_json::to_value(FieldUpdate::Changed(0)).unwrap();
        assert_eq!(changed, serde_json::json!({"state": "changed", "value": 0}));
        let unchanged = serde_json::to_value(FieldUpdate::<i32>::Unchanged).unwrap();
        assert_eq!(unchanged, serde_json::json!({"state": "unchanged"}));
    }

    #[test]
    fn cleared_echo_blanks_every_field() {
        let cleared = FormEcho::cleared();
        assert_eq!(cleared.task_name, FieldUpdate::Changed(String::new()));
        assert_eq!(cleared.resource, FieldUpdate::Changed(String::new()));
        assert_eq!(cleared.completion, FieldUpdate::Changed(0));
        assert_eq!(FormEcho::unchanged().end_date, FieldUpdate::Unchanged);
    }

    #[test]
    fn add_task_without_form_reads_as_empty_form() {
        let add: Trigger = serde_json::from_str(r#"{"trigger":"add_task"}"#).unwrap();
        assert_eq!(add, Trigger::AddTask(TaskForm::default()));
    }

    #[test]
    fn non_add_triggers_ignore_form_values() {
        let save: Trigger = serde_json::from_str(
            r#"{"trigger":"manual_save","form":{"task_name":"x","start_date":"2025-01-01"}}"#,
        )
        .unwrap();
        assert_eq!(save, Trigger::ManualSave);

        let tick: Trigger =
            serde_json::from_str(r#"{"trigger":"auto_save_tick","form":{"completion":5}}"#)
                .unwrap();
        assert_eq!(tick, Trigger::AutoSaveTick);
    }

    #[test]
    fn trigger_serializes_with_form() {
        let json = serde_json::to_value(Trigger::Reload).unwrap();
        assert_eq!(json["trigger"], "reload");
        assert!(json["form"].is_object());
    }
}
