//! Task data model.
//!
//! A [`Task`] has no identifier; its identity is its position in the
//! [`TaskList`]. Lists are only ever replaced whole or appended to.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Resource used when a task is added without one.
pub const DEFAULT_RESOURCE: &str = "Unassigned";

/// Date format accepted from the task form.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One scheduled bar on the chart.
///
/// Rows written by older deployments used capitalized keys
/// (`Task`, `Start`, `Finish`, `Resource`, `Complete`); those are accepted on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(alias = "Task")]
    pub name: String,
    #[serde(alias = "Start")]
    pub start: NaiveDate,
    #[serde(alias = "Finish")]
    pub finish: NaiveDate,
    #[serde(alias = "Resource", default = "default_resource")]
    pub resource: String,
    /// Percent complete. Not range-checked unless strict validation is on.
    #[serde(alias = "Complete", default)]
    pub completion: i32,
}

/// Ordered task sequence; insertion order is rendering order.
pub type TaskList = Vec<Task>;

fn default_resource() -> String {
    DEFAULT_RESOURCE.to_owned()
}

/// Reasons a task fails strict validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskValidationError {
    #[error("task name is empty")]
    EmptyName,

    #[error("finish {finish} is before start {start}")]
    FinishBeforeStart { start: NaiveDate, finish: NaiveDate },

    #[error("completion {0}% is outside 0..=100")]
    CompletionOutOfRange(i32),
}

impl Task {
    /// New task with the default resource and 0% completion.
    pub fn new(name: impl Into<String>, start: NaiveDate, finish: NaiveDate) -> Self {
        Self {
            name: name.into(),
            start,
            finish,
            resource: default_resource(),
            completion: 0,
        }
    }

    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = resource.into();
        self
    }

    pub fn with_completion(mut self, completion: i32) -> Self {
        self.completion = completion;
        self
    }

    /// Check name, date order, and completion range.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.name.trim().is_empty() {
            return Err(TaskValidationError::EmptyName);
        }
        if self.finish < self.start {
            return Err(TaskValidationError::FinishBeforeStart {
                start: self.start,
                finish: self.finish,
            });
        }
        if !(0..=100).contains(&self.completion) {
            return Err(TaskValidationError::CompletionOutOfRange(self.completion));
        }
        Ok(())
    }
}

/// The fixed six-task schedule shown when nothing has been stored.
pub fn default_seed_tasks() -> TaskList {
    const SEED: [(&str, (u32, u32), (u32, u32), &str, i32); 6] = [
        ("Project Planning", (11, 1), (11, 5), "Project Manager", 100),
        ("Requirements", (11, 4), (11, 10), "Business Analyst", 80),
        ("Design Phase", (11, 8), (11, 15), "Design Team", 60),
        ("Development Sprint 1", (11, 12), (11, 20), "Dev Team", 40),
        ("Development Sprint 2", (11, 18), (11, 28), "Dev Team", 20),
        ("Testing", (11, 25), (12, 5), "QA Team", 0),
    ];

    SEED.iter()
        .filter_map(|&(name, (sm, sd), (fm, fd), resource, completion)| {
            let start = NaiveDate::from_ymd_opt(2025, sm, sd)?;
            let finish = NaiveDate::from_ymd_opt(2025, fm, fd)?;
            Some(
                Task::new(name, start, finish)
                    .with_resource(resource)
                    .with_completion(completion),
            )
        })
        .collect()
}

/// Raw values of the five task input fields.
///
/// Empty strings are treated the same as absent values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskForm {
    pub task_name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub resource: Option<String>,
    pub completion: Option<i32>,
}

/// Why a filled-in form could not become a task.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskFormError {
    #[error("Invalid date: '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),
}

impl TaskForm {
    /// Convert the form into a task.
    ///
    /// Returns `Ok(None)` when name, start, or end date is missing; the
    /// caller treats that as a silent no-op.
    pub fn to_task(&self) -> Result<Option<Task>, TaskFormError> {
        let (Some(name), Some(start), Some(finish)) = (
            non_empty(&self.task_name),
            non_empty(&self.start_date),
            non_empty(&self.end_date),
        ) else {
            return Ok(None);
        };

        let start = parse_date(start)?;
        let finish = parse_date(finish)?;
        let resource = non_empty(&self.resource).unwrap_or(DEFAULT_RESOURCE);

        Ok(Some(
            Task::new(name, start, finish)
                .with_resource(resource)
                .with_completion(self.completion.unwrap_or(0)),
        ))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn parse_date(raw: &str) -> Result<NaiveDate, TaskFormError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| TaskFormError::InvalidDate(raw.to_owned()))
}
