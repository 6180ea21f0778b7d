//! Task domain model.
//!
//! # Responsibility
//! - Define the workflow status enum shared by board columns and drag logic.
//! - Define the task record and its partial-update shape.
//!
//! # Invariants
//! - `id` is unique within the owning project and never mutated.
//! - `status` is one of exactly three workflow columns.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Stable identifier for a task, unique within its project.
pub type TaskId = String;

/// Default title assigned to tasks created from a column's add button.
pub const DEFAULT_TASK_TITLE: &str = "New Task";

/// Workflow column a task currently occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Not started.
    Todo,
    /// Work is in progress.
    InProgress,
    /// Completed.
    Done,
}

impl TaskStatus {
    /// All columns in board display order.
    pub const ALL: [TaskStatus; 3] = [Self::Todo, Self::InProgress, Self::Done];

    /// Wire value used in the persisted blob.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in-progress",
            Self::Done => "done",
        }
    }

    /// Parses a wire value; unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "todo" => Some(Self::Todo),
            "in-progress" => Some(Self::InProgress),
            "done" => Some(Self::Done),
            _ => None,
        }
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown workflow status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl Display for UnknownStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown task status `{}`; expected todo|in-progress|done",
            self.0
        )
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for TaskStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value.trim()).ok_or_else(|| UnknownStatus(value.to_string()))
    }
}

/// One card on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl Task {
    /// Creates a placeholder task in the given column.
    pub fn new(id: TaskId, status: TaskStatus, now: String) -> Self {
        Self {
            id,
            title: DEFAULT_TASK_TITLE.to_string(),
            description: String::new(),
            status,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// Partial update for one task. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
}

impl TaskPatch {
    /// Patch that only moves the task to another column.
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub(crate) fn apply_to(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Task, TaskPatch, TaskStatus, DEFAULT_TASK_TITLE};

    #[test]
    fn status_wire_values_are_kebab_case() {
        assert_eq!(
            serde_json::to_value(TaskStatus::InProgress).unwrap(),
            "in-progress"
        );
        let parsed: TaskStatus = serde_json::from_value(serde_json::json!("done")).unwrap();
        assert_eq!(parsed, TaskStatus::Done);
        assert!(serde_json::from_value::<TaskStatus>(serde_json::json!("in_progress")).is_err());
    }

    #[test]
    fn from_str_trims_and_rejects_unknown() {
        assert_eq!(" todo ".parse::<TaskStatus>().unwrap(), TaskStatus::Todo);
        let err = "blocked".parse::<TaskStatus>().unwrap_err();
        assert!(err.to_string().contains("blocked"));
    }

    #[test]
    fn new_task_uses_placeholder_title() {
        let task = Task::new("t1".into(), TaskStatus::Done, "2026-01-01T00:00:00.000Z".into());
        assert_eq!(task.title, DEFAULT_TASK_TITLE);
        assert!(task.description.is_empty());
        assert_eq!(task.created_at, task.updated_at);
    }

    #[test]
    fn patch_only_touches_supplied_fields() {
        let mut task = Task::new("t1".into(), TaskStatus::Todo, "2026-01-01T00:00:00.000Z".into());
        TaskPatch {
            description: Some("details".into()),
            ..TaskPatch::default()
        }
        .apply_to(&mut task);
        assert_eq!(task.title, DEFAULT_TASK_TITLE);
        assert_eq!(task.description, "details");
        assert_eq!(task.status, TaskStatus::Todo);
    }
}
