//! Project aggregate.
//!
//! # Responsibility
//! - Own tasks and todos as embedded collections.
//! - Provide read projections used by board columns and selectors.
//!
//! # Invariants
//! - `name` is non-blank.
//! - `updated_at` never moves backwards; it is refreshed on every mutation of
//!   the project or anything it owns.
//! - Deleting a project drops its tasks and todos with it.

use crate::model::task::{Task, TaskStatus};
use crate::model::todo::TodoItem;
use serde::{Deserialize, Serialize};

/// Stable identifier for a project, unique across the collection.
pub type ProjectId = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
    pub tasks: Vec<Task>,
    pub todos: Vec<TodoItem>,
}

impl Project {
    /// Creates an empty project with both timestamps set to `now`.
    pub fn new(
        id: ProjectId,
        name: impl Into<String>,
        description: impl Into<String>,
        now: String,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            created_at: now.clone(),
            updated_at: now,
            tasks: Vec::new(),
            todos: Vec::new(),
        }
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    pub fn todo(&self, todo_id: &str) -> Option<&TodoItem> {
        self.todos.iter().find(|todo| todo.id == todo_id)
    }

    /// Tasks in one workflow column, in stored order.
    pub fn tasks_with_status(&self, status: TaskStatus) -> impl Iterator<Item = &Task> + '_ {
        self.tasks.iter().filter(move |task| task.status == status)
    }

    /// Returns `(completed, total)` for the checklist.
    pub fn todo_progress(&self) -> TodoProgress {
        TodoProgress {
            completed: self.todos.iter().filter(|todo| todo.completed).count(),
            total: self.todos.len(),
        }
    }

    /// Compact listing projection for project selectors.
    pub fn summary(&self) -> ProjectSummary {
        ProjectSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            task_count: self.tasks.len(),
            todo_count: self.todos.len(),
        }
    }
}

/// Checklist completion counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TodoProgress {
    pub completed: usize,
    pub total: usize,
}

/// One row in a project selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSummary {
    pub id: ProjectId,
    pub name: String,
    pub task_count: usize,
    pub todo_count: usize,
}

/// Partial update for project-level fields. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}
