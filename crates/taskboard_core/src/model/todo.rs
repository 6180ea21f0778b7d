//! Checklist item model.

use serde::{Deserialize, Serialize};

/// Stable identifier for a todo item, unique within its project.
pub type TodoId = String;

/// One checklist entry owned by a project.
///
/// `project_id` is a denormalized back-reference kept for lookup
/// convenience; ownership is expressed by nesting inside `Project::todos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub id: TodoId,
    pub text: String,
    pub completed: bool,
    pub created_at: String,
    pub project_id: String,
}

impl TodoItem {
    pub fn new(
        id: TodoId,
        project_id: impl Into<String>,
        text: impl Into<String>,
        now: String,
    ) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
            created_at: now,
            project_id: project_id.into(),
        }
    }

    /// Flips completion unconditionally.
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }
}
