//! Domain model for projects and their owned tasks/todos.
//!
//! # Responsibility
//! - Define canonical data structures used by repository and board logic.
//! - Define the persisted wire shape (camelCase fields, kebab-case status).
//!
//! # Invariants
//! - Projects exclusively own their tasks and todos; nested records have no
//!   identity outside their parent.
//! - `TaskStatus` is a closed set, so no task can hold an unknown status.
//! - Timestamps are RFC 3339 UTC strings; see [`timestamp`].

pub mod project;
pub mod task;
pub mod timestamp;
pub mod todo;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Field constraint violations for create/update requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Project name is blank after trim.
    EmptyProjectName,
    /// Todo text is blank after trim.
    EmptyTodoText,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyProjectName => write!(f, "project name must not be blank"),
            Self::EmptyTodoText => write!(f, "todo text must not be blank"),
        }
    }
}

impl Error for ValidationError {}
