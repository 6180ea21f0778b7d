//! Normalization of untrusted decoded blobs into canonical projects.
//!
//! # Responsibility
//! - Turn an arbitrary `serde_json::Value` into well-formed `Project`
//!   records, dropping what cannot be repaired and defaulting what can.
//!
//! # Invariants
//! - Never fails: the output is a (possibly empty) lazy sequence.
//! - Records are filtered one by one; a bad element never affects siblings.
//! - Normalizing already-normalized output returns it unchanged.
//! - Ids are unique in their scope; later duplicates are dropped.
//! - Nested tasks/todos are validated as strictly as their parent.

use crate::model::project::Project;
use crate::model::task::{Task, TaskStatus};
use crate::model::todo::TodoItem;
use log::warn;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Lazily normalizes a decoded blob into projects.
///
/// `now` is the timestamp used for any missing or malformed time field.
/// A non-array input yields an empty sequence.
pub fn normalize_projects<'a>(
    value: &'a Value,
    now: &'a str,
) -> impl Iterator<Item = Project> + 'a {
    let elements = value.as_array().map(Vec::as_slice).unwrap_or_default();
    let mut seen = HashSet::new();
    elements
        .iter()
        .enumerate()
        .filter_map(move |(index, element)| {
            let project = normalize_project(element, now).or_else(|| {
                log_dropped("project", index, "missing_id_or_name");
                None
            })?;
            if !seen.insert(project.id.clone()) {
                log_dropped("project", index, "duplicate_id");
                return None;
            }
            Some(project)
        })
}

/// Normalizes one project element, or rejects it.
pub fn normalize_project(value: &Value, now: &str) -> Option<Project> {
    let record = value.as_object()?;
    let id = non_blank_str(record, "id")?;
    let name = non_blank_str(record, "name")?;

    let mut seen_tasks = HashSet::new();
    let tasks = array_field(record, "tasks")
        .iter()
        .enumerate()
        .filter_map(|(index, element)| {
            let task = normalize_task(element, now).or_else(|| {
                log_dropped("task", index, "missing_id_or_status");
                None
            })?;
            if !seen_tasks.insert(task.id.clone()) {
                log_dropped("task", index, "duplicate_id");
                return None;
            }
            Some(task)
        })
        .collect();

    let mut seen_todos = HashSet::new();
    let todos = array_field(record, "todos")
        .iter()
        .enumerate()
        .filter_map(|(index, element)| {
            let todo = normalize_todo(element, id, now).or_else(|| {
                log_dropped("todo", index, "missing_id");
                None
            })?;
            if !seen_todos.insert(todo.id.clone()) {
                log_dropped("todo", index, "duplicate_id");
                return None;
            }
            Some(todo)
        })
        .collect();

    Some(Project {
        id: id.to_string(),
        name: name.to_string(),
        description: str_or(record, "description", ""),
        created_at: str_or(record, "createdAt", now),
        updated_at: str_or(record, "updatedAt", now),
        tasks,
        todos,
    })
}

/// Normalizes one nested task; unknown statuses are rejected.
pub fn normalize_task(value: &Value, now: &str) -> Option<Task> {
    let record = value.as_object()?;
    let id = non_blank_str(record, "id")?;
    let status = record
        .get("status")
        .and_then(Value::as_str)
        .and_then(TaskStatus::parse)?;

    Some(Task {
        id: id.to_string(),
        title: str_or(record, "title", ""),
        description: str_or(record, "description", ""),
        status,
        created_at: str_or(record, "createdAt", now),
        updated_at: str_or(record, "updatedAt", now),
    })
}

/// Normalizes one nested todo; the back-reference is forced to `project_id`.
pub fn normalize_todo(value: &Value, project_id: &str, now: &str) -> Option<TodoItem> {
    let record = value.as_object()?;
    let id = non_blank_str(record, "id")?;

    Some(TodoItem {
        id: id.to_string(),
        text: str_or(record, "text", ""),
        completed: record
            .get("completed")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        created_at: str_or(record, "createdAt", now),
        project_id: project_id.to_string(),
    })
}

fn non_blank_str<'v>(record: &'v Map<String, Value>, field: &str) -> Option<&'v str> {
    record
        .get(field)
        .and_then(Value::as_str)
        .filter(|value| !value.trim().is_empty())
}

fn str_or(record: &Map<String, Value>, field: &str, fallback: &str) -> String {
    record
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or(fallback)
        .to_string()
}

fn array_field<'v>(record: &'v Map<String, Value>, field: &str) -> &'v [Value] {
    record
        .get(field)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn log_dropped(kind: &str, index: usize, reason: &str) {
    warn!("event=record_dropped module=normalize status=skipped kind={kind} index={index} reason={reason}");
}

#[cfg(test)]
mod tests {
    use super::{normalize_project, normalize_projects};
    use crate::model::task::TaskStatus;
    use serde_json::json;

    const NOW: &str = "2026-04-01T12:00:00.000Z";

    #[test]
    fn non_array_input_yields_nothing() {
        for value in [json!(null), json!({"id": "p1", "name": "x"}), json!("[]"), json!(3)] {
            assert_eq!(normalize_projects(&value, NOW).count(), 0);
        }
    }

    #[test]
    fn project_requires_string_id_and_name() {
        assert!(normalize_project(&json!({"id": "p1"}), NOW).is_none());
        assert!(normalize_project(&json!({"id": 7, "name": "x"}), NOW).is_none());
        assert!(normalize_project(&json!({"id": "p1", "name": "  "}), NOW).is_none());
        assert!(normalize_project(&json!(["p1", "x"]), NOW).is_none());
    }

    #[test]
    fn missing_fields_are_defaulted_independently() {
        let project = normalize_project(
            &json!({
                "id": "p1",
                "name": "Launch",
                "description": 5,
                "updatedAt": "2025-01-01T00:00:00.000Z",
                "tasks": "nope"
            }),
            NOW,
        )
        .unwrap();
        assert_eq!(project.description, "");
        assert_eq!(project.created_at, NOW);
        assert_eq!(project.updated_at, "2025-01-01T00:00:00.000Z");
        assert!(project.tasks.is_empty());
        assert!(project.todos.is_empty());
    }

    #[test]
    fn nested_records_are_validated() {
        let project = normalize_project(
            &json!({
                "id": "p1",
                "name": "Launch",
                "tasks": [
                    {"id": "t1", "status": "in-progress", "title": "ok"},
                    {"id": "t2", "status": "blocked"},
                    {"status": "todo"},
                    {"id": "t1", "status": "done"}
                ],
                "todos": [
                    {"id": "d1", "text": "a", "completed": "yes", "projectId": "other"},
                    42
                ]
            }),
            NOW,
        )
        .unwrap();
        assert_eq!(project.tasks.len(), 1);
        assert_eq!(project.tasks[0].status, TaskStatus::InProgress);
        assert_eq!(project.tasks[0].description, "");
        assert_eq!(project.todos.len(), 1);
        assert!(!project.todos[0].completed);
        assert_eq!(project.todos[0].project_id, "p1");
    }

    #[test]
    fn duplicate_project_ids_keep_first() {
        let value = json!([
            {"id": "p1", "name": "first"},
            {"id": "p1", "name": "second"},
            {"id": "p2", "name": "third"}
        ]);
        let names = normalize_projects(&value, NOW)
            .map(|project| project.name)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["first", "third"]);
    }
}
