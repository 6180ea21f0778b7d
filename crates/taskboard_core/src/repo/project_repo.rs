//! Project repository over an injected blob store.
//!
//! # Responsibility
//! - Provide CRUD for projects and scoped CRUD for their tasks/todos.
//! - Drive the load (get -> decode -> normalize) and save (serialize -> set)
//!   round trips.
//! - Own id generation and timestamp bookkeeping.
//!
//! # Invariants
//! - Every successful mutation writes a full snapshot; there are no deltas.
//! - `updated_at` on a project never decreases and is refreshed whenever the
//!   project or something it owns changes.
//! - Storage and decode failures are logged and reported, never returned as
//!   `Err`; only `ValidationError` reaches callers.

use crate::capability::{Clock, IdGenerator, SystemClock, UuidIdGenerator};
use crate::model::project::{Project, ProjectPatch};
use crate::model::task::{Task, TaskPatch, TaskStatus};
use crate::model::timestamp::refreshed;
use crate::model::todo::TodoItem;
use crate::model::ValidationError;
use crate::normalize::normalize_projects;
use crate::store::{KeyValueBlobStore, StoreError};
use log::{error, info, warn};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors surfaced to repository callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    Validation(ValidationError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Where the collection came from on the last `load()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Nothing stored yet.
    Empty,
    /// Blob read and decoded.
    Blob,
    /// Store could not be read; continuing with an empty collection.
    StorageUnavailable,
    /// Blob was not valid JSON; continuing with an empty collection.
    Corrupt,
}

/// Outcome of one `load()` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub source: LoadSource,
    /// Projects kept after normalization.
    pub loaded: usize,
    /// Top-level elements dropped by normalization.
    pub dropped: usize,
}

/// Result of the most recent snapshot write.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PersistStatus {
    /// Nothing written yet, or last write succeeded.
    #[default]
    Clean,
    /// Last write failed; in-memory state is ahead of the blob.
    Failed(String),
}

/// Authoritative in-memory project collection.
pub struct ProjectRepository<S, C = SystemClock, I = UuidIdGenerator> {
    store: S,
    clock: C,
    ids: I,
    projects: Vec<Project>,
    persist_status: PersistStatus,
}

impl<S: KeyValueBlobStore> ProjectRepository<S> {
    /// Creates an empty repository using the system clock and UUID ids.
    ///
    /// Call [`ProjectRepository::load`] to read the stored collection.
    pub fn new(store: S) -> Self {
        Self::with_capabilities(store, SystemClock, UuidIdGenerator)
    }
}

impl<S: KeyValueBlobStore, C: Clock, I: IdGenerator> ProjectRepository<S, C, I> {
    pub fn with_capabilities(store: S, clock: C, ids: I) -> Self {
        Self {
            store,
            clock,
            ids,
            projects: Vec::new(),
            persist_status: PersistStatus::Clean,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the repository, returning its backing store.
    pub fn into_store(self) -> S {
        self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn persist_status(&self) -> &PersistStatus {
        &self.persist_status
    }

    /// All projects in insertion order.
    pub fn list(&self) -> &[Project] {
        &self.projects
    }

    pub fn get(&self, project_id: &str) -> Option<&Project> {
        self.projects.iter().find(|project| project.id == project_id)
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Replaces the in-memory collection with the normalized stored blob.
    ///
    /// Unreadable or undecodable blobs yield an empty collection.
    pub fn load(&mut self) -> LoadReport {
        let raw = match self.store.get() {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                self.projects.clear();
                info!(
                    "event=project_load module=repo status=ok source=empty key={}",
                    self.store.key()
                );
                return report(LoadSource::Empty, 0, 0);
            }
            Err(StoreError::Undecodable(err)) => {
                self.projects.clear();
                error!(
                    "event=project_load module=repo status=error error_code=decode_failed key={} bytes={} error={}",
                    self.store.key(),
                    err.as_bytes().len(),
                    err.utf8_error()
                );
                return report(LoadSource::Corrupt, 0, 0);
            }
            Err(err) => {
                self.projects.clear();
                error!(
                    "event=project_load module=repo status=error error_code=storage_unavailable key={} error={}",
                    self.store.key(),
                    err
                );
                return report(LoadSource::StorageUnavailable, 0, 0);
            }
        };

        let decoded = match serde_json::from_str::<Value>(&raw) {
            Ok(decoded) => decoded,
            Err(err) => {
                self.projects.clear();
                error!(
                    "event=project_load module=repo status=error error_code=decode_failed key={} bytes={} error={}",
                    self.store.key(),
                    raw.len(),
                    err
                );
                return report(LoadSource::Corrupt, 0, 0);
            }
        };

        let now = self.clock.timestamp();
        self.projects = normalize_projects(&decoded, &now).collect();
        let total = decoded.as_array().map_or(0, Vec::len);
        let dropped = total - self.projects.len();
        if decoded.as_array().is_none() {
            warn!("event=project_load module=repo status=skipped reason=not_a_sequence");
        }
        info!(
            "event=project_load module=repo status=ok source=blob loaded={} dropped={}",
            self.projects.len(),
            dropped
        );
        report(LoadSource::Blob, self.projects.len(), dropped)
    }

    /// Creates a project with a fresh id and identical timestamps.
    pub fn create(&mut self, name: &str, description: &str) -> RepoResult<Project> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyProjectName.into());
        }

        let projects = &self.projects;
        let id = next_unique_id(&self.ids, |id| projects.iter().any(|project| project.id == id));
        let project = Project::new(id, name, description.trim(), self.clock.timestamp());
        self.projects.push(project.clone());
        info!(
            "event=project_create module=repo status=ok project_id={}",
            project.id
        );
        self.persist();
        Ok(project)
    }

    /// Removes a project and everything it owns. Returns whether it existed.
    pub fn delete(&mut self, project_id: &str) -> bool {
        let before = self.projects.len();
        self.projects.retain(|project| project.id != project_id);
        let removed = self.projects.len() != before;
        info!(
            "event=project_delete module=repo status={} project_id={}",
            if removed { "ok" } else { "skipped" },
            project_id
        );
        self.persist();
        removed
    }

    /// Merges `patch` into a project and refreshes `updated_at`.
    ///
    /// Returns `Ok(None)` when the project does not exist.
    pub fn update(&mut self, project_id: &str, patch: ProjectPatch) -> RepoResult<Option<Project>> {
        let name = match patch.name {
            Some(name) => {
                let trimmed = name.trim();
                if trimmed.is_empty() {
                    return Err(ValidationError::EmptyProjectName.into());
                }
                Some(trimmed.to_string())
            }
            None => None,
        };

        let now = self.clock.timestamp();
        let Some(project) = find_mut(&mut self.projects, project_id) else {
            return Ok(None);
        };
        if let Some(name) = name {
            project.name = name;
        }
        if let Some(description) = patch.description {
            project.description = description;
        }
        project.updated_at = refreshed(&project.updated_at, now);
        let updated = project.clone();
        self.persist();
        Ok(Some(updated))
    }

    /// Appends a placeholder task in `status` to a project.
    pub fn add_task(&mut self, project_id: &str, status: TaskStatus) -> Option<Task> {
        let now = self.clock.timestamp();
        let project = find_mut(&mut self.projects, project_id)?;
        let id = next_unique_id(&self.ids, |id| project.task(id).is_some());
        let task = Task::new(id, status, now.clone());
        project.tasks.push(task.clone());
        project.updated_at = refreshed(&project.updated_at, now);
        self.persist();
        Some(task)
    }

    /// Merges `patch` into one task, refreshing task and project timestamps.
    pub fn update_task(
        &mut self,
        project_id: &str,
        task_id: &str,
        patch: TaskPatch,
    ) -> Option<Task> {
        let now = self.clock.timestamp();
        let project = find_mut(&mut self.projects, project_id)?;
        let task = project.tasks.iter_mut().find(|task| task.id == task_id)?;
        let previous_status = task.status;
        patch.apply_to(task);
        task.updated_at = refreshed(&task.updated_at, now.clone());
        let updated = task.clone();
        project.updated_at = refreshed(&project.updated_at, now);
        if previous_status != updated.status {
            info!(
                "event=task_move module=repo status=ok project_id={} task_id={} from={} to={}",
                project_id, task_id, previous_status, updated.status
            );
        }
        self.persist();
        Some(updated)
    }

    /// Removes one task. Returns whether it existed.
    pub fn delete_task(&mut self, project_id: &str, task_id: &str) -> bool {
        let now = self.clock.timestamp();
        let Some(project) = find_mut(&mut self.projects, project_id) else {
            return false;
        };
        let before = project.tasks.len();
        project.tasks.retain(|task| task.id != task_id);
        if project.tasks.len() == before {
            return false;
        }
        project.updated_at = refreshed(&project.updated_at, now);
        self.persist();
        true
    }

    /// Appends an unchecked todo. Blank text is rejected.
    pub fn add_todo(&mut self, project_id: &str, text: &str) -> RepoResult<Option<TodoItem>> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyTodoText.into());
        }

        let now = self.clock.timestamp();
        let Some(project) = find_mut(&mut self.projects, project_id) else {
            return Ok(None);
        };
        let id = next_unique_id(&self.ids, |id| project.todo(id).is_some());
        let todo = TodoItem::new(id, project_id, text, now.clone());
        project.todos.push(todo.clone());
        project.updated_at = refreshed(&project.updated_at, now);
        self.persist();
        Ok(Some(todo))
    }

    /// Flips a todo's completion flag.
    pub fn toggle_todo(&mut self, project_id: &str, todo_id: &str) -> Option<TodoItem> {
        let now = self.clock.timestamp();
        let project = find_mut(&mut self.projects, project_id)?;
        let todo = project.todos.iter_mut().find(|todo| todo.id == todo_id)?;
        todo.toggle();
        let toggled = todo.clone();
        project.updated_at = refreshed(&project.updated_at, now);
        self.persist();
        Some(toggled)
    }

    /// Removes one todo. Returns whether it existed.
    pub fn delete_todo(&mut self, project_id: &str, todo_id: &str) -> bool {
        let now = self.clock.timestamp();
        let Some(project) = find_mut(&mut self.projects, project_id) else {
            return false;
        };
        let before = project.todos.len();
        project.todos.retain(|todo| todo.id != todo_id);
        if project.todos.len() == before {
            return false;
        }
        project.updated_at = refreshed(&project.updated_at, now);
        self.persist();
        true
    }

    fn persist(&mut self) {
        let encoded = match serde_json::to_string(&self.projects) {
            Ok(encoded) => encoded,
            Err(err) => {
                error!("event=project_persist module=repo status=error error_code=encode_failed error={err}");
                self.persist_status = PersistStatus::Failed(err.to_string());
                return;
            }
        };

        match self.store.set(&encoded) {
            Ok(()) => {
                self.persist_status = PersistStatus::Clean;
            }
            Err(err) => {
                error!(
                    "event=project_persist module=repo status=error error_code=storage_unavailable key={} projects={} error={}",
                    self.store.key(),
                    self.projects.len(),
                    err
                );
                self.persist_status = PersistStatus::Failed(err.to_string());
            }
        }
    }
}

fn find_mut<'p>(projects: &'p mut [Project], project_id: &str) -> Option<&'p mut Project> {
    projects.iter_mut().find(|project| project.id == project_id)
}

/// Draws ids until one is free in the target scope.
fn next_unique_id(ids: &impl IdGenerator, taken: impl Fn(&str) -> bool) -> String {
    loop {
        let id = ids.next_id();
        if !taken(&id) {
            return id;
        }
    }
}

fn report(source: LoadSource, loaded: usize, dropped: usize) -> LoadReport {
    LoadReport {
        source,
        loaded,
        dropped,
    }
}
