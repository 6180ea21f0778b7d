//! Board use-case service.
//!
//! # Responsibility
//! - Track which project the board is showing.
//! - Route task/todo operations and drag gestures to that project.
//!
//! # Invariants
//! - `active_project_id`, when set, names a project present in the repository.
//! - Removing or switching away from the active project ends any drag.
//! - With no active project, scoped operations are no-ops.

use crate::capability::{Clock, IdGenerator, SystemClock, UuidIdGenerator};
use crate::model::project::{Project, ProjectId, ProjectPatch, ProjectSummary, TodoProgress};
use crate::model::task::{Task, TaskPatch, TaskStatus};
use crate::model::todo::TodoItem;
use crate::repo::project_repo::{LoadReport, ProjectRepository, RepoResult};
use crate::service::drag_session::{BeginOutcome, DropOutcome, TaskStatusController};
use crate::store::KeyValueBlobStore;

/// One workflow column of the active project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardColumn<'a> {
    pub status: TaskStatus,
    pub tasks: Vec<&'a Task>,
}

impl BoardColumn<'_> {
    pub fn count(&self) -> usize {
        self.tasks.len()
    }
}

/// Facade the presentation layer calls into.
pub struct BoardService<S, C = SystemClock, I = UuidIdGenerator> {
    repo: ProjectRepository<S, C, I>,
    active_project_id: Option<ProjectId>,
    controller: TaskStatusController,
}

impl<S: KeyValueBlobStore, C: Clock, I: IdGenerator> BoardService<S, C, I> {
    /// Wraps `repo` as-is, selecting its first project if any.
    pub fn new(repo: ProjectRepository<S, C, I>) -> Self {
        let active_project_id = repo.list().first().map(|project| project.id.clone());
        Self {
            repo,
            active_project_id,
            controller: TaskStatusController::new(),
        }
    }

    /// Loads the stored collection and selects the first project.
    pub fn open(mut repo: ProjectRepository<S, C, I>) -> (Self, LoadReport) {
        let report = repo.load();
        (Self::new(repo), report)
    }

    pub fn repository(&self) -> &ProjectRepository<S, C, I> {
        &self.repo
    }

    pub fn active_project_id(&self) -> Option<&str> {
        self.active_project_id.as_deref()
    }

    pub fn active_project(&self) -> Option<&Project> {
        self.repo.get(self.active_project_id.as_deref()?)
    }

    pub fn controller(&self) -> &TaskStatusController {
        &self.controller
    }

    /// Switches the board to `project_id`. Unknown ids leave the selection.
    pub fn select_project(&mut self, project_id: &str) -> bool {
        if self.repo.get(project_id).is_none() {
            return false;
        }
        if self.active_project_id.as_deref() != Some(project_id) {
            self.controller.cancel();
            self.active_project_id = Some(project_id.to_string());
        }
        true
    }

    pub fn project_summaries(&self) -> Vec<ProjectSummary> {
        self.repo.list().iter().map(Project::summary).collect()
    }

    /// Creates a project and makes it active.
    pub fn create_project(&mut self, name: &str, description: &str) -> RepoResult<Project> {
        let project = self.repo.create(name, description)?;
        self.controller.cancel();
        self.active_project_id = Some(project.id.clone());
        Ok(project)
    }

    /// Deletes a project; the first remaining project becomes active if the
    /// deleted one was.
    pub fn delete_project(&mut self, project_id: &str) -> bool {
        let removed = self.repo.delete(project_id);
        if self.active_project_id.as_deref() == Some(project_id) {
            self.controller.cancel();
            self.active_project_id = self.repo.list().first().map(|project| project.id.clone());
        }
        removed
    }

    pub fn update_project(&mut self, patch: ProjectPatch) -> RepoResult<Option<Project>> {
        match self.active_project_id.clone() {
            Some(project_id) => self.repo.update(&project_id, patch),
            None => Ok(None),
        }
    }

    pub fn add_task(&mut self, status: TaskStatus) -> Option<Task> {
        let project_id = self.active_project_id.clone()?;
        self.repo.add_task(&project_id, status)
    }

    pub fn update_task(&mut self, task_id: &str, patch: TaskPatch) -> Option<Task> {
        let project_id = self.active_project_id.clone()?;
        self.repo.update_task(&project_id, task_id, patch)
    }

    pub fn delete_task(&mut self, task_id: &str) -> bool {
        match self.active_project_id.clone() {
            Some(project_id) => self.repo.delete_task(&project_id, task_id),
            None => false,
        }
    }

    pub fn add_todo(&mut self, text: &str) -> RepoResult<Option<TodoItem>> {
        match self.active_project_id.clone() {
            Some(project_id) => self.repo.add_todo(&project_id, text),
            None => Ok(None),
        }
    }

    pub fn toggle_todo(&mut self, todo_id: &str) -> Option<TodoItem> {
        let project_id = self.active_project_id.clone()?;
        self.repo.toggle_todo(&project_id, todo_id)
    }

    pub fn delete_todo(&mut self, todo_id: &str) -> bool {
        match self.active_project_id.clone() {
            Some(project_id) => self.repo.delete_todo(&project_id, todo_id),
            None => false,
        }
    }

    /// Starts dragging a task of the active project.
    pub fn begin_drag(&mut self, task_id: &str) -> BeginOutcome {
        match self.active_project_id.as_deref() {
            Some(project_id) => self.controller.begin_drag(&self.repo, project_id, task_id),
            None => BeginOutcome::UnknownTask,
        }
    }

    /// Drops the dragged task onto `target` (or outside any column).
    pub fn drop(&mut self, target: Option<TaskStatus>) -> DropOutcome {
        self.controller.drop(&mut self.repo, target)
    }

    pub fn cancel_drag(&mut self) -> bool {
        self.controller.cancel()
    }

    /// Tasks of the active project in one column, in stored order.
    pub fn column(&self, status: TaskStatus) -> Vec<&Task> {
        self.active_project()
            .map(|project| project.tasks_with_status(status).collect())
            .unwrap_or_default()
    }

    /// All three columns in display order.
    pub fn columns(&self) -> Vec<BoardColumn<'_>> {
        TaskStatus::ALL
            .into_iter()
            .map(|status| BoardColumn {
                status,
                tasks: self.column(status),
            })
            .collect()
    }

    pub fn todo_progress(&self) -> TodoProgress {
        self.active_project()
            .map(Project::todo_progress)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::BoardService;
    use crate::capability::{ManualClock, SequentialIdGenerator};
    use crate::model::task::TaskStatus;
    use crate::repo::project_repo::ProjectRepository;
    use crate::service::drag_session::BeginOutcome;
    use crate::store::MemoryBlobStore;
    use chrono::{TimeZone, Utc};

    fn service() -> BoardService<MemoryBlobStore, ManualClock, SequentialIdGenerator> {
        let repo = ProjectRepository::with_capabilities(
            MemoryBlobStore::new("projects"),
            ManualClock::new(Utc.with_ymd_and_hms(2026, 6, 1, 10, 0, 0).unwrap()),
            SequentialIdGenerator::new("id"),
        );
        BoardService::new(repo)
    }

    #[test]
    fn scoped_operations_without_active_project_are_noops() {
        let mut board = service();
        assert!(board.add_task(TaskStatus::Todo).is_none());
        assert_eq!(board.add_todo("x").unwrap(), None);
        assert_eq!(board.begin_drag("id-1"), BeginOutcome::UnknownTask);
        assert!(board.columns().iter().all(|column| column.count() == 0));
    }

    #[test]
    fn switching_project_cancels_drag() {
        let mut board = service();
        let first = board.create_project("First", "").unwrap();
        let task = board.add_task(TaskStatus::Todo).unwrap();
        board.create_project("Second", "").unwrap();
        assert!(board.select_project(&first.id));
        assert_eq!(board.begin_drag(&task.id), BeginOutcome::Started);

        let second_id = board.project_summaries()[1].id.clone();
        assert!(board.select_project(&second_id));
        assert!(!board.controller().session().is_dragging());
        assert!(!board.select_project("missing"));
        assert_eq!(board.active_project_id(), Some(second_id.as_str()));
    }

    #[test]
    fn columns_group_tasks_by_status() {
        let mut board = service();
        board.create_project("Launch", "").unwrap();
        board.add_task(TaskStatus::Todo);
        board.add_task(TaskStatus::Done);
        board.add_task(TaskStatus::Todo);
        let counts = board
            .columns()
            .iter()
            .map(|column| (column.status, column.count()))
            .collect::<Vec<_>>();
        assert_eq!(
            counts,
            vec![
                (TaskStatus::Todo, 2),
                (TaskStatus::InProgress, 0),
                (TaskStatus::Done, 1)
            ]
        );
    }
}
