//! Drag gesture state machine and task status controller.
//!
//! # Responsibility
//! - Track the single task in flight between drag start and drop/cancel.
//! - Turn a drop into at most one status-change instruction.
//!
//! # Invariants
//! - At most one session is active; a second `begin_drag` is ignored.
//! - Every `drop`/`cancel` returns the session to `Idle`.
//! - A drop with no target, or onto the task's current column, changes
//!   nothing and never reaches the repository.
//! - Session state is never persisted.

use crate::capability::{Clock, IdGenerator};
use crate::model::project::{Project, ProjectId};
use crate::model::task::{TaskId, TaskPatch, TaskStatus};
use crate::repo::project_repo::ProjectRepository;
use crate::store::KeyValueBlobStore;
use log::{debug, info};

/// Drag state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        project_id: ProjectId,
        task_id: TaskId,
    },
}

/// Instruction produced by a resolved drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub project_id: ProjectId,
    pub task_id: TaskId,
    pub from: TaskStatus,
    pub to: TaskStatus,
}

/// Why `begin_drag` did or did not start a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeginOutcome {
    Started,
    /// Another session is already active and keeps priority.
    AlreadyDragging,
    /// Task id does not resolve inside the given project.
    UnknownTask,
}

/// How a drop was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// No session was active.
    NotDragging,
    /// Released outside any column.
    NoTarget,
    /// Dropped onto the column the task already occupies.
    SameColumn,
    /// The dragged task disappeared while in flight.
    TaskGone,
    /// Task moved to another column.
    Moved(StatusChange),
}

/// Pure drag state machine. Knows nothing about persistence.
#[derive(Debug, Default)]
pub struct DragSession {
    state: DragState,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Task currently in flight, if any.
    pub fn dragged_task(&self) -> Option<&str> {
        match &self.state {
            DragState::Idle => None,
            DragState::Dragging { task_id, .. } => Some(task_id),
        }
    }

    /// `Idle -> Dragging` when `task_id` exists in `project`.
    pub fn begin(&mut self, project: &Project, task_id: &str) -> BeginOutcome {
        if self.is_dragging() {
            return BeginOutcome::AlreadyDragging;
        }
        if project.task(task_id).is_none() {
            return BeginOutcome::UnknownTask;
        }
        self.state = DragState::Dragging {
            project_id: project.id.clone(),
            task_id: task_id.to_string(),
        };
        BeginOutcome::Started
    }

    /// `Dragging -> Idle`, resolving the drop against current state.
    ///
    /// `lookup` maps a project id to the project as it is now, or `None` if
    /// it no longer exists.
    pub fn resolve_drop<'p>(
        &mut self,
        lookup: impl FnOnce(&str) -> Option<&'p Project>,
        target: Option<TaskStatus>,
    ) -> DropOutcome {
        let DragState::Dragging {
            project_id,
            task_id,
        } = std::mem::take(&mut self.state)
        else {
            return DropOutcome::NotDragging;
        };

        let Some(target) = target else {
            return DropOutcome::NoTarget;
        };
        let Some(task) = lookup(&project_id).and_then(|project| project.task(&task_id)) else {
            return DropOutcome::TaskGone;
        };
        if task.status == target {
            return DropOutcome::SameColumn;
        }
        DropOutcome::Moved(StatusChange {
            from: task.status,
            to: target,
            project_id,
            task_id,
        })
    }

    /// `Dragging -> Idle` without any change. Returns whether a session ended.
    pub fn cancel(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        self.state = DragState::Idle;
        was_dragging
    }
}

/// Binds a drag session to the repository that applies its instructions.
#[derive(Debug, Default)]
pub struct TaskStatusController {
    session: DragSession,
}

impl TaskStatusController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &DragSession {
        &self.session
    }

    /// Starts dragging `task_id` of `project_id`.
    pub fn begin_drag<S, C, I>(
        &mut self,
        repo: &ProjectRepository<S, C, I>,
        project_id: &str,
        task_id: &str,
    ) -> BeginOutcome
    where
        S: KeyValueBlobStore,
        C: Clock,
        I: IdGenerator,
    {
        let outcome = match repo.get(project_id) {
            Some(project) => self.session.begin(project, task_id),
            None => BeginOutcome::UnknownTask,
        };
        debug!(
            "event=drag_begin module=drag status={:?} project_id={} task_id={}",
            outcome, project_id, task_id
        );
        outcome
    }

    /// Resolves the active drag and applies at most one status update.
    pub fn drop<S, C, I>(
        &mut self,
        repo: &mut ProjectRepository<S, C, I>,
        target: Option<TaskStatus>,
    ) -> DropOutcome
    where
        S: KeyValueBlobStore,
        C: Clock,
        I: IdGenerator,
    {
        let outcome = self.session.resolve_drop(|id| repo.get(id), target);
        match &outcome {
            DropOutcome::Moved(change) => {
                repo.update_task(
                    &change.project_id,
                    &change.task_id,
                    TaskPatch::status(change.to),
                );
                info!(
                    "event=drag_drop module=drag status=ok project_id={} task_id={} from={} to={}",
                    change.project_id, change.task_id, change.from, change.to
                );
            }
            other => {
                debug!("event=drag_drop module=drag status=skipped outcome={other:?}");
            }
        }
        outcome
    }

    /// Abandons the active drag, if any.
    pub fn cancel(&mut self) -> bool {
        let cancelled = self.session.cancel();
        if cancelled {
            debug!("event=drag_cancel module=drag status=ok");
        }
        cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::{BeginOutcome, DragSession, DragState, DropOutcome};
    use crate::model::project::Project;
    use crate::model::task::{Task, TaskStatus};

    const NOW: &str = "2026-02-01T00:00:00.000Z";

    fn board() -> Project {
        let mut project = Project::new("p1".into(), "Launch", "", NOW.into());
        project.tasks.push(Task::new("t1".into(), TaskStatus::Todo, NOW.into()));
        project.tasks.push(Task::new("t2".into(), TaskStatus::Done, NOW.into()));
        project
    }

    #[test]
    fn begin_requires_existing_task() {
        let project = board();
        let mut session = DragSession::new();
        assert_eq!(session.begin(&project, "nope"), BeginOutcome::UnknownTask);
        assert_eq!(session.state(), &DragState::Idle);
    }

    #[test]
    fn second_begin_keeps_first_session() {
        let project = board();
        let mut session = DragSession::new();
        assert_eq!(session.begin(&project, "t1"), BeginOutcome::Started);
        assert_eq!(session.begin(&project, "t2"), BeginOutcome::AlreadyDragging);
        assert_eq!(session.dragged_task(), Some("t1"));
    }

    #[test]
    fn drop_onto_other_column_yields_change() {
        let project = board();
        let mut session = DragSession::new();
        session.begin(&project, "t1");
        let outcome = session.resolve_drop(|_| Some(&project), Some(TaskStatus::InProgress));
        match outcome {
            DropOutcome::Moved(change) => {
                assert_eq!(change.task_id, "t1");
                assert_eq!(change.from, TaskStatus::Todo);
                assert_eq!(change.to, TaskStatus::InProgress);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(!session.is_dragging());
    }

    #[test]
    fn drop_without_change_returns_to_idle() {
        let project = board();
        let mut session = DragSession::new();

        session.begin(&project, "t1");
        assert_eq!(
            session.resolve_drop(|_| Some(&project), Some(TaskStatus::Todo)),
            DropOutcome::SameColumn
        );
        assert!(!session.is_dragging());

        session.begin(&project, "t1");
        assert_eq!(session.resolve_drop(|_| Some(&project), None), DropOutcome::NoTarget);

        session.begin(&project, "t1");
        assert_eq!(
            session.resolve_drop(|_| None, Some(TaskStatus::Done)),
            DropOutcome::TaskGone
        );

        assert_eq!(
            session.resolve_drop(|_| Some(&project), Some(TaskStatus::Done)),
            DropOutcome::NotDragging
        );
    }

    #[test]
    fn cancel_reports_whether_a_session_ended() {
        let project = board();
        let mut session = DragSession::new();
        assert!(!session.cancel());
        session.begin(&project, "t2");
        assert!(session.cancel());
        assert_eq!(session.state(), &DragState::Idle);
    }
}
