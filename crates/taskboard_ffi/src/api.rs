//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose board operations to Dart via FRB as sync calls.
//! - Own the process-global board and its storage backend.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - The host never touches the blob; all writes go through the board.
//! - A poisoned board lock is recovered, not propagated.

use log::warn;
use std::sync::{Mutex, OnceLock, PoisonError};
use taskboard_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    BeginOutcome, BoardService, DropOutcome, KeyValueBlobStore, MemoryBlobStore, ProjectPatch,
    ProjectRepository, SqliteBlobStore, StorageConfig, Task, TaskPatch, TaskStatus, TodoItem,
};

type BoardStore = Box<dyn KeyValueBlobStore + Send>;

static BOARD: OnceLock<Mutex<BoardService<BoardStore>>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardActionResponse {
    /// Whether the operation changed something.
    pub ok: bool,
    /// Id of the created/affected record, when there is one.
    pub id: Option<String>,
    /// Human-readable message for diagnostics/UI.
    pub message: String,
}

impl BoardActionResponse {
    fn success(message: impl Into<String>, id: Option<String>) -> Self {
        Self {
            ok: true,
            id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
        }
    }
}

/// One row of the project selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardProjectItem {
    pub project_id: String,
    pub name: String,
    pub task_count: u32,
    pub todo_count: u32,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardTaskItem {
    pub task_id: String,
    pub title: String,
    pub description: String,
    /// `todo|in-progress|done`.
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardColumnItem {
    pub status: String,
    pub tasks: Vec<BoardTaskItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardTodoItem {
    pub todo_id: String,
    pub text: String,
    pub completed: bool,
}

/// Everything the board screen renders for the active project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub active_project_id: Option<String>,
    pub name: String,
    pub description: String,
    /// Always three columns in `todo, in-progress, done` order.
    pub columns: Vec<BoardColumnItem>,
    pub todos: Vec<BoardTodoItem>,
    pub completed_todos: u32,
    pub total_todos: u32,
}

#[flutter_rust_bridge::frb(sync)]
pub fn board_list_projects() -> Vec<BoardProjectItem> {
    with_board(|board| {
        let active = board.active_project_id().map(str::to_string);
        board
            .project_summaries()
            .into_iter()
            .map(|summary| BoardProjectItem {
                active: active.as_deref() == Some(summary.id.as_str()),
                project_id: summary.id,
                name: summary.name,
                task_count: clamp_count(summary.task_count),
                todo_count: clamp_count(summary.todo_count),
            })
            .collect()
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn board_snapshot() -> BoardSnapshot {
    with_board(|board| {
        let columns = board
            .columns()
            .into_iter()
            .map(|column| BoardColumnItem {
                status: column.status.to_string(),
                tasks: column.tasks.into_iter().map(to_task_item).collect(),
            })
            .collect();
        let progress = board.todo_progress();
        let (name, description, todos) = match board.active_project() {
            Some(project) => (
                project.name.clone(),
                project.description.clone(),
                project.todos.iter().map(to_todo_item).collect(),
            ),
            None => (String::new(), String::new(), Vec::new()),
        };
        BoardSnapshot {
            active_project_id: board.active_project_id().map(str::to_string),
            name,
            description,
            columns,
            todos,
            completed_todos: clamp_count(progress.completed),
            total_todos: clamp_count(progress.total),
        }
    })
}

/// Creates a project and makes it active.
#[flutter_rust_bridge::frb(sync)]
pub fn board_create_project(name: String, description: String) -> BoardActionResponse {
    with_board(|board| match board.create_project(&name, &description) {
        Ok(project) => BoardActionResponse::success("Project created.", Some(project.id)),
        Err(err) => BoardActionResponse::failure(format!("board_create_project failed: {err}")),
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn board_select_project(project_id: String) -> BoardActionResponse {
    with_board(|board| {
        if board.select_project(&project_id) {
            BoardActionResponse::success("Project selected.", Some(project_id))
        } else {
            BoardActionResponse::failure("Project not found.")
        }
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn board_delete_project(project_id: String) -> BoardActionResponse {
    with_board(|board| {
        if board.delete_project(&project_id) {
            BoardActionResponse::success("Project deleted.", Some(project_id))
        } else {
            BoardActionResponse::failure("Project not found.")
        }
    })
}

/// Updates name and/or description of the active project.
#[flutter_rust_bridge::frb(sync)]
pub fn board_update_project(
    name: Option<String>,
    description: Option<String>,
) -> BoardActionResponse {
    with_board(
        |board| match board.update_project(ProjectPatch { name, description }) {
            Ok(Some(project)) => BoardActionResponse::success("Project updated.", Some(project.id)),
            Ok(None) => BoardActionResponse::failure("No active project."),
            Err(err) => {
                BoardActionResponse::failure(format!("board_update_project failed: {err}"))
            }
        },
    )
}

/// Adds a placeholder task to one column of the active project.
#[flutter_rust_bridge::frb(sync)]
pub fn board_add_task(status: String) -> BoardActionResponse {
    let status = match status.parse::<TaskStatus>() {
        Ok(status) => status,
        Err(err) => return BoardActionResponse::failure(err.to_string()),
    };
    with_board(|board| match board.add_task(status) {
        Some(task) => BoardActionResponse::success("Task added.", Some(task.id)),
        None => BoardActionResponse::failure("No active project."),
    })
}

/// Edits title and/or description of a task in the active project.
#[flutter_rust_bridge::frb(sync)]
pub fn board_update_task(
    task_id: String,
    title: Option<String>,
    description: Option<String>,
) -> BoardActionResponse {
    let patch = TaskPatch {
        title,
        description,
        status: None,
    };
    with_board(|board| match board.update_task(&task_id, patch) {
        Some(task) => BoardActionResponse::success("Task updated.", Some(task.id)),
        None => BoardActionResponse::failure("Task not found."),
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn board_delete_task(task_id: String) -> BoardActionResponse {
    with_board(|board| {
        if board.delete_task(&task_id) {
            BoardActionResponse::success("Task deleted.", Some(task_id))
        } else {
            BoardActionResponse::failure("Task not found.")
        }
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn board_add_todo(text: String) -> BoardActionResponse {
    with_board(|board| match board.add_todo(&text) {
        Ok(Some(todo)) => BoardActionResponse::success("Todo added.", Some(todo.id)),
        Ok(None) => BoardActionResponse::failure("No active project."),
        Err(err) => BoardActionResponse::failure(format!("board_add_todo failed: {err}")),
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn board_toggle_todo(todo_id: String) -> BoardActionResponse {
    with_board(|board| match board.toggle_todo(&todo_id) {
        Some(todo) => BoardActionResponse::success(
            if todo.completed {
                "Todo completed."
            } else {
                "Todo reopened."
            },
            Some(todo.id),
        ),
        None => BoardActionResponse::failure("Todo not found."),
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn board_delete_todo(todo_id: String) -> BoardActionResponse {
    with_board(|board| {
        if board.delete_todo(&todo_id) {
            BoardActionResponse::success("Todo deleted.", Some(todo_id))
        } else {
            BoardActionResponse::failure("Todo not found.")
        }
    })
}

/// Starts a drag gesture on a task of the active project.
#[flutter_rust_bridge::frb(sync)]
pub fn board_begin_drag(task_id: String) -> BoardActionResponse {
    with_board(|board| match board.begin_drag(&task_id) {
        BeginOutcome::Started => BoardActionResponse::success("Drag started.", Some(task_id)),
        BeginOutcome::AlreadyDragging => {
            BoardActionResponse::failure("Another drag is already active.")
        }
        BeginOutcome::UnknownTask => BoardActionResponse::failure("Task not found."),
    })
}

/// Ends the active drag over `target_status`, or outside any column when
/// `None`. An unrecognized status ends the drag without changes.
#[flutter_rust_bridge::frb(sync)]
pub fn board_drop(target_status: Option<String>) -> BoardActionResponse {
    let target = match target_status.as_deref().map(str::parse::<TaskStatus>) {
        Some(Ok(status)) => Some(status),
        Some(Err(err)) => {
            warn!("event=drag_drop module=ffi status=error error_code=unknown_status");
            with_board(|board| board.cancel_drag());
            return BoardActionResponse::failure(err.to_string());
        }
        None => None,
    };
    with_board(|board| match board.drop(target) {
        DropOutcome::Moved(change) => BoardActionResponse::success(
            format!("Task moved to {}.", change.to),
            Some(change.task_id),
        ),
        DropOutcome::NotDragging => BoardActionResponse::failure("No drag in progress."),
        other => BoardActionResponse::success(format!("Drop ignored: {other:?}."), None),
    })
}

/// Abandons the active drag; returns whether one was active.
#[flutter_rust_bridge::frb(sync)]
pub fn board_cancel_drag() -> bool {
    with_board(|board| board.cancel_drag())
}

fn open_board() -> BoardService<BoardStore> {
    let config = StorageConfig::from_env();
    let store: BoardStore = match SqliteBlobStore::open(&config.db_path, config.blob_key.clone()) {
        Ok(store) => Box::new(store),
        Err(err) => {
            warn!(
                "event=board_open module=ffi status=error error_code=storage_unavailable fallback=memory error={}",
                err
            );
            Box::new(MemoryBlobStore::new(config.blob_key))
        }
    };
    let (board, _report) = BoardService::open(ProjectRepository::new(store));
    board
}

fn with_board<T>(f: impl FnOnce(&mut BoardService<BoardStore>) -> T) -> T {
    let board = BOARD.get_or_init(|| Mutex::new(open_board()));
    let mut guard = board.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut guard)
}

fn to_task_item(task: &Task) -> BoardTaskItem {
    BoardTaskItem {
        task_id: task.id.clone(),
        title: task.title.clone(),
        description: task.description.clone(),
        status: task.status.to_string(),
    }
}

fn to_todo_item(todo: &TodoItem) -> BoardTodoItem {
    BoardTodoItem {
        todo_id: todo.id.clone(),
        text: todo.text.clone(),
        completed: todo.completed,
    }
}

fn clamp_count(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
