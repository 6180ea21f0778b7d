//! Core domain logic for the local-first project board.
//! This crate is the single source of truth for business invariants.

pub mod capability;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod repo;
pub mod service;
pub mod store;

pub use capability::{
    Clock, IdGenerator, ManualClock, SequentialIdGenerator, SystemClock, UuidIdGenerator,
};
pub use config::StorageConfig;
pub use logging::{default_log_level, init_logging, logging_status, LogSettings, LoggingError};
pub use model::project::{Project, ProjectId, ProjectPatch, ProjectSummary, TodoProgress};
pub use model::task::{Task, TaskId, TaskPatch, TaskStatus, UnknownStatus};
pub use model::todo::{TodoId, TodoItem};
pub use model::ValidationError;
pub use normalize::normalize_projects;
pub use repo::project_repo::{
    LoadReport, LoadSource, PersistStatus, ProjectRepository, RepoError, RepoResult,
};
pub use service::board_service::{BoardColumn, BoardService};
pub use service::drag_session::{
    BeginOutcome, DragSession, DragState, DropOutcome, StatusChange, TaskStatusController,
};
pub use store::{
    FileBlobStore, KeyValueBlobStore, MemoryBlobStore, SqliteBlobStore, StoreError, StoreResult,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
