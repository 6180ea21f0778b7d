//! CLI probe for the board core.
//!
//! # Responsibility
//! - Verify `taskboard_core` linkage without a host UI.
//! - Print a read-only summary of the stored collection.
//!
//! Usage: `taskboard_cli [db_path]` (defaults to `TASKBOARD_DB_PATH` or the
//! temp directory).

use std::process::ExitCode;
use taskboard_core::{ProjectRepository, SqliteBlobStore, StorageConfig, TaskStatus};

fn main() -> ExitCode {
    println!("taskboard_core ping={}", taskboard_core::ping());
    println!("taskboard_core version={}", taskboard_core::core_version());

    let mut config = StorageConfig::from_env();
    if let Some(path) = std::env::args().nth(1) {
        config.db_path = path.into();
    }

    let store = match SqliteBlobStore::open(&config.db_path, config.blob_key.as_str()) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("failed to open {}: {err}", config.db_path.display());
            return ExitCode::FAILURE;
        }
    };

    let mut repo = ProjectRepository::new(store);
    let report = repo.load();
    println!(
        "source={:?} loaded={} dropped={}",
        report.source, report.loaded, report.dropped
    );
    for project in repo.list() {
        let counts = TaskStatus::ALL
            .iter()
            .map(|status| format!("{status}={}", project.tasks_with_status(*status).count()))
            .collect::<Vec<_>>()
            .join(" ");
        let progress = project.todo_progress();
        println!(
            "{} {:?} {} todos={}/{}",
            project.id, project.name, counts, progress.completed, progress.total
        );
    }
    ExitCode::SUCCESS
}
