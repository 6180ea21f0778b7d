mod common;

use common::{repo, tick, BLOB_KEY};
use taskboard_core::model::timestamp::compare_timestamps;
use taskboard_core::{
    BeginOutcome, BoardService, DropOutcome, MemoryBlobStore, ProjectRepository, TaskStatus,
    TaskStatusController,
};

#[test]
fn launch_scenario_end_to_end() {
    let mut board = BoardService::new(repo());

    let project = board.create_project("Launch", "").unwrap();
    assert_eq!(board.repository().len(), 1);
    assert_eq!(project.created_at, project.updated_at);
    assert!(project.tasks.is_empty() && project.todos.is_empty());

    let task = board.add_task(TaskStatus::Todo).unwrap();
    assert_eq!(board.column(TaskStatus::Todo), vec![&task]);

    let before = board.active_project().unwrap().updated_at.clone();
    tick(board.repository());
    assert_eq!(board.begin_drag(&task.id), BeginOutcome::Started);
    assert!(matches!(board.drop(Some(TaskStatus::Done)), DropOutcome::Moved(_)));

    let after = board.active_project().unwrap();
    assert_eq!(after.task(&task.id).unwrap().status, TaskStatus::Done);
    assert!(compare_timestamps(&after.updated_at, &before).is_gt());

    assert!(board.delete_project(&project.id));
    assert!(board.repository().list().is_empty());
    assert_eq!(board.active_project_id(), None);
    assert_eq!(board.repository().store().value(), Some("[]"));
}

#[test]
fn drop_onto_new_column_bumps_task_and_project() {
    let mut repo = repo();
    let project = repo.create("Launch", "").unwrap();
    let task = repo.add_task(&project.id, TaskStatus::Todo).unwrap();
    let project_before = repo.get(&project.id).unwrap().updated_at.clone();
    tick(&repo);

    let mut controller = TaskStatusController::new();
    assert_eq!(controller.begin_drag(&repo, &project.id, &task.id), BeginOutcome::Started);
    let outcome = controller.drop(&mut repo, Some(TaskStatus::InProgress));
    match outcome {
        DropOutcome::Moved(change) => {
            assert_eq!(change.from, TaskStatus::Todo);
            assert_eq!(change.to, TaskStatus::InProgress);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    let stored = repo.get(&project.id).unwrap();
    let moved = stored.task(&task.id).unwrap();
    assert_eq!(moved.status, TaskStatus::InProgress);
    assert!(compare_timestamps(&moved.updated_at, &task.updated_at).is_gt());
    assert!(compare_timestamps(&stored.updated_at, &project_before).is_gt());
    assert!(!controller.session().is_dragging());
}

#[test]
fn drop_onto_same_column_changes_nothing() {
    let mut repo = repo();
    let project = repo.create("Launch", "").unwrap();
    repo.add_task(&project.id, TaskStatus::Todo).unwrap();
    let snapshot = repo.get(&project.id).unwrap().clone();
    let blob = repo.store().value().unwrap().to_string();
    tick(&repo);

    let mut controller = TaskStatusController::new();
    let task_id = snapshot.tasks[0].id.clone();
    controller.begin_drag(&repo, &project.id, &task_id);
    assert_eq!(controller.drop(&mut repo, Some(TaskStatus::Todo)), DropOutcome::SameColumn);

    controller.begin_drag(&repo, &project.id, &task_id);
    assert_eq!(controller.drop(&mut repo, None), DropOutcome::NoTarget);

    controller.begin_drag(&repo, &project.id, &task_id);
    assert!(controller.cancel());

    assert_eq!(repo.get(&project.id), Some(&snapshot));
    assert_eq!(repo.store().value(), Some(blob.as_str()));
}

#[test]
fn begin_drag_on_unknown_task_stays_idle() {
    let mut repo = repo();
    let project = repo.create("Launch", "").unwrap();
    let mut controller = TaskStatusController::new();

    assert_eq!(controller.begin_drag(&repo, &project.id, "ghost"), BeginOutcome::UnknownTask);
    assert_eq!(controller.begin_drag(&repo, "ghost", "ghost"), BeginOutcome::UnknownTask);
    assert_eq!(controller.drop(&mut repo, Some(TaskStatus::Done)), DropOutcome::NotDragging);
}

#[test]
fn drop_bumps_project_even_when_clock_stands_still() {
    let mut repo = repo();
    let project = repo.create("Launch", "").unwrap();
    let task = repo.add_task(&project.id, TaskStatus::Todo).unwrap();
    let before = repo.get(&project.id).unwrap().updated_at.clone();

    let mut controller = TaskStatusController::new();
    controller.begin_drag(&repo, &project.id, &task.id);
    assert!(matches!(
        controller.drop(&mut repo, Some(TaskStatus::Done)),
        DropOutcome::Moved(_)
    ));

    let after = repo.get(&project.id).unwrap();
    assert!(compare_timestamps(&before, &project.updated_at).is_gt());
    assert!(compare_timestamps(&after.updated_at, &before).is_gt());
    let moved = after.task(&task.id).unwrap();
    assert!(compare_timestamps(&moved.updated_at, &task.updated_at).is_gt());
}

#[test]
fn system_clock_drag_always_bumps_project() {
    for _ in 0..50 {
        let mut repo = ProjectRepository::new(MemoryBlobStore::new(BLOB_KEY));
        let project = repo.create("Launch", "").unwrap();
        let task = repo.add_task(&project.id, TaskStatus::Todo).unwrap();
        let before = repo.get(&project.id).unwrap().updated_at.clone();

        let mut controller = TaskStatusController::new();
        controller.begin_drag(&repo, &project.id, &task.id);
        controller.drop(&mut repo, Some(TaskStatus::Done));

        let after = &repo.get(&project.id).unwrap().updated_at;
        assert!(compare_timestamps(after, &before).is_gt());
    }
}

#[test]
fn concurrent_begin_is_ignored() {
    let mut board = BoardService::new(repo());
    board.create_project("Launch", "").unwrap();
    let first = board.add_task(TaskStatus::Todo).unwrap();
    let second = board.add_task(TaskStatus::Todo).unwrap();

    assert_eq!(board.begin_drag(&first.id), BeginOutcome::Started);
    assert_eq!(board.begin_drag(&second.id), BeginOutcome::AlreadyDragging);
    board.drop(Some(TaskStatus::Done));

    let ids = |status: TaskStatus| {
        board
            .column(status)
            .iter()
            .map(|task| task.id.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(ids(TaskStatus::Done), vec![first.id.clone()]);
    assert_eq!(ids(TaskStatus::Todo), vec![second.id.clone()]);
}

#[test]
fn task_deleted_mid_drag_resolves_to_noop() {
    let mut board = BoardService::new(repo());
    board.create_project("Launch", "").unwrap();
    let task = board.add_task(TaskStatus::Todo).unwrap();

    board.begin_drag(&task.id);
    assert!(board.delete_task(&task.id));
    assert_eq!(board.drop(Some(TaskStatus::Done)), DropOutcome::TaskGone);
    assert!(board.column(TaskStatus::Done).is_empty());
}

#[test]
fn deleting_active_project_selects_first_remaining() {
    let mut board = BoardService::new(repo());
    let first = board.create_project("First", "").unwrap();
    let second = board.create_project("Second", "").unwrap();
    assert_eq!(board.active_project_id(), Some(second.id.as_str()));

    let task = board.add_task(TaskStatus::Todo).unwrap();
    board.begin_drag(&task.id);
    board.delete_project(&second.id);

    assert_eq!(board.active_project_id(), Some(first.id.as_str()));
    assert!(!board.controller().session().is_dragging());
}

#[test]
fn open_selects_first_stored_project() {
    let blob = serde_json::json!([
        {
            "id": "p1",
            "name": "One",
            "todos": [{"id": "d1", "text": "a", "completed": true}, {"id": "d2", "text": "b"}]
        },
        {"id": "p2", "name": "Two"}
    ])
    .to_string();
    let store = MemoryBlobStore::with_value(BLOB_KEY, blob);
    let (board, report) = BoardService::open(common::repo_over(store));

    assert_eq!(report.loaded, 2);
    assert_eq!(board.active_project_id(), Some("p1"));
    let progress = board.todo_progress();
    assert_eq!((progress.completed, progress.total), (1, 2));
    let summaries = board.project_summaries();
    assert_eq!(summaries[1].name, "Two");
    assert_eq!(summaries[0].todo_count, 2);
}
