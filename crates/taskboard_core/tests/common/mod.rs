#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use taskboard_core::{
    KeyValueBlobStore, ManualClock, MemoryBlobStore, ProjectRepository, SequentialIdGenerator,
    StoreError, StoreResult,
};

pub const BLOB_KEY: &str = "project-management-data";

pub type TestRepo<S = MemoryBlobStore> = ProjectRepository<S, ManualClock, SequentialIdGenerator>;

pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap()
}

pub fn repo_over<S: KeyValueBlobStore>(store: S) -> TestRepo<S> {
    ProjectRepository::with_capabilities(
        store,
        ManualClock::new(start()),
        SequentialIdGenerator::new("id"),
    )
}

pub fn repo() -> TestRepo {
    repo_over(MemoryBlobStore::new(BLOB_KEY))
}

/// Advances the repository clock by one second.
pub fn tick<S: KeyValueBlobStore>(repo: &TestRepo<S>) {
    repo.clock().advance(Duration::seconds(1));
}

/// Raw blob currently persisted by a memory-backed repository.
pub fn persisted(repo: &TestRepo) -> serde_json::Value {
    serde_json::from_str(repo.store().value().expect("blob should be written")).unwrap()
}

/// Store whose substrate refuses every access.
#[derive(Debug, Default)]
pub struct DeniedStore {
    pub writes_attempted: usize,
}

impl KeyValueBlobStore for DeniedStore {
    fn key(&self) -> &str {
        BLOB_KEY
    }

    fn get(&self) -> StoreResult<Option<String>> {
        Err(StoreError::Unavailable("access denied".to_string()))
    }

    fn set(&mut self, _value: &str) -> StoreResult<()> {
        self.writes_attempted += 1;
        Err(StoreError::Unavailable("quota exceeded".to_string()))
    }
}
