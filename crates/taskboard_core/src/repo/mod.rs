//! Repository layer: the authoritative in-memory project collection.
//!
//! # Responsibility
//! - Own every project, task and todo mutation.
//! - Persist full snapshots through a `KeyValueBlobStore`.
//!
//! # Invariants
//! - The repository is the only writer of the collection and of the blob.
//! - Unknown ids are no-ops, never errors.

pub mod project_repo;
