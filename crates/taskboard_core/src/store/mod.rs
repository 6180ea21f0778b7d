//! Raw persistence of one named serialized blob.
//!
//! # Responsibility
//! - Define the `KeyValueBlobStore` contract used by the project repository.
//! - Provide memory, file and SQLite backends.
//!
//! # Invariants
//! - Stores never interpret blob contents.
//! - Every substrate fault is returned as `StoreError`; stores never panic.

mod file;
mod memory;
mod sqlite;

pub use file::FileBlobStore;
pub use memory::MemoryBlobStore;
pub use sqlite::SqliteBlobStore;

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::string::FromUtf8Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage substrate could not be read or written.
#[derive(Debug)]
pub enum StoreError {
    /// Substrate disabled, denied or otherwise refusing access.
    Unavailable(String),
    Io(std::io::Error),
    Db(DbError),
    /// Blob bytes are not UTF-8 text.
    Undecodable(FromUtf8Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(reason) => write!(f, "storage unavailable: {reason}"),
            Self::Io(err) => write!(f, "storage io failure: {err}"),
            Self::Db(err) => write!(f, "storage database failure: {err}"),
            Self::Undecodable(err) => write!(f, "stored blob is not utf-8: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Unavailable(_) => None,
            Self::Io(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Undecodable(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<FromUtf8Error> for StoreError {
    fn from(value: FromUtf8Error) -> Self {
        Self::Undecodable(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Get/set of one named serialized blob.
pub trait KeyValueBlobStore {
    /// Blob name inside the substrate.
    fn key(&self) -> &str;

    /// Reads the blob; `Ok(None)` when nothing has been stored yet.
    fn get(&self) -> StoreResult<Option<String>>;

    /// Overwrites the blob with `value`.
    fn set(&mut self, value: &str) -> StoreResult<()>;
}

impl<S: KeyValueBlobStore + ?Sized> KeyValueBlobStore for Box<S> {
    fn key(&self) -> &str {
        (**self).key()
    }

    fn get(&self) -> StoreResult<Option<String>> {
        (**self).get()
    }

    fn set(&mut self, value: &str) -> StoreResult<()> {
        (**self).set(value)
    }
}
