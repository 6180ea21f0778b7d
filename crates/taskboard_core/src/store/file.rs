//! Blob store over a single JSON file.
//!
//! Writes go to a sibling temp file first and are renamed into place, so a
//! crash mid-write leaves the previous snapshot intact.

use super::{KeyValueBlobStore, StoreError, StoreResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct FileBlobStore {
    key: String,
    path: PathBuf,
}

impl FileBlobStore {
    /// Stores the blob at `<dir>/<key>.json`.
    pub fn new(dir: impl AsRef<Path>, key: impl Into<String>) -> StoreResult<Self> {
        let key = key.into();
        if key.trim().is_empty() || key.contains(['/', '\\']) {
            return Err(StoreError::Unavailable(format!(
                "invalid blob key `{key}` for file storage"
            )));
        }
        let path = dir.as_ref().join(format!("{key}.json"));
        Ok(Self { key, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueBlobStore for FileBlobStore {
    fn key(&self) -> &str {
        &self.key
    }

    fn get(&self) -> StoreResult<Option<String>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(String::from_utf8(bytes)?)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, value: &str) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, value)?;
        fs::rename(&staging, &self.path)?;
        Ok(())
    }
}
