//! Storage location configuration.
//!
//! Hosts usually pass explicit values; `from_env` covers CLI and test runs.

use std::path::PathBuf;

/// Blob name used by the host key-value storage.
pub const DEFAULT_BLOB_KEY: &str = "project-management-data";
pub const DEFAULT_DB_FILE_NAME: &str = "taskboard.sqlite3";
pub const DB_PATH_ENV: &str = "TASKBOARD_DB_PATH";
pub const BLOB_KEY_ENV: &str = "TASKBOARD_BLOB_KEY";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// SQLite database file backing the blob store.
    pub db_path: PathBuf,
    /// Name of the project collection blob.
    pub blob_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            blob_key: DEFAULT_BLOB_KEY.to_string(),
        }
    }
}

impl StorageConfig {
    /// Reads `TASKBOARD_DB_PATH` / `TASKBOARD_BLOB_KEY`, ignoring blank values.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_blank = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        Self {
            db_path: non_blank(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            blob_key: non_blank(BLOB_KEY_ENV).unwrap_or(defaults.blob_key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{StorageConfig, BLOB_KEY_ENV, DB_PATH_ENV, DEFAULT_BLOB_KEY};
    use std::path::PathBuf;

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = StorageConfig::from_lookup(|_| Some("   ".to_string()));
        assert_eq!(config, StorageConfig::default());
        assert_eq!(config.blob_key, DEFAULT_BLOB_KEY);
    }

    #[test]
    fn explicit_values_are_trimmed() {
        let config = StorageConfig::from_lookup(|name| match name {
            DB_PATH_ENV => Some(" /var/lib/board.db ".to_string()),
            BLOB_KEY_ENV => Some("boards".to_string()),
            _ => None,
        });
        assert_eq!(config.db_path, PathBuf::from("/var/lib/board.db"));
        assert_eq!(config.blob_key, "boards");
    }
}
