use super::{KeyValueBlobStore, StoreResult};

/// In-process blob store; contents vanish with the value.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    key: String,
    value: Option<String>,
}

impl MemoryBlobStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
        }
    }

    /// Creates a store that already holds `value`.
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
        }
    }

    /// Current raw contents, for inspection.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl KeyValueBlobStore for MemoryBlobStore {
    fn key(&self) -> &str {
        &self.key
    }

    fn get(&self) -> StoreResult<Option<String>> {
        Ok(self.value.clone())
    }

    fn set(&mut self, value: &str) -> StoreResult<()> {
        self.value = Some(value.to_string());
        Ok(())
    }
}
