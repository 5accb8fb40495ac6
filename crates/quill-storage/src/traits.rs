//! Storage trait definitions.

use crate::StorageResult;

/// Trait for persisted client storage backends.
///
/// The local-storage analog for non-browser contexts: a flat string
/// key-value map surviving process restarts (or not, for the in-memory
/// backend).
pub trait SessionStorage: Send + Sync {
    /// Store a value
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Retrieve a value
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Delete a value, returning whether it existed
    fn delete(&self, key: &str) -> StorageResult<bool>;

    /// Check if a key exists
    fn has(&self, key: &str) -> StorageResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}
