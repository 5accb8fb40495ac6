//! Persisted client storage for Quill.
//!
//! This crate provides the storage capability behind the client's
//! session persistence:
//! - A `SessionStorage` trait (`get`/`set`/`delete`/`has`)
//! - A file-backed implementation (`~/.quill/session.json`)
//! - An in-memory implementation for tests and storage-less contexts
//! - A `CredentialStore` owning the persisted `token`/`user` pair

mod file;
mod keys;
mod memory;
mod records;
mod traits;

pub use file::FileStorage;
pub use keys::StorageKeys;
pub use memory::MemoryStorage;
pub use records::CredentialStore;
pub use traits::SessionStorage;

use quill_config::Paths;
use thiserror::Error;
use tracing::warn;

/// Error type for storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Encoding/decoding error
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Open the storage backend for this environment.
///
/// File-backed under the client's base directory when available,
/// falling back to an in-memory store (nothing survives the process)
/// when the session file cannot be opened.
pub fn open_storage(paths: &Paths) -> Box<dyn SessionStorage> {
    match FileStorage::open(paths.session_file()) {
        Ok(storage) => Box::new(storage),
        Err(error) => {
            warn!(%error, "falling back to in-memory session storage");
            Box::new(MemoryStorage::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_open_storage_prefers_file_backend() {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());

        let storage = open_storage(&paths);
        storage.set("token", "abc").unwrap();

        // Backed by the session file: a fresh handle sees the write
        let reopened = open_storage(&paths);
        assert_eq!(reopened.get("token").unwrap(), Some("abc".to_string()));
    }

    #[test]
    fn test_open_storage_falls_back_to_memory() {
        // A base dir that cannot be created forces the in-memory fallback
        let paths = Paths::with_base_dir(PathBuf::from("/dev/null/quill"));

        let storage = open_storage(&paths);
        storage.set("token", "abc").unwrap();
        assert_eq!(storage.get("token").unwrap(), Some("abc".to_string()));
    }
}
