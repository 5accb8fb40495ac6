//! Session error types.

use thiserror::Error;

/// Error type for session operations.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Storage error
    #[error("Storage error: {0}")]
    Storage(#[from] quill_storage::StorageError),

    /// API error
    #[error("API error: {0}")]
    Api(#[from] quill_api::ApiError),

    /// OAuth callback listener error
    #[error("OAuth callback error: {0}")]
    Callback(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using SessionError.
pub type SessionResult<T> = Result<T, SessionError>;
