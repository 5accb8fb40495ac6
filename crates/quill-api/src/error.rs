//! API error types.

use thiserror::Error;

/// Error type for API operations.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Backend replied with a non-success status. The message comes
    /// from the response body (`message`, then `error`, then a
    /// generic fallback) and is surfaced verbatim.
    #[error("{message}")]
    Request {
        status: reqwest::StatusCode,
        message: String,
    },

    /// Transport failure (connect, timeout, body decode). Propagated
    /// unchanged from the HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Persisted-storage failure while reading the bearer token
    #[error("Storage error: {0}")]
    Storage(#[from] quill_storage::StorageError),
}

impl ApiError {
    /// HTTP status of a request error, if this is one.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            ApiError::Request { status, .. } => Some(*status),
            ApiError::Http(e) => e.status(),
            ApiError::Storage(_) => None,
        }
    }
}

/// Result type alias using ApiError.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_error_displays_message_verbatim() {
        let error = ApiError::Request {
            status: reqwest::StatusCode::NOT_FOUND,
            message: "not found".to_string(),
        };
        assert_eq!(error.to_string(), "not found");
        assert_eq!(error.status(), Some(reqwest::StatusCode::NOT_FOUND));
    }
}
