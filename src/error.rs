//! Error types for the page cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the page cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Page does not exist in storage
    #[error("Page not found: {0}")]
    NotFound(String),

    /// Key cannot be mapped onto storage
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Reading from durable storage failed
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// An internal lock was poisoned by a panicking holder
    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),

    /// A named pool already exists with other key/value types
    #[error("Pool type mismatch: {0}")]
    PoolTypeMismatch(String),

    /// The homepage was requested but none is configured
    #[error("No homepage configured")]
    NoHomepage,
}

impl CacheError {
    /// Builds a `LockPoisoned` error naming the poisoned resource.
    pub(crate) fn poisoned(what: &str) -> Self {
        CacheError::LockPoisoned(what.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) | CacheError::NoHomepage => StatusCode::NOT_FOUND,
            CacheError::InvalidKey(_) => StatusCode::BAD_REQUEST,
            CacheError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::LockPoisoned(_) | CacheError::PoolTypeMismatch(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the page cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_io_error_converts_to_storage() {
        let err: CacheError = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();
        assert!(matches!(err, CacheError::Storage(_)));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_status_codes() {
        let cases = vec![
            (CacheError::NotFound("a".into()), StatusCode::NOT_FOUND),
            (CacheError::NoHomepage, StatusCode::NOT_FOUND),
            (CacheError::InvalidKey("../a".into()), StatusCode::BAD_REQUEST),
            (
                CacheError::Storage(io::Error::new(io::ErrorKind::Other, "disk")),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                CacheError::poisoned("pool"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_no_homepage_message_names_no_path() {
        let message = CacheError::NoHomepage.to_string();
        assert_eq!(message, "No homepage configured");
        assert!(!message.contains("Page not found"));
    }
}
