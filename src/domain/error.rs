//! Error types for bankflow.
//!
//! This module defines the centralized error type [`BankflowError`], the
//! backend-facing [`ApiError`], the view-facing [`RenderError`], and a
//! [`Result`] alias. Every type derives its
//! `Error` implementation through `thiserror`.
//!
//! State mutations never fail. Errors only appear at the edges: loading
//! configuration, reading fixtures, talking to the backend, and rendering.

use thiserror::Error;

/// HTTP status the backend uses for missing or expired credentials.
const STATUS_UNAUTHORIZED: u16 = 401;

/// A failure reported by the backend API.
///
/// Mirrors the backend's `{"detail": "..."}` error payload. `status` is `None`
/// when the failure happened before a response was received (transport or
/// decoding problems).
///
/// # Examples
///
/// ```
/// use bankflow::domain::ApiError;
///
/// let err = ApiError::with_status(401, "Could not validate credentials");
/// assert!(err.is_unauthorized());
/// assert_eq!(err.to_string(), "Could not validate credentials");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{detail}")]
pub struct ApiError {
    /// HTTP status code, if a response was received.
    pub status: Option<u16>,
    /// Human-readable failure description shown to the user.
    pub detail: String,
}

impl ApiError {
    /// Creates an error with no associated HTTP status.
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            status: None,
            detail: detail.into(),
        }
    }

    /// Creates an error carrying the HTTP status of the failed response.
    pub fn with_status(status: u16, detail: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            detail: detail.into(),
        }
    }

    /// Returns `true` when the backend rejected the caller's credentials.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(STATUS_UNAUTHORIZED)
    }
}

/// The main error type for bankflow operations.
///
/// Most variants wrap errors from external crates using `#[from]` so `?`
/// converts them automatically.
#[derive(Debug, Error)]
pub enum BankflowError {
    /// The backend API rejected or failed a request.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Theme parsing or loading failed.
    #[error("Theme error: {0}")]
    Theme(String),

    /// The session file is unreadable or could not be written.
    #[error("Storage error: {0}")]
    Storage(String),
}

/// A failure raised while rendering a state snapshot.
///
/// View binders catch these, log them with the view's name, and carry on.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Writing to the output failed.
    #[error("render output failed: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot cannot be presented by this view.
    #[error("invalid state for view: {0}")]
    Invalid(String),
}

/// A specialized `Result` type for bankflow operations.
pub type Result<T> = std::result::Result<T, BankflowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_only_for_401() {
        assert!(ApiError::with_status(401, "expired").is_unauthorized());
        assert!(!ApiError::with_status(500, "boom").is_unauthorized());
        assert!(!ApiError::new("offline").is_unauthorized());
    }

    #[test]
    fn api_error_converts_into_bankflow_error() {
        let err: BankflowError = ApiError::new("Failed to load account details").into();
        assert_eq!(err.to_string(), "API error: Failed to load account details");
    }

    #[test]
    fn render_error_wraps_io() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        let err: RenderError = io.into();
        assert!(matches!(err, RenderError::Io(_)));
        assert!(err.to_string().starts_with("render output failed"));
    }
}
