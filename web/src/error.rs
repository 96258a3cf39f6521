//! Error types for the dispatch adapter.
//!
//! Hard dispatch failures (contract violations, failing actions, gates or
//! result procedures) leave the adapter as an [`AppError`], which renders the
//! host's standard JSON error response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mvc_dispatch_core::DispatchError;
use serde::Serialize;
use std::fmt;

/// Application error type for the dispatch adapter.
///
/// The client sees a status, a code and a message; the underlying error is
/// only logged.
///
/// # Examples
///
/// ```
/// use axum::http::StatusCode;
/// use mvc_dispatch_web::AppError;
///
/// let err = AppError::internal("An internal error occurred");
/// assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
/// assert_eq!(err.code(), "INTERNAL_SERVER_ERROR");
/// ```
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Error code (for client error handling)
    code: String,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub const fn new(status: StatusCode, message: String, code: String) -> Self {
        Self {
            status,
            message,
            code,
            source: None,
        }
    }

    /// Create a new error with a source error.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// Create a 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            message.into(),
            "INTERNAL_SERVER_ERROR".to_string(),
        )
    }

    /// HTTP status of the response.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Error code sent to the client.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorResponse {
    /// Error code (for client error handling).
    code: String,
    /// Human-readable error message.
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            if let Some(source) = &self.source {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    error = %source,
                    "Internal server error"
                );
            } else {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    "Internal server error"
                );
            }
        }

        let body = ErrorResponse {
            code: self.code,
            message: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}

/// Every hard dispatch failure is a server error; the code names its kind.
impl From<DispatchError> for AppError {
    fn from(err: DispatchError) -> Self {
        let code = err.kind().to_ascii_uppercase();
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "An internal error occurred".to_string(),
            code,
        )
        .with_source(err.into())
    }
}
