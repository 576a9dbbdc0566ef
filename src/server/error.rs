//! Server-side error types.

use axum::http::StatusCode;
use thiserror::Error;

/// Boxed error for failures the dispatcher does not interpret.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// An error that maps directly onto an HTTP status and plain-text message.
///
/// Handlers return it to answer with a specific status; the parameter
/// pipeline uses it for client input errors (400).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct HttpError {
    status: StatusCode,
    message: String,
}

impl HttpError {
    /// An error whose message is the canonical reason phrase.
    pub fn new(status: StatusCode) -> Self {
        let message = status.canonical_reason().unwrap_or("Unknown Error").to_string();
        Self { status, message }
    }

    pub fn with_message(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::with_message(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// What a handler may fail with.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Answered with the error's status and message.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// Propagated to the adapter, answered with 500.
    #[error("{0}")]
    Unexpected(BoxError),
}

impl HandlerError {
    pub fn unexpected(error: impl Into<BoxError>) -> Self {
        HandlerError::Unexpected(error.into())
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(error: serde_json::Error) -> Self {
        HandlerError::Unexpected(Box::new(error))
    }
}

/// A request failed in a way the dispatcher could not turn into a result.
#[derive(Debug, Error)]
#[error("operation '{operation}' failed: {source}")]
pub struct DispatchError {
    pub operation: String,
    #[source]
    pub source: BoxError,
}
