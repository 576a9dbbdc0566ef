//! Client error types.

use thiserror::Error;

use crate::api::DeserializeError;
use crate::server::BoxError;

/// Errors returned by [`ApiClient`](crate::client::ApiClient) calls.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The definition has no operation of this name.
    #[error("Unknown operation '{0}'")]
    UnknownOperation(String),

    /// A template variable had no value in the input.
    #[error("Could not resolve path variable '{0}'")]
    MissingPathVariable(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body did not match the output definition.
    #[error("Invalid response body: {0}")]
    Deserialize(#[from] DeserializeError),

    /// A request interceptor failed.
    #[error("Interceptor failed: {0}")]
    Interceptor(BoxError),
}

impl ClientError {
    /// The HTTP status of a server-side failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
