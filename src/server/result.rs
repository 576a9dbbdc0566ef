//! Result encoding.
//!
//! # Responsibilities
//! - Turn a handler output into a protocol-agnostic `ServerResult`
//! - Derive the body from the runtime shape of the value
//! - Apply default content types
//! - Turn handler `HttpError`s into plain-text results
//!
//! # Design Decisions
//! - Content type precedence: explicit header, output definition, shape
//! - An explicit content-type header is matched case-insensitively and
//!   never overridden
//! - Absent values, JSON `null` and empty strings produce no body

use axum::http::StatusCode;
use bytes::Bytes;
use serde_json::Value;

use crate::api::{OutputDef, Payload};
use crate::server::error::HttpError;
use crate::server::reply::{FieldValue, Fields, HandlerOutput};

pub const CONTENT_TYPE: &str = "content-type";

/// A rendered response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Text(String),
    Binary(Bytes),
}

impl Body {
    pub fn len(&self) -> usize {
        match self {
            Body::Text(text) => text.len(),
            Body::Binary(bytes) => bytes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, Body::Binary(_))
    }
}

/// A protocol-agnostic response.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerResult {
    pub status: StatusCode,
    pub headers: Fields,
    pub cookies: Option<Fields>,
    pub body: Option<Body>,
}

impl ServerResult {
    /// A `text/plain` result carrying the error's status and message.
    pub fn from_http_error(error: &HttpError) -> Self {
        let mut headers = Fields::new();
        headers.insert(CONTENT_TYPE.to_string(), FieldValue::from("text/plain"));
        Self {
            status: error.status(),
            headers,
            cookies: None,
            body: Some(Body::Text(error.message().to_string())),
        }
    }

    pub fn not_found() -> Self {
        Self::from_http_error(&HttpError::not_found())
    }

    /// Look up a header case-insensitively.
    pub fn header(&self, name: &str) -> Option<&FieldValue> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(headers: &'a Fields, name: &str) -> Option<&'a FieldValue> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value)
}

fn body_of(payload: Option<Payload>) -> Option<Body> {
    match payload? {
        Payload::Binary(bytes) => Some(Body::Binary(bytes)),
        Payload::Text(text) | Payload::Json(Value::String(text)) => {
            (!text.is_empty()).then_some(Body::Text(text))
        }
        Payload::Json(Value::Null) => None,
        Payload::Json(value) => Some(Body::Text(value.to_string())),
    }
}

fn default_content_type(output_def: Option<&OutputDef>, payload: &Payload) -> String {
    if let Some(output_def) = output_def {
        return output_def.mime_type().to_string();
    }
    match payload {
        Payload::Binary(_) => "application/octet-stream",
        Payload::Text(_) | Payload::Json(Value::String(_)) => "text/plain",
        Payload::Json(_) => "application/json",
    }
    .to_string()
}

/// Encode a handler's output.
pub fn encode(output_def: Option<&OutputDef>, output: HandlerOutput) -> ServerResult {
    match output {
        HandlerOutput::Plain(payload) => {
            let mut headers = Fields::new();
            let content_type = payload
                .as_ref()
                .map(|payload| default_content_type(output_def, payload));
            let body = body_of(payload);
            if let (Some(_), Some(content_type)) = (&body, content_type) {
                headers.insert(CONTENT_TYPE.to_string(), FieldValue::Str(content_type));
            }
            ServerResult {
                status: StatusCode::OK,
                headers,
                cookies: None,
                body,
            }
        }
        HandlerOutput::Wrapped(result) => {
            let mut headers = result.headers;
            let content_type = result
                .payload
                .as_ref()
                .map(|payload| default_content_type(output_def, payload));
            let body = body_of(result.payload);
            if let (Some(_), Some(content_type)) = (&body, content_type) {
                if find_header(&headers, CONTENT_TYPE).is_none() {
                    headers.insert(CONTENT_TYPE.to_string(), FieldValue::Str(content_type));
                }
            }
            ServerResult {
                status: result.status,
                headers,
                cookies: result.cookies,
                body,
            }
        }
    }
}
