//! Response rendering.
//!
//! # Responsibilities
//! - Render a `ServerResult` into an axum response
//! - Apply configured default headers
//! - Emit one `set-cookie` header per cookie
//!
//! # Design Decisions
//! - Default headers first, result headers override them
//! - Header names or values that are not valid HTTP are dropped and logged

use std::collections::BTreeMap;

use axum::body::Body as AxumBody;
use axum::http::header::{CONTENT_TYPE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::Response;
use tracing::warn;

use crate::server::{Body, HttpError, ServerResult};

/// Convert configured default headers, skipping invalid entries.
pub fn default_headers(headers: &BTreeMap<String, String>) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value)) {
            (Ok(name), Ok(value)) => {
                map.insert(name, value);
            }
            _ => warn!(header = %name, "Skipping invalid default header"),
        }
    }
    map
}

fn header_value(name: &str, value: &str) -> Option<HeaderValue> {
    match HeaderValue::from_str(value) {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(header = %name, "Dropping header with invalid value");
            None
        }
    }
}

/// Render a dispatcher result.
pub fn render(result: ServerResult, defaults: &HeaderMap) -> Response {
    let mut response = Response::new(AxumBody::empty());
    *response.status_mut() = result.status;

    let headers = response.headers_mut();
    headers.extend(defaults.clone());

    for (name, value) in &result.headers {
        let Ok(header_name) = HeaderName::from_bytes(name.to_ascii_lowercase().as_bytes()) else {
            warn!(header = %name, "Dropping header with invalid name");
            continue;
        };
        if let Some(value) = header_value(name, &value.to_string()) {
            headers.insert(header_name, value);
        }
    }

    for (name, value) in result.cookies.iter().flatten() {
        if let Some(cookie) = header_value("set-cookie", &format!("{name}={value}")) {
            headers.append(SET_COOKIE, cookie);
        }
    }

    *response.body_mut() = match result.body {
        Some(Body::Text(text)) => AxumBody::from(text),
        Some(Body::Binary(bytes)) => AxumBody::from(bytes),
        None => AxumBody::empty(),
    };
    response
}

/// Render an error as a plain-text response.
pub fn error_response(error: &HttpError, defaults: &HeaderMap) -> Response {
    render(ServerResult::from_http_error(error), defaults)
}

/// Answer a preflight with the default headers only.
pub fn options_response(defaults: &HeaderMap) -> Response {
    let mut response = Response::new(AxumBody::empty());
    *response.status_mut() = StatusCode::NO_CONTENT;
    response.headers_mut().extend(defaults.clone());
    response.headers_mut().remove(CONTENT_TYPE);
    response
}
