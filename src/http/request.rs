//! Request handling.
//!
//! # Responsibilities
//! - Read the request body up to the configured limit
//! - Parse cookies from the `Cookie` header
//! - Expose headers, query and path values to the parameter pipeline
//!
//! # Design Decisions
//! - Query values stay percent-encoded; the pipeline decodes them once
//! - Multi-valued headers and query parameters are rejected with 400
//! - An empty body is treated as absent

use std::collections::HashMap;

use axum::body::Body;
use axum::http::header::COOKIE;
use axum::http::{HeaderMap, StatusCode};
use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use percent_encoding::percent_decode_str;

use crate::routing::PathVariables;
use crate::server::{HttpError, RequestExtractor};

/// Correlation header set on every request and echoed on every response.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Read a whole body, failing with 413 past `limit` bytes.
pub async fn read_body(body: Body, limit: usize) -> Result<Bytes, HttpError> {
    let mut stream = body.into_data_stream();
    let mut buffer = BytesMut::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| {
            HttpError::bad_request(format!("Failed to read request body: {e}"))
        })?;
        if buffer.len() + chunk.len() > limit {
            return Err(HttpError::new(StatusCode::PAYLOAD_TOO_LARGE));
        }
        buffer.extend_from_slice(&chunk);
    }
    Ok(buffer.freeze())
}

/// Split `name=value` pairs separated by `;`. Pairs without a name are skipped.
pub fn parse_cookies(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            let name = name.trim();
            (!name.is_empty()).then(|| (name.to_string(), value.to_string()))
        })
        .collect()
}

/// Split a raw query string into pairs. Names are decoded, values are not.
fn parse_query(query: Option<&str>) -> Vec<(String, String)> {
    query
        .unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            let name = percent_decode_str(name).decode_utf8_lossy().into_owned();
            (name, value.to_string())
        })
        .collect()
}

/// [`RequestExtractor`] over an axum request.
#[derive(Debug, Clone)]
pub struct HttpExtractor {
    headers: HeaderMap,
    query: Vec<(String, String)>,
    cookies: HashMap<String, String>,
    body: Bytes,
    path: PathVariables,
}

impl HttpExtractor {
    pub fn new(headers: HeaderMap, query: Option<&str>, body: Bytes, path: PathVariables) -> Self {
        let cookies = parse_cookies(&headers);
        Self {
            headers,
            query: parse_query(query),
            cookies,
            body,
            path,
        }
    }
}

impl RequestExtractor for HttpExtractor {
    fn body_binary(&self) -> Result<Option<Bytes>, HttpError> {
        Ok((!self.body.is_empty()).then(|| self.body.clone()))
    }

    fn body_text(&self) -> Result<Option<String>, HttpError> {
        if self.body.is_empty() {
            return Ok(None);
        }
        String::from_utf8(self.body.to_vec())
            .map(Some)
            .map_err(|_| HttpError::bad_request("Request body is not valid UTF-8"))
    }

    fn cookie(&self, name: &str) -> Result<Option<String>, HttpError> {
        Ok(self.cookies.get(name).cloned())
    }

    fn header(&self, name: &str) -> Result<Option<String>, HttpError> {
        let mut values = self.headers.get_all(name).iter();
        let Some(value) = values.next() else {
            return Ok(None);
        };
        if values.next().is_some() {
            return Err(HttpError::bad_request(format!(
                "Multi value header '{name}' not supported"
            )));
        }
        value
            .to_str()
            .map(|value| Some(value.to_string()))
            .map_err(|_| HttpError::bad_request(format!("Header '{name}' is not visible ASCII")))
    }

    fn query(&self, name: &str) -> Result<Option<String>, HttpError> {
        let mut values = self.query.iter().filter(|(key, _)| key == name);
        let Some((_, value)) = values.next() else {
            return Ok(None);
        };
        if values.next().is_some() {
            return Err(HttpError::bad_request(format!(
                "Multi value query params '{name}' not supported"
            )));
        }
        Ok(Some(value.clone()))
    }

    fn path(&self, name: &str) -> Result<Option<String>, HttpError> {
        Ok(self.path.get(name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_cookies_are_parsed() {
        let cookies = parse_cookies(&headers(&[("cookie", "a=1; b=two=2;=skip;junk")]));
        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies["a"], "1");
        assert_eq!(cookies["b"], "two=2");
    }

    #[test]
    fn test_query_values_stay_encoded() {
        let extractor = HttpExtractor::new(
            HeaderMap::new(),
            Some("q=a%20b&flag&x%5Fy=1"),
            Bytes::new(),
            PathVariables::new(),
        );
        assert_eq!(extractor.query("q").unwrap(), Some("a%20b".into()));
        assert_eq!(extractor.query("flag").unwrap(), Some(String::new()));
        assert_eq!(extractor.query("x_y").unwrap(), Some("1".into()));
        assert_eq!(extractor.query("missing").unwrap(), None);
    }

    #[test]
    fn test_multi_values_are_rejected() {
        let extractor = HttpExtractor::new(
            headers(&[("x-num", "1"), ("x-num", "2")]),
            Some("n=1&n=2"),
            Bytes::new(),
            PathVariables::new(),
        );
        let err = extractor.header("X-Num").unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Multi value header 'X-Num' not supported");
        assert_eq!(
            extractor.query("n").unwrap_err().message(),
            "Multi value query params 'n' not supported"
        );
    }

    #[test]
    fn test_empty_body_is_absent() {
        let extractor = HttpExtractor::new(HeaderMap::new(), None, Bytes::new(), PathVariables::new());
        assert_eq!(extractor.body_binary().unwrap(), None);
        assert_eq!(extractor.body_text().unwrap(), None);
    }

    #[tokio::test]
    async fn test_read_body_limit() {
        let body = read_body(Body::from("hello"), 5).await.unwrap();
        assert_eq!(body, Bytes::from_static(b"hello"));

        let err = read_body(Body::from("hello!"), 5).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
