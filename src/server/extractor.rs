//! Pull-based access to raw request values.
//!
//! Adapters implement [`RequestExtractor`] over their transport; the
//! parameter pipeline only ever sees raw strings and bytes.

use std::collections::HashMap;

use bytes::Bytes;

use crate::routing::PathVariables;
use crate::server::error::HttpError;

/// Raw values of one request, by location and name.
///
/// Every accessor returns `Ok(None)` when the value is absent. Adapters may
/// reject values they cannot represent (e.g. repeated headers) with an
/// [`HttpError`].
pub trait RequestExtractor: Send + Sync {
    fn body_binary(&self) -> Result<Option<Bytes>, HttpError>;
    fn body_text(&self) -> Result<Option<String>, HttpError>;
    fn cookie(&self, name: &str) -> Result<Option<String>, HttpError>;
    fn header(&self, name: &str) -> Result<Option<String>, HttpError>;
    /// The raw, still percent-encoded query value.
    fn query(&self, name: &str) -> Result<Option<String>, HttpError>;
    /// The raw, still percent-encoded path variable.
    fn path(&self, name: &str) -> Result<Option<String>, HttpError>;
}

/// An extractor over in-memory values, for tests and in-process calls.
#[derive(Debug, Clone, Default)]
pub struct MemoryExtractor {
    body: Option<Bytes>,
    cookies: HashMap<String, String>,
    headers: HashMap<String, String>,
    query: HashMap<String, String>,
    path: PathVariables,
}

impl MemoryExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    /// Header names are stored lowercased and looked up case-insensitively.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    pub fn with_path_variables(mut self, variables: PathVariables) -> Self {
        self.path = variables;
        self
    }
}

impl RequestExtractor for MemoryExtractor {
    fn body_binary(&self) -> Result<Option<Bytes>, HttpError> {
        Ok(self.body.clone())
    }

    fn body_text(&self) -> Result<Option<String>, HttpError> {
        self.body
            .as_ref()
            .map(|body| {
                String::from_utf8(body.to_vec())
                    .map_err(|_| HttpError::bad_request("Request body is not valid UTF-8"))
            })
            .transpose()
    }

    fn cookie(&self, name: &str) -> Result<Option<String>, HttpError> {
        Ok(self.cookies.get(name).cloned())
    }

    fn header(&self, name: &str) -> Result<Option<String>, HttpError> {
        Ok(self.headers.get(&name.to_ascii_lowercase()).cloned())
    }

    fn query(&self, name: &str) -> Result<Option<String>, HttpError> {
        Ok(self.query.get(name).cloned())
    }

    fn path(&self, name: &str) -> Result<Option<String>, HttpError> {
        Ok(self.path.get(name).cloned())
    }
}
