//! HTTP client for a controller definition.
//!
//! # Responsibilities
//! - Build a request from an operation definition and its input
//! - Let an interceptor rewrite the request before it is sent
//! - Decode the response with the operation's output definition
//!
//! # Data Flow
//! ```text
//! call(operation, input)
//!     → utils.rs (params by location, URL, headers)
//!     → ClientRequest → interceptor (optional)
//!     → reqwest → status check → OutputDef::deserialize
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use tracing::debug;
use url::Url;

use crate::api::{ControllerDef, OperationDef, Payload};
use crate::client::error::ClientError;
use crate::client::utils::{build_headers, build_url, params_by_location, RequestBody};
use crate::server::Input;

/// Values for one client call, keyed by property name.
pub type ClientInput = Input;

/// A fully built outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientRequest {
    pub method: Method,
    pub url: Url,
    pub headers: BTreeMap<String, String>,
    pub body: Option<RequestBody>,
}

/// Rewrites requests before they are sent, e.g. to add credentials.
pub trait RequestInterceptor: Send + Sync + 'static {
    fn intercept(&self, request: ClientRequest) -> BoxFuture<'static, Result<ClientRequest, ClientError>>;
}

impl<F, Fut> RequestInterceptor for F
where
    F: Fn(ClientRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ClientRequest, ClientError>> + Send + 'static,
{
    fn intercept(&self, request: ClientRequest) -> BoxFuture<'static, Result<ClientRequest, ClientError>> {
        Box::pin((self)(request))
    }
}

/// Calls the operations of one controller over HTTP.
#[derive(Clone)]
pub struct ApiClient {
    definition: ControllerDef,
    endpoint: String,
    http: Client,
    interceptor: Option<Arc<dyn RequestInterceptor>>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("endpoint", &self.endpoint)
            .field("base_path", &self.definition.base_path())
            .field("intercepted", &self.interceptor.is_some())
            .finish()
    }
}

impl ApiClient {
    /// `endpoint` is the server origin, e.g. `http://localhost:8080`.
    pub fn new(definition: ControllerDef, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        Self {
            definition,
            endpoint,
            http: Client::new(),
            interceptor: None,
        }
    }

    /// Use a preconfigured reqwest client.
    pub fn with_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    pub fn with_interceptor(mut self, interceptor: impl RequestInterceptor) -> Self {
        self.interceptor = Some(Arc::new(interceptor));
        self
    }

    pub fn definition(&self) -> &ControllerDef {
        &self.definition
    }

    fn operation(&self, name: &str) -> Result<&OperationDef, ClientError> {
        self.definition
            .operation(name)
            .ok_or_else(|| ClientError::UnknownOperation(name.to_string()))
    }

    /// Build the request for `operation` without sending it.
    pub fn build_request(&self, operation: &str, input: &ClientInput) -> Result<ClientRequest, ClientError> {
        let op = self.operation(operation)?;
        let params = params_by_location(op, input);
        let url = build_url(&self.endpoint, op.path(), &params.path, &params.query)?;
        let mut headers = build_headers(params.header, &params.cookie);
        if let Some(mime_type) = params.body_mime_type {
            let has_content_type = headers
                .keys()
                .any(|name| name.eq_ignore_ascii_case(CONTENT_TYPE.as_str()));
            if !has_content_type {
                headers.insert(CONTENT_TYPE.as_str().to_string(), mime_type);
            }
        }

        Ok(ClientRequest {
            method: op.method().clone(),
            url: Url::parse(&url)?,
            headers,
            body: params.body,
        })
    }

    /// Call `operation`; `Ok(None)` when it declares no output.
    pub async fn call(&self, operation: &str, input: ClientInput) -> Result<Option<Payload>, ClientError> {
        let op = self.operation(operation)?;
        let mut request = self.build_request(operation, &input)?;
        if let Some(interceptor) = &self.interceptor {
            request = interceptor.intercept(request).await?;
        }

        debug!(operation, method = %request.method, url = %request.url, "Sending request");

        let mut builder = self.http.request(request.method, request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match request.body {
            Some(RequestBody::Text(text)) => builder.body(text),
            Some(RequestBody::Binary(bytes)) => builder.body(bytes),
            None => builder,
        };

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await?;
            return Err(ClientError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let Some(output) = op.output_def() else {
            return Ok(None);
        };
        if output.is_binary() {
            return Ok(Some(Payload::Binary(response.bytes().await?)));
        }
        let text = response.text().await?;
        Ok(Some(output.deserialize(&text)?))
    }
}
