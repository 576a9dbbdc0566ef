//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the axum Router with one catch-all handler
//! - Wire up middleware (request ID, tracing, timeout, decompression)
//! - Answer preflight `OPTIONS` requests
//! - Hand every other request to the dispatcher
//! - Serve on a listener until shutdown

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::response::Response;
use axum::routing::any;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::decompression::RequestDecompressionLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::http::request::{read_body, HttpExtractor, X_REQUEST_ID};
use crate::http::response::{default_headers, error_response, options_response, render};
use crate::server::{Dispatcher, HttpError};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub default_headers: Arc<HeaderMap>,
    pub max_body_bytes: usize,
}

/// HTTP front end for a [`Dispatcher`].
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    pub fn new(config: ServerConfig, dispatcher: Dispatcher) -> Self {
        let state = AppState {
            dispatcher: Arc::new(dispatcher),
            default_headers: Arc::new(default_headers(&config.headers)),
            max_body_bytes: config.limits.max_body_bytes,
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(dispatch_handler))
            .route("/", any(dispatch_handler))
            .with_state(state)
            .layer(RequestDecompressionLayer::new())
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get(X_REQUEST_ID)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id
                )
            }))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The router, for in-process requests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Run the server until `shutdown` resolves, then drain in-flight requests.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Catch-all handler: preflight, body read, dispatch, render.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    if request.method() == Method::OPTIONS {
        return options_response(&state.default_headers);
    }

    let (parts, body) = request.into_parts();
    let method = parts.method;
    let path = parts.uri.path().to_string();

    let body = match read_body(body, state.max_body_bytes).await {
        Ok(body) => body,
        Err(err) => {
            tracing::warn!(%method, path = %path, status = err.status().as_u16(), "Rejected request body");
            return error_response(&err, &state.default_headers);
        }
    };

    let headers = parts.headers;
    let query = parts.uri.query().map(str::to_string);
    let result = state
        .dispatcher
        .dispatch(&method, &path, move |path_variables| {
            HttpExtractor::new(headers, query.as_deref(), body, path_variables)
        })
        .await;

    match result {
        Ok(result) => {
            tracing::debug!(%method, path = %path, status = result.status.as_u16(), "Request dispatched");
            render(result, &state.default_headers)
        }
        Err(err) => {
            tracing::error!(%method, path = %path, error = %err, "Operation failed");
            error_response(
                &HttpError::new(StatusCode::INTERNAL_SERVER_ERROR),
                &state.default_headers,
            )
        }
    }
}
