//! Declarative HTTP APIs.
//!
//! Operations are declared once (method, path template, typed parameters,
//! output) and shared by the server, which routes, decodes and encodes
//! requests for async handlers, and by a typed HTTP client.
//!
//! # Architecture Overview
//!
//! ```text
//!     api (definitions, validation)
//!        │                    │
//!        ▼                    ▼
//!     server (dispatch,    client (ApiClient)
//!     pipeline, encoder)
//!        │
//!        ▼
//!     http (axum adapter) ◀── config, observability, lifecycle
//!        │
//!     routing (templates, matcher, route table)
//! ```

// Core subsystems
pub mod api;
pub mod routing;
pub mod server;

// Transports
pub mod client;
pub mod http;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;

pub mod hello;

pub use api::{controller, ControllerDef, OperationDef, OutputDef, ParamDef, Schema};
pub use client::ApiClient;
pub use config::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use server::{ApiResult, Dispatcher, HandlerError, HttpError, Input};
