//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum setup, middleware, OPTIONS)
//!     → request.rs (body limit, cookies, raw query)
//!     → server::Dispatcher (route, params, handler)
//!     → response.rs (default headers, set-cookie)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{HttpExtractor, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
