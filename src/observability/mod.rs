//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatcher, pipeline and HTTP adapter produce:
//!     → tracing events with structured fields
//!     → tower-http trace spans per request (with request ID)
//!
//! Consumers:
//!     → logging.rs subscriber (stdout, pretty or JSON)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID flows through the HTTP layer into trace spans
//! - `RUST_LOG` overrides the configured level

pub mod logging;

pub use logging::{init_logging, LoggingError};
