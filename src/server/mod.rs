//! Protocol-agnostic server core.
//!
//! # Data Flow
//! ```text
//! Adapter request (method, path)
//!     → dispatch.rs (route table lookup, 404 on miss)
//!     → extractor.rs (raw values, path variables from the match)
//!     → pipeline.rs (decode params, aggregate 400s)
//!     → handler.rs (async user code)
//!     → result.rs (encode body, content type)
//!     → ServerResult → adapter renders it
//! ```
//!
//! # Design Decisions
//! - No transport types cross this boundary except status and method
//! - Handlers receive decoded values only
//! - Unexpected handler failures surface as `DispatchError`

pub mod controller;
pub mod dispatch;
pub mod error;
pub mod extractor;
pub mod handler;
pub mod input;
pub mod pipeline;
pub mod reply;
pub mod result;

pub use controller::{ControllerImpl, ControllerImplBuilder};
pub use dispatch::{Dispatcher, DispatcherBuilder};
pub use error::{BoxError, DispatchError, HandlerError, HttpError};
pub use extractor::{MemoryExtractor, RequestExtractor};
pub use handler::{BoxedHandler, Handler};
pub use input::Input;
pub use pipeline::ServerOperation;
pub use reply::{ApiResult, FieldValue, Fields, HandlerOutput, IntoOutput, Json};
pub use result::{encode, Body, ServerResult};
