//! Typed HTTP client.
//!
//! Calls operations of a `ControllerDef` with the same definitions the
//! server registers, so paths, parameter locations and output decoding
//! cannot drift apart.

pub mod error;
pub mod fetch;
pub mod utils;

pub use error::ClientError;
pub use fetch::{ApiClient, ClientInput, ClientRequest, RequestInterceptor};
pub use utils::RequestBody;
