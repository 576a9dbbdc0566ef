//! Operation definitions shared by server and client.
//!
//! # Data Flow
//! ```text
//! controller(base).operation(name, OperationDef)...
//!     → operation.rs (method, path, inputs, output)
//!     → validation.rs (registration checks, all violations at once)
//!     → ControllerDef (validated, immutable)
//!     → server::ControllerImpl binds handlers / client::ApiClient calls it
//! ```
//!
//! # Design Decisions
//! - Parameter and output kinds are closed enums, never type identity checks
//! - Definitions carry no transport types beyond the HTTP method

pub mod controller;
pub mod operation;
pub mod output;
pub mod param;
pub mod payload;
pub mod schema;
pub mod validation;

pub use controller::{controller, ControllerBuilder, ControllerDef};
pub use operation::OperationDef;
pub use output::OutputDef;
pub use param::{ParamDef, ParamKind, ParamLocation};
pub use payload::Payload;
pub use schema::{DeserializeError, Schema, ValueKind};
pub use validation::{validate, RegistrationError, ValidationResult, Violation, ViolationCode};
