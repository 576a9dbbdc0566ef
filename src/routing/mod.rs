//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     "{method} {template}" per operation
//!     → template.rs (parse into normalized pattern + variable names)
//!     → router.rs (insert, keep sorted by normalized pattern)
//!     → Freeze as immutable RouteTable
//!
//! Incoming Request (method, path)
//!     → router.rs (walk entries in sorted order)
//!     → matcher.rs (match path against template, capture variables)
//!     → Return: RouteMatch or None
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (literal/wildcard segment matching only)
//! - Deterministic: same input always matches same route
//! - First match wins (ordered by normalized pattern)

pub mod matcher;
pub mod router;
pub mod template;

pub use matcher::PathVariables;
pub use router::{RouteEntry, RouteMatch, RouteTable};
pub use template::{PathTemplate, PLACEHOLDER};
