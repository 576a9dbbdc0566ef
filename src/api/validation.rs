//! Registration-time validation.
//!
//! # Responsibilities
//! - Detect duplicate (method, normalized path) pairs
//! - Reject malformed paths
//! - Check path variables against declared path parameters
//! - Reject multiple body parameters
//!
//! # Design Decisions
//! - Returns all violations, not just the first
//! - Validation is a pure function over operation definitions
//! - Runs before any route table is built

use std::collections::HashSet;
use std::fmt;

use thiserror::Error;

use crate::api::operation::OperationDef;
use crate::api::param::{ParamKind, ParamLocation};
use crate::routing::PathTemplate;

/// Category of a registration problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationCode {
    DuplicateMethodPath,
    InvalidPath,
    MissingPathVar,
    InvalidPathVar,
    MultipleBodyVars,
    MissingHandler,
    UnknownHandler,
}

/// One registration problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub message: String,
    pub code: ViolationCode,
}

impl Violation {
    pub fn new(code: ViolationCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Every violation found in one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub violations: Vec<Violation>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Violation messages joined by newlines, `None` when valid.
    pub fn error_message(&self) -> Option<String> {
        if self.is_valid() {
            return None;
        }
        let messages: Vec<&str> = self.violations.iter().map(|v| v.message.as_str()).collect();
        Some(messages.join("\n"))
    }

    /// Convert into a `Result`, failing when any violation was recorded.
    pub fn into_result(self) -> Result<(), RegistrationError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(RegistrationError { result: self })
        }
    }
}

/// Fatal startup error carrying every registration violation.
#[derive(Debug, Clone, Error)]
#[error("{}", .result.error_message().unwrap_or_default())]
pub struct RegistrationError {
    pub result: ValidationResult,
}

impl RegistrationError {
    pub fn violations(&self) -> &[Violation] {
        &self.result.violations
    }
}

fn is_invalid_path(path: &str) -> bool {
    path.is_empty() || !path.starts_with('/') || path.ends_with('/') || path.contains("//")
}

/// Validate a set of named operations that will share one route table.
pub fn validate<'a, I>(operations: I) -> ValidationResult
where
    I: IntoIterator<Item = (&'a str, &'a OperationDef)>,
{
    let mut violations = Vec::new();
    let mut method_paths = HashSet::new();

    for (op_name, op) in operations {
        let template = PathTemplate::parse(op.path());

        let method_path = format!("{} {}", op.method(), template.normalized_path());
        if !method_paths.insert(method_path.clone()) {
            violations.push(Violation::new(
                ViolationCode::DuplicateMethodPath,
                format!("Duplicate method/path '{method_path}' in operation {op_name}"),
            ));
        }

        if is_invalid_path(op.path()) {
            violations.push(Violation::new(
                ViolationCode::InvalidPath,
                format!("Invalid path '{}' in operation {op_name}", op.path()),
            ));
        }

        let path_params: Vec<_> = op
            .inputs()
            .iter()
            .filter(|(_, param)| param.location() == ParamLocation::Path)
            .collect();

        for variable in template.variables() {
            let declared = path_params
                .iter()
                .any(|(property, param)| param.wire_name(property) == variable);
            if !declared {
                violations.push(Violation::new(
                    ViolationCode::MissingPathVar,
                    format!("Could not find path variable '{variable}' in operation {op_name}"),
                ));
            }
        }

        for (property, param) in &path_params {
            let scalar = match param.kind() {
                ParamKind::Validated(schema) => schema.kind().is_scalar(),
                ParamKind::BodyBinary { .. } | ParamKind::BodyText { .. } => false,
            };
            if !scalar {
                violations.push(Violation::new(
                    ViolationCode::InvalidPathVar,
                    format!("Path variable '{property}' in operation {op_name} is an object type"),
                ));
            }
        }

        let body_params = op
            .inputs()
            .iter()
            .filter(|(_, param)| param.location() == ParamLocation::Body)
            .count();
        if body_params > 1 {
            violations.push(Violation::new(
                ViolationCode::MultipleBodyVars,
                format!("Multiple body parameters declared in operation {op_name}"),
            ));
        }
    }

    ValidationResult { violations }
}
