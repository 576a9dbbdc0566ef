//! Controller definitions: named operations under a base path.

use crate::api::operation::OperationDef;
use crate::api::validation::{validate, RegistrationError};

/// A validated set of named operations.
#[derive(Debug, Clone)]
pub struct ControllerDef {
    base_path: String,
    operations: Vec<(String, OperationDef)>,
}

impl ControllerDef {
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Operations in declaration order, with fully qualified paths.
    pub fn operations(&self) -> impl Iterator<Item = (&str, &OperationDef)> {
        self.operations.iter().map(|(name, op)| (name.as_str(), op))
    }

    pub fn operation(&self, name: &str) -> Option<&OperationDef> {
        self.operations
            .iter()
            .find(|(op_name, _)| op_name == name)
            .map(|(_, op)| op)
    }
}

/// Collects operations before validation.
#[derive(Debug)]
pub struct ControllerBuilder {
    base_path: String,
    operations: Vec<(String, OperationDef)>,
}

/// Start a controller rooted at `base_path` (usually `/`).
pub fn controller(base_path: impl Into<String>) -> ControllerBuilder {
    ControllerBuilder {
        base_path: base_path.into(),
        operations: Vec::new(),
    }
}

impl ControllerBuilder {
    pub fn operation(mut self, name: impl Into<String>, mut op: OperationDef) -> Self {
        op.rebase(&self.base_path);
        self.operations.push((name.into(), op));
        self
    }

    /// Validate and freeze the definition.
    pub fn define(self) -> Result<ControllerDef, RegistrationError> {
        let definition = ControllerDef {
            base_path: self.base_path,
            operations: self.operations,
        };
        validate(definition.operations()).into_result()?;
        Ok(definition)
    }
}
