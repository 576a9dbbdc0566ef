//! Binding handlers to a controller definition.

use std::collections::HashMap;
use std::sync::Arc;

use crate::api::{ControllerDef, RegistrationError, ValidationResult, Violation, ViolationCode};
use crate::server::handler::{BoxedHandler, Handler};
use crate::server::pipeline::ServerOperation;

/// A controller whose every operation has a handler.
#[derive(Debug, Clone)]
pub struct ControllerImpl {
    base_path: String,
    operations: Vec<Arc<ServerOperation>>,
}

impl ControllerImpl {
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn operations(&self) -> &[Arc<ServerOperation>] {
        &self.operations
    }
}

/// Collects handlers by operation name.
pub struct ControllerImplBuilder {
    definition: ControllerDef,
    handlers: HashMap<String, BoxedHandler>,
    unknown: Vec<String>,
}

impl ControllerDef {
    /// Start binding handlers to this definition's operations.
    pub fn implement(self) -> ControllerImplBuilder {
        ControllerImplBuilder {
            definition: self,
            handlers: HashMap::new(),
            unknown: Vec::new(),
        }
    }
}

impl ControllerImplBuilder {
    pub fn handler(mut self, operation: impl Into<String>, handler: impl Handler) -> Self {
        let operation = operation.into();
        if self.definition.operation(&operation).is_none() {
            self.unknown.push(operation);
        } else {
            self.handlers.insert(operation, Arc::new(handler));
        }
        self
    }

    /// Fails when an operation has no handler or a handler names no operation.
    pub fn build(mut self) -> Result<ControllerImpl, RegistrationError> {
        let mut result = ValidationResult::default();

        for name in &self.unknown {
            result.violations.push(Violation::new(
                ViolationCode::UnknownHandler,
                format!(
                    "Handler '{name}' does not match any operation in controller '{}'",
                    self.definition.base_path()
                ),
            ));
        }

        let mut operations = Vec::new();
        for (name, def) in self.definition.operations() {
            match self.handlers.remove(name) {
                Some(handler) => {
                    operations.push(Arc::new(ServerOperation::new(name, def.clone(), handler)));
                }
                None => result.violations.push(Violation::new(
                    ViolationCode::MissingHandler,
                    format!("Missing handler for operation {name}"),
                )),
            }
        }

        result.into_result()?;
        Ok(ControllerImpl {
            base_path: self.definition.base_path().to_string(),
            operations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{controller, OperationDef};
    use crate::server::error::HandlerError;
    use crate::server::input::Input;

    async fn ok(_input: Input) -> Result<&'static str, HandlerError> {
        Ok("ok")
    }

    fn definition() -> ControllerDef {
        controller("/api")
            .operation("list", OperationDef::get("/items"))
            .operation("create", OperationDef::post("/items"))
            .define()
            .unwrap()
    }

    #[test]
    fn test_build_binds_every_operation() {
        let implementation = definition()
            .implement()
            .handler("list", ok)
            .handler("create", ok)
            .build()
            .unwrap();
        assert_eq!(implementation.base_path(), "/api");
        let names: Vec<&str> = implementation.operations().iter().map(|op| op.name()).collect();
        assert_eq!(names, ["list", "create"]);
        assert_eq!(implementation.operations()[0].def().path(), "/api/items");
    }

    #[test]
    fn test_build_reports_missing_and_unknown_handlers() {
        let err = definition()
            .implement()
            .handler("list", ok)
            .handler("remove", ok)
            .build()
            .unwrap_err();
        let codes: Vec<ViolationCode> = err.violations().iter().map(|v| v.code).collect();
        assert_eq!(codes, [ViolationCode::UnknownHandler, ViolationCode::MissingHandler]);
        assert!(err.to_string().contains("Missing handler for operation create"));
    }
}
