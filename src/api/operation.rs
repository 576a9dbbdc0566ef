//! Operation definitions.

use axum::http::Method;

use crate::api::output::OutputDef;
use crate::api::param::ParamDef;

/// One typed endpoint: method, path template, inputs and output.
#[derive(Debug, Clone)]
pub struct OperationDef {
    method: Method,
    path: String,
    inputs: Vec<(String, ParamDef)>,
    output: Option<OutputDef>,
}

impl OperationDef {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            inputs: Vec::new(),
            output: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Declare an input stored under `property`.
    pub fn input(mut self, property: impl Into<String>, param: ParamDef) -> Self {
        self.inputs.push((property.into(), param));
        self
    }

    pub fn output(mut self, output: OutputDef) -> Self {
        self.output = Some(output);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Inputs in declaration order, as (property, definition).
    pub fn inputs(&self) -> &[(String, ParamDef)] {
        &self.inputs
    }

    pub fn output_def(&self) -> Option<&OutputDef> {
        self.output.as_ref()
    }

    /// `"{METHOD} {path}"`, e.g. `GET /users/{userId}`.
    pub fn route_key(&self) -> String {
        format!("{} {}", self.method, self.path)
    }

    /// Prefix the operation path with a controller base path.
    pub(crate) fn rebase(&mut self, base_path: &str) {
        let local = if base_path.ends_with('/') {
            self.path.strip_prefix('/').unwrap_or(&self.path)
        } else {
            &self.path
        };
        self.path = format!("{base_path}{local}");
    }
}
