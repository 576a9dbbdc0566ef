//! Request dispatch.
//!
//! # Responsibilities
//! - Validate all operations of all controllers together
//! - Build the route table once
//! - Resolve (method, path) and run the matched operation
//!
//! # Design Decisions
//! - The dispatcher is an explicit value shared behind `Arc`, never global
//! - Route resolution happens before extraction so adapters can hand the
//!   captured path variables to their extractor
//! - Unmatched requests produce a 404 result, not an error

use std::sync::Arc;

use axum::http::Method;
use tracing::{debug, info};

use crate::api::{validate, RegistrationError};
use crate::routing::{PathVariables, RouteMatch, RouteTable};
use crate::server::controller::ControllerImpl;
use crate::server::error::DispatchError;
use crate::server::extractor::RequestExtractor;
use crate::server::pipeline::ServerOperation;
use crate::server::result::ServerResult;

/// Routes requests to bound operations.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    routes: RouteTable<Arc<ServerOperation>>,
}

/// Collects controllers for a [`Dispatcher`].
#[derive(Debug, Default)]
pub struct DispatcherBuilder {
    controllers: Vec<ControllerImpl>,
}

impl DispatcherBuilder {
    pub fn controller(mut self, controller: ControllerImpl) -> Self {
        self.controllers.push(controller);
        self
    }

    /// Validate every operation and build the route table.
    pub fn build(self) -> Result<Dispatcher, RegistrationError> {
        let operations: Vec<&Arc<ServerOperation>> = self
            .controllers
            .iter()
            .flat_map(|controller| controller.operations())
            .collect();

        validate(operations.iter().map(|op| (op.name(), op.def()))).into_result()?;

        let mut routes = RouteTable::new();
        for op in operations {
            routes.add(op.def().method().clone(), op.def().path(), Arc::clone(op));
        }

        info!(routes = routes.len(), "Route table built");
        Ok(Dispatcher { routes })
    }
}

impl Dispatcher {
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::default()
    }

    /// Resolve a request to its operation.
    pub fn resolve(&self, method: &Method, path: &str) -> Option<RouteMatch<'_, Arc<ServerOperation>>> {
        self.routes.match_route(method, path)
    }

    /// Route and run one request.
    ///
    /// `make_extractor` receives the raw captured path variables of the
    /// matched route.
    pub async fn dispatch<E, F>(
        &self,
        method: &Method,
        path: &str,
        make_extractor: F,
    ) -> Result<ServerResult, DispatchError>
    where
        E: RequestExtractor,
        F: FnOnce(PathVariables) -> E,
    {
        let Some(matched) = self.resolve(method, path) else {
            debug!(%method, path, "No route matched");
            return Ok(ServerResult::not_found());
        };

        debug!(
            %method,
            path,
            route = matched.template_path,
            operation = matched.value.name(),
            "Route matched"
        );

        let operation = Arc::clone(matched.value);
        let extractor = make_extractor(matched.path_variables);
        operation.execute(&extractor).await
    }

    pub fn routes(&self) -> &RouteTable<Arc<ServerOperation>> {
        &self.routes
    }
}
