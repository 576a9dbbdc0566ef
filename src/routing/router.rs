//! Route lookup.
//!
//! # Responsibilities
//! - Store compiled routes
//! - Look up matching route for a (method, path) pair
//! - Return matched route or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Entries kept sorted by normalized pattern; `{` sorts after `/`, digits
//!   and ASCII letters, so literal segments win over a variable at the
//!   same position
//! - O(n) scan in sorted order, first match wins
//! - Duplicate (method, pattern) pairs are rejected by registration
//!   validation before a table is built

use axum::http::Method;

use crate::routing::matcher::PathVariables;
use crate::routing::template::PathTemplate;

/// One registered route.
#[derive(Debug, Clone)]
pub struct RouteEntry<T> {
    method: Method,
    template: PathTemplate,
    value: T,
}

impl<T> RouteEntry<T> {
    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn template(&self) -> &PathTemplate {
        &self.template
    }

    pub fn value(&self) -> &T {
        &self.value
    }
}

/// A resolved request.
#[derive(Debug, PartialEq)]
pub struct RouteMatch<'a, T> {
    /// The template as registered, e.g. `/users/{userId}`.
    pub template_path: &'a str,
    /// Raw captured values by variable name.
    pub path_variables: PathVariables,
    /// The value bound at registration.
    pub value: &'a T,
}

/// Ordered collection of routes.
#[derive(Debug, Clone)]
pub struct RouteTable<T> {
    entries: Vec<RouteEntry<T>>,
}

impl<T> Default for RouteTable<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> RouteTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route. Entries with equal patterns keep insertion order.
    pub fn add(&mut self, method: Method, template: &str, value: T) {
        let template = PathTemplate::parse(template);
        let index = self
            .entries
            .partition_point(|entry| entry.template.normalized_path() <= template.normalized_path());
        self.entries.insert(
            index,
            RouteEntry {
                method,
                template,
                value,
            },
        );
    }

    /// Resolve a request to the first matching route.
    pub fn match_route(&self, method: &Method, path: &str) -> Option<RouteMatch<'_, T>> {
        self.entries
            .iter()
            .filter(|entry| entry.method == *method)
            .find_map(|entry| {
                entry.template.matches(path).map(|path_variables| RouteMatch {
                    template_path: entry.template.path(),
                    path_variables,
                    value: &entry.value,
                })
            })
    }

    /// Entries in match order.
    pub fn entries(&self) -> impl Iterator<Item = &RouteEntry<T>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
