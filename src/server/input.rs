//! The decoded inputs handed to a handler.

use std::collections::HashMap;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::api::Payload;

/// Decoded parameter values by property name. Absent optional parameters
/// have no entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Input {
    values: HashMap<String, Payload>,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, property: impl Into<String>, value: Payload) {
        self.values.insert(property.into(), value);
    }

    /// Builder form of [`Input::insert`].
    pub fn with(mut self, property: impl Into<String>, value: impl Into<Payload>) -> Self {
        self.insert(property, value.into());
        self
    }

    pub fn get(&self, property: &str) -> Option<&Payload> {
        self.values.get(property)
    }

    pub fn contains(&self, property: &str) -> bool {
        self.values.contains_key(property)
    }

    pub fn str(&self, property: &str) -> Option<&str> {
        self.get(property).and_then(Payload::as_str)
    }

    pub fn json(&self, property: &str) -> Option<&Value> {
        self.get(property).and_then(Payload::as_json)
    }

    pub fn bytes(&self, property: &str) -> Option<&Bytes> {
        self.get(property).and_then(Payload::as_bytes)
    }

    /// Deserialize one property; `Ok(None)` when absent.
    pub fn parse<T: DeserializeOwned>(&self, property: &str) -> Result<Option<T>, serde_json::Error> {
        self.get(property).map(Payload::deserialize).transpose()
    }

    /// Deserialize every non-binary property into one struct.
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<T, serde_json::Error> {
        let object: Map<String, Value> = self
            .values
            .into_iter()
            .filter_map(|(property, payload)| payload.to_value().map(|value| (property, value)))
            .collect();
        serde_json::from_value(Value::Object(object))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
