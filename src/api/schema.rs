//! Value schemas for validated parameters and outputs.
//!
//! # Responsibilities
//! - Pre-parse raw wire strings (text kinds verbatim, everything else as JSON)
//! - Check the parsed value against its kind and rules
//! - Report failures as typed `DeserializeError`s
//!
//! # Design Decisions
//! - A schema only validates; conversion into Rust types happens in handlers
//!   via serde (`Payload::deserialize`, `Input::parse`)
//! - Absence is accepted only by `optional()` schemas

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// The shape a schema accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
    Enum,
}

impl ValueKind {
    /// Whether a value of this kind round-trips through one path segment.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            ValueKind::String | ValueKind::Number | ValueKind::Integer | ValueKind::Boolean
        )
    }

    /// Whether raw wire text is taken verbatim rather than parsed as JSON.
    fn is_textual(&self) -> bool {
        matches!(self, ValueKind::String | ValueKind::Enum)
    }

    fn accepts(&self, value: &Value) -> bool {
        match self {
            ValueKind::String | ValueKind::Enum => value.is_string(),
            ValueKind::Number => value.is_number(),
            ValueKind::Integer => value.is_i64() || value.is_u64(),
            ValueKind::Boolean => value.is_boolean(),
            ValueKind::Object => value.is_object(),
            ValueKind::Array => value.is_array(),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::String => "string",
            ValueKind::Number => "number",
            ValueKind::Integer => "integer",
            ValueKind::Boolean => "boolean",
            ValueKind::Object => "object",
            ValueKind::Array => "array",
            ValueKind::Enum => "enum",
        };
        f.write_str(name)
    }
}

/// Errors produced while deserializing a raw value.
#[derive(Debug, Error, PartialEq)]
pub enum DeserializeError {
    /// A required value was absent.
    #[error("Required")]
    Required,

    /// The raw text could not be parsed.
    #[error("Malformed value: {0}")]
    Malformed(String),

    /// The parsed value has the wrong shape.
    #[error("Expected {expected}, received {received}")]
    InvalidType { expected: ValueKind, received: &'static str },

    /// The value failed a schema rule.
    #[error("{0}")]
    Rule(String),
}

type CustomRule = Arc<dyn Fn(&Value) -> Result<(), String> + Send + Sync>;

#[derive(Clone)]
enum Rule {
    MinLength(usize),
    MaxLength(usize),
    Min(f64),
    Max(f64),
    OneOf(Vec<String>),
    Custom(CustomRule),
}

impl Rule {
    fn check(&self, value: &Value) -> Result<(), String> {
        match self {
            Rule::MinLength(min) => match length_of(value) {
                Some(len) if len < *min => Err(format!("Must contain at least {min} element(s)")),
                _ => Ok(()),
            },
            Rule::MaxLength(max) => match length_of(value) {
                Some(len) if len > *max => Err(format!("Must contain at most {max} element(s)")),
                _ => Ok(()),
            },
            Rule::Min(min) => match value.as_f64() {
                Some(n) if n < *min => Err(format!("Must be greater than or equal to {min}")),
                _ => Ok(()),
            },
            Rule::Max(max) => match value.as_f64() {
                Some(n) if n > *max => Err(format!("Must be less than or equal to {max}")),
                _ => Ok(()),
            },
            Rule::OneOf(values) => match value.as_str() {
                Some(s) if values.iter().any(|v| v == s) => Ok(()),
                _ => Err(format!("Expected one of: {}", values.join(", "))),
            },
            Rule::Custom(check) => check(value),
        }
    }
}

fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

fn received(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Describes and validates one value.
#[derive(Clone)]
pub struct Schema {
    kind: ValueKind,
    optional: bool,
    rules: Vec<Rule>,
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("kind", &self.kind)
            .field("optional", &self.optional)
            .field("rules", &self.rules.len())
            .finish()
    }
}

impl Schema {
    fn of(kind: ValueKind) -> Self {
        Self {
            kind,
            optional: false,
            rules: Vec::new(),
        }
    }

    pub fn string() -> Self {
        Self::of(ValueKind::String)
    }

    pub fn number() -> Self {
        Self::of(ValueKind::Number)
    }

    pub fn integer() -> Self {
        Self::of(ValueKind::Integer)
    }

    pub fn boolean() -> Self {
        Self::of(ValueKind::Boolean)
    }

    pub fn object() -> Self {
        Self::of(ValueKind::Object)
    }

    pub fn array() -> Self {
        Self::of(ValueKind::Array)
    }

    /// A string restricted to the given values.
    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        Self::of(ValueKind::Enum).rule(Rule::OneOf(values))
    }

    /// Accept absent values.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Minimum string length (in characters) or array length.
    pub fn min_length(self, min: usize) -> Self {
        self.rule(Rule::MinLength(min))
    }

    /// Maximum string length (in characters) or array length.
    pub fn max_length(self, max: usize) -> Self {
        self.rule(Rule::MaxLength(max))
    }

    pub fn min(self, min: f64) -> Self {
        self.rule(Rule::Min(min))
    }

    pub fn max(self, max: f64) -> Self {
        self.rule(Rule::Max(max))
    }

    /// Require the value to deserialize into `T`.
    pub fn typed<T: DeserializeOwned>(self) -> Self {
        self.validate_with(|value| {
            serde_json::from_value::<T>(value.clone())
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
    }

    /// Add a custom check.
    pub fn validate_with<F>(self, check: F) -> Self
    where
        F: Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.rule(Rule::Custom(Arc::new(check)))
    }

    fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Parse and validate a raw wire value.
    pub fn deserialize(&self, raw: Option<&str>) -> Result<Option<Value>, DeserializeError> {
        let Some(raw) = raw else {
            return if self.optional {
                Ok(None)
            } else {
                Err(DeserializeError::Required)
            };
        };

        let value = if self.kind.is_textual() {
            Value::String(raw.to_string())
        } else {
            serde_json::from_str(raw).map_err(|e| DeserializeError::Malformed(e.to_string()))?
        };

        self.check(&value)?;
        Ok(Some(value))
    }

    /// Validate an already parsed value.
    pub fn check(&self, value: &Value) -> Result<(), DeserializeError> {
        if value.is_null() && self.optional {
            return Ok(());
        }
        if !self.kind.accepts(value) {
            return Err(DeserializeError::InvalidType {
                expected: self.kind,
                received: received(value),
            });
        }
        for rule in &self.rules {
            rule.check(value).map_err(DeserializeError::Rule)?;
        }
        Ok(())
    }
}
