//! Parameter definitions.

use std::fmt;

use crate::api::schema::Schema;

/// Where a parameter is carried in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamLocation {
    Body,
    Cookie,
    Header,
    Query,
    Path,
}

impl ParamLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamLocation::Body => "body",
            ParamLocation::Cookie => "cookie",
            ParamLocation::Header => "header",
            ParamLocation::Query => "query",
            ParamLocation::Path => "path",
        }
    }
}

impl fmt::Display for ParamLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a parameter's raw value becomes an input value.
#[derive(Debug, Clone)]
pub enum ParamKind {
    /// The raw request body as bytes.
    BodyBinary { mime_type: String },
    /// The raw request body as text.
    BodyText { mime_type: String },
    /// A raw string checked against a schema.
    Validated(Schema),
}

/// One declared operation input.
#[derive(Debug, Clone)]
pub struct ParamDef {
    location: ParamLocation,
    name: Option<String>,
    kind: ParamKind,
}

impl ParamDef {
    fn validated(location: ParamLocation, schema: Schema) -> Self {
        Self {
            location,
            name: None,
            kind: ParamKind::Validated(schema),
        }
    }

    /// Raw body bytes, `application/octet-stream`.
    pub fn body_binary() -> Self {
        Self::body_binary_as("application/octet-stream")
    }

    pub fn body_binary_as(mime_type: impl Into<String>) -> Self {
        Self {
            location: ParamLocation::Body,
            name: None,
            kind: ParamKind::BodyBinary {
                mime_type: mime_type.into(),
            },
        }
    }

    /// Raw body text, `text/plain`.
    pub fn body_text() -> Self {
        Self::body_text_as("text/plain")
    }

    pub fn body_text_as(mime_type: impl Into<String>) -> Self {
        Self {
            location: ParamLocation::Body,
            name: None,
            kind: ParamKind::BodyText {
                mime_type: mime_type.into(),
            },
        }
    }

    /// Body text validated against a schema.
    pub fn body(schema: Schema) -> Self {
        Self::validated(ParamLocation::Body, schema)
    }

    pub fn cookie(schema: Schema) -> Self {
        Self::validated(ParamLocation::Cookie, schema)
    }

    /// Header names are case-insensitive and rarely valid identifiers, so
    /// the wire name is mandatory.
    pub fn header(schema: Schema, name: impl Into<String>) -> Self {
        Self::validated(ParamLocation::Header, schema).named(name)
    }

    pub fn query(schema: Schema) -> Self {
        Self::validated(ParamLocation::Query, schema)
    }

    pub fn path(schema: Schema) -> Self {
        Self::validated(ParamLocation::Path, schema)
    }

    /// Override the wire name (defaults to the property name).
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn location(&self) -> ParamLocation {
        self.location
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn kind(&self) -> &ParamKind {
        &self.kind
    }

    /// The name used on the wire for a parameter stored under `property`.
    pub fn wire_name<'a>(&'a self, property: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(property)
    }

    /// The declared mime type of a raw body parameter.
    pub fn mime_type(&self) -> Option<&str> {
        match &self.kind {
            ParamKind::BodyBinary { mime_type } | ParamKind::BodyText { mime_type } => Some(mime_type),
            ParamKind::Validated(_) => None,
        }
    }
}
