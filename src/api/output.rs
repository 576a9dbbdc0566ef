//! Output definitions.

use serde_json::Value;

use crate::api::payload::Payload;
use crate::api::schema::{DeserializeError, Schema};

/// Declares what an operation returns and how clients decode it.
#[derive(Debug, Clone)]
pub enum OutputDef {
    Text { mime_type: String },
    Json { mime_type: String },
    Binary { mime_type: String },
    Schema { schema: Schema, mime_type: String },
}

impl OutputDef {
    pub fn text() -> Self {
        OutputDef::Text {
            mime_type: "text/plain".to_string(),
        }
    }

    /// Any JSON value: numbers, booleans, objects, arrays.
    pub fn json() -> Self {
        OutputDef::Json {
            mime_type: "application/json".to_string(),
        }
    }

    pub fn binary() -> Self {
        OutputDef::Binary {
            mime_type: "application/octet-stream".to_string(),
        }
    }

    pub fn schema(schema: Schema) -> Self {
        OutputDef::Schema {
            schema,
            mime_type: "application/json".to_string(),
        }
    }

    pub fn with_mime_type(mut self, mime: impl Into<String>) -> Self {
        match &mut self {
            OutputDef::Text { mime_type }
            | OutputDef::Json { mime_type }
            | OutputDef::Binary { mime_type }
            | OutputDef::Schema { mime_type, .. } => *mime_type = mime.into(),
        }
        self
    }

    pub fn mime_type(&self) -> &str {
        match self {
            OutputDef::Text { mime_type }
            | OutputDef::Json { mime_type }
            | OutputDef::Binary { mime_type }
            | OutputDef::Schema { mime_type, .. } => mime_type,
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, OutputDef::Binary { .. })
    }

    /// Decode a textual response body.
    pub fn deserialize(&self, body: &str) -> Result<Payload, DeserializeError> {
        match self {
            OutputDef::Text { .. } => Ok(Payload::Text(body.to_string())),
            OutputDef::Json { .. } => serde_json::from_str(body)
                .map(Payload::Json)
                .map_err(|e| DeserializeError::Malformed(e.to_string())),
            OutputDef::Binary { .. } => Ok(Payload::Binary(body.to_string().into_bytes().into())),
            OutputDef::Schema { schema, .. } => schema
                .deserialize(Some(body))
                .map(|value| Payload::Json(value.unwrap_or(Value::Null))),
        }
    }
}
