//! Per-request parameter pipeline.
//!
//! # Responsibilities
//! - Pull every declared parameter from the request extractor
//! - Percent-decode query and path values
//! - Run the schema deserializer
//! - Invoke the handler and encode its output
//!
//! # Data Flow
//! ```text
//! RequestExtractor → extract (all params, errors aggregated)
//!     → 400 ServerResult | Input
//!     → Handler::call → encode → ServerResult
//! ```
//!
//! # Design Decisions
//! - Every failing parameter is reported in one 400 response
//! - A path parameter that is missing or empty always fails
//! - Handler `HttpError`s become results; anything else is a `DispatchError`

use std::borrow::Cow;
use std::fmt;

use percent_encoding::percent_decode_str;
use tracing::{debug, warn};

use crate::api::{OperationDef, ParamDef, ParamKind, ParamLocation, Payload};
use crate::server::error::{DispatchError, HandlerError, HttpError};
use crate::server::extractor::RequestExtractor;
use crate::server::handler::BoxedHandler;
use crate::server::input::Input;
use crate::server::result::{encode, ServerResult};

/// An operation bound to its handler.
pub struct ServerOperation {
    name: String,
    def: OperationDef,
    handler: BoxedHandler,
}

impl fmt::Debug for ServerOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerOperation")
            .field("name", &self.name)
            .field("route", &self.def.route_key())
            .finish()
    }
}

impl ServerOperation {
    pub fn new(name: impl Into<String>, def: OperationDef, handler: BoxedHandler) -> Self {
        Self {
            name: name.into(),
            def,
            handler,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn def(&self) -> &OperationDef {
        &self.def
    }

    /// Decode every declared parameter.
    ///
    /// Fails with one 400 error listing every failing parameter.
    pub fn extract(&self, extractor: &dyn RequestExtractor) -> Result<Input, HttpError> {
        let mut input = Input::new();
        let mut failures = Vec::new();

        for (property, param) in self.def.inputs() {
            match extract_param(property, param, extractor) {
                Ok(Some(value)) => input.insert(property.as_str(), value),
                Ok(None) => {}
                Err(reason) => failures.push(format!(
                    "Error parsing {} param '{}': {reason}",
                    param.location(),
                    param.wire_name(property)
                )),
            }
        }

        if failures.is_empty() {
            Ok(input)
        } else {
            Err(HttpError::bad_request(failures.join("\n")))
        }
    }

    /// Run the full pipeline for one request.
    pub async fn execute(&self, extractor: &dyn RequestExtractor) -> Result<ServerResult, DispatchError> {
        let input = match self.extract(extractor) {
            Ok(input) => input,
            Err(err) => {
                warn!(operation = %self.name, error = %err, "Rejected request parameters");
                return Ok(ServerResult::from_http_error(&err));
            }
        };

        debug!(operation = %self.name, params = input.len(), "Invoking handler");

        match self.handler.call(input).await {
            Ok(output) => Ok(encode(self.def.output_def(), output)),
            Err(HandlerError::Http(err)) => {
                debug!(
                    operation = %self.name,
                    status = err.status().as_u16(),
                    "Handler answered with error"
                );
                Ok(ServerResult::from_http_error(&err))
            }
            Err(HandlerError::Unexpected(source)) => Err(DispatchError {
                operation: self.name.clone(),
                source,
            }),
        }
    }
}

/// Every `%` must start a two-digit hex escape.
fn percent_decode(raw: &str) -> Result<Cow<'_, str>, String> {
    let bytes = raw.as_bytes();
    let malformed = bytes.iter().enumerate().any(|(i, &b)| {
        b == b'%'
            && !matches!(
                (bytes.get(i + 1), bytes.get(i + 2)),
                (Some(hi), Some(lo)) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit()
            )
    });
    if malformed {
        return Err("Malformed percent-encoding".to_string());
    }

    percent_decode_str(raw)
        .decode_utf8()
        .map_err(|_| "Invalid percent-encoded UTF-8".to_string())
}

fn extract_param(
    property: &str,
    param: &ParamDef,
    extractor: &dyn RequestExtractor,
) -> Result<Option<Payload>, String> {
    let schema = match param.kind() {
        ParamKind::BodyBinary { .. } => {
            let body = extractor.body_binary().map_err(|e| e.to_string())?;
            return Ok(body.map(Payload::Binary));
        }
        ParamKind::BodyText { .. } => {
            let body = extractor.body_text().map_err(|e| e.to_string())?;
            return Ok(body.map(Payload::Text));
        }
        ParamKind::Validated(schema) => schema,
    };

    let name = param.wire_name(property);
    let raw = match param.location() {
        ParamLocation::Body => extractor.body_text(),
        ParamLocation::Cookie => extractor.cookie(name),
        ParamLocation::Header => extractor.header(name),
        ParamLocation::Query => extractor.query(name),
        ParamLocation::Path => extractor.path(name),
    }
    .map_err(|e| e.to_string())?;

    let decoded = match param.location() {
        ParamLocation::Query => raw.as_deref().map(percent_decode).transpose()?,
        ParamLocation::Path => match raw.as_deref() {
            Some(raw) if !raw.is_empty() => Some(percent_decode(raw)?),
            _ => return Err("Path parameter not found".to_string()),
        },
        _ => raw.as_deref().map(Cow::Borrowed),
    };

    schema
        .deserialize(decoded.as_deref())
        .map(|value| value.map(Payload::Json))
        .map_err(|e| e.to_string())
}
