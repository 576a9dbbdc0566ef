//! Request construction helpers.
//!
//! # Responsibilities
//! - Group input values by parameter location
//! - Substitute path variables and build the query string
//! - Encode cookies into one `Cookie` header
//!
//! # Design Decisions
//! - Path and query parts are encoded like `encodeURIComponent`
//! - Values are stringified: strings verbatim, everything else as JSON
//! - Absent input values are skipped

use std::collections::BTreeMap;

use bytes::Bytes;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::api::{OperationDef, ParamKind, ParamLocation, Payload};
use crate::client::error::ClientError;
use crate::routing::PathTemplate;
use crate::server::Input;

/// Characters `encodeURIComponent` leaves alone.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// A request body.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Text(String),
    Binary(Bytes),
}

/// Input values grouped by where they travel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamsByLocation {
    pub cookie: Vec<(String, String)>,
    pub header: BTreeMap<String, String>,
    pub path: BTreeMap<String, String>,
    pub query: Vec<(String, String)>,
    pub body: Option<RequestBody>,
    /// Declared mime type of the body parameter, if any.
    pub body_mime_type: Option<String>,
}

/// Sort `input` into locations following the operation's parameter order.
pub fn params_by_location(op: &OperationDef, input: &Input) -> ParamsByLocation {
    let mut params = ParamsByLocation::default();
    for (property, param) in op.inputs() {
        let Some(value) = input.get(property) else {
            continue;
        };
        let name = param.wire_name(property).to_string();
        match param.location() {
            ParamLocation::Body => {
                params.body = Some(match (param.kind(), value) {
                    (ParamKind::BodyBinary { .. }, Payload::Binary(bytes)) => {
                        RequestBody::Binary(bytes.clone())
                    }
                    _ => RequestBody::Text(value.to_param_string()),
                });
                params.body_mime_type = Some(
                    param
                        .mime_type()
                        .unwrap_or("application/json")
                        .to_string(),
                );
            }
            ParamLocation::Cookie => params.cookie.push((name, value.to_param_string())),
            ParamLocation::Header => {
                params.header.insert(name, value.to_param_string());
            }
            ParamLocation::Path => {
                params.path.insert(name, value.to_param_string());
            }
            ParamLocation::Query => params.query.push((name, value.to_param_string())),
        }
    }
    params
}

/// Fill a path template, encoding each value.
pub fn build_path(template: &str, path_vars: &BTreeMap<String, String>) -> Result<String, ClientError> {
    PathTemplate::parse(template)
        .fill(|name| {
            path_vars
                .get(name)
                .filter(|value| !value.is_empty())
                .map(|value| encode_component(value))
        })
        .map_err(ClientError::MissingPathVariable)
}

/// `?k=v&k2=v2`, or an empty string without parameters.
pub fn build_query(query: &[(String, String)]) -> String {
    if query.is_empty() {
        return String::new();
    }
    let pairs: Vec<String> = query
        .iter()
        .map(|(k, v)| format!("{}={}", encode_component(k), encode_component(v)))
        .collect();
    format!("?{}", pairs.join("&"))
}

pub fn build_url(
    endpoint: &str,
    template: &str,
    path_vars: &BTreeMap<String, String>,
    query: &[(String, String)],
) -> Result<String, ClientError> {
    let path = build_path(template, path_vars)?;
    Ok(format!("{endpoint}{path}{}", build_query(query)))
}

/// `k=v;k2=v2`, or `None` without cookies.
pub fn encode_cookies(cookies: &[(String, String)]) -> Option<String> {
    if cookies.is_empty() {
        return None;
    }
    let pairs: Vec<String> = cookies.iter().map(|(k, v)| format!("{k}={v}")).collect();
    Some(pairs.join(";"))
}

/// Header parameters plus a `Cookie` header when cookies are present.
pub fn build_headers(
    mut headers: BTreeMap<String, String>,
    cookies: &[(String, String)],
) -> BTreeMap<String, String> {
    if let Some(cookie) = encode_cookies(cookies) {
        headers.insert("Cookie".to_string(), cookie);
    }
    headers
}
