//! Handler return values.
//!
//! A handler returns either a plain payload or an [`ApiResult`] that also
//! carries a status code, headers and cookies. Both are normalized into a
//! [`HandlerOutput`] through [`IntoOutput`].

use std::collections::BTreeMap;
use std::fmt;

use axum::http::StatusCode;
use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;

use crate::api::Payload;
use crate::server::error::HandlerError;

/// A header or cookie value: string, boolean or number.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Str(String),
    Bool(bool),
    Num(f64),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Str(s) => f.write_str(s),
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Num(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Str(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Str(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

macro_rules! field_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    FieldValue::Num(value as f64)
                }
            }
        )*
    };
}

field_from_number!(i32, i64, u32, u64, f64);

/// Header or cookie map.
pub type Fields = BTreeMap<String, FieldValue>;

/// A result with an explicit status, headers and cookies.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResult {
    pub payload: Option<Payload>,
    pub status: StatusCode,
    pub headers: Fields,
    pub cookies: Option<Fields>,
}

impl ApiResult {
    pub fn new(payload: impl Into<Payload>) -> Self {
        Self::from_payload(Some(payload.into()))
    }

    /// A result without a body.
    pub fn empty() -> Self {
        Self::from_payload(None)
    }

    fn from_payload(payload: Option<Payload>) -> Self {
        Self {
            payload,
            status: StatusCode::OK,
            headers: Fields::new(),
            cookies: None,
        }
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn cookie(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.cookies
            .get_or_insert_with(Fields::new)
            .insert(name.into(), value.into());
        self
    }
}

/// The normalized shape of a handler's return value.
#[derive(Debug, Clone, PartialEq)]
pub enum HandlerOutput {
    Plain(Option<Payload>),
    Wrapped(ApiResult),
}

/// Conversion of handler return values.
pub trait IntoOutput {
    fn into_output(self) -> Result<HandlerOutput, HandlerError>;
}

impl IntoOutput for HandlerOutput {
    fn into_output(self) -> Result<HandlerOutput, HandlerError> {
        Ok(self)
    }
}

impl IntoOutput for ApiResult {
    fn into_output(self) -> Result<HandlerOutput, HandlerError> {
        Ok(HandlerOutput::Wrapped(self))
    }
}

impl IntoOutput for () {
    fn into_output(self) -> Result<HandlerOutput, HandlerError> {
        Ok(HandlerOutput::Plain(None))
    }
}

impl IntoOutput for Payload {
    fn into_output(self) -> Result<HandlerOutput, HandlerError> {
        Ok(HandlerOutput::Plain(Some(self)))
    }
}

impl<T: IntoOutput> IntoOutput for Option<T> {
    fn into_output(self) -> Result<HandlerOutput, HandlerError> {
        match self {
            Some(value) => value.into_output(),
            None => Ok(HandlerOutput::Plain(None)),
        }
    }
}

macro_rules! output_via_payload {
    ($($ty:ty),*) => {
        $(
            impl IntoOutput for $ty {
                fn into_output(self) -> Result<HandlerOutput, HandlerError> {
                    Ok(HandlerOutput::Plain(Some(Payload::from(self))))
                }
            }
        )*
    };
}

output_via_payload!(String, &'static str, Value, bool, i32, i64, u32, u64, f64, Bytes, Vec<u8>);

/// Serialize any `Serialize` value as a JSON payload.
#[derive(Debug, Clone)]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoOutput for Json<T> {
    fn into_output(self) -> Result<HandlerOutput, HandlerError> {
        let value = serde_json::to_value(self.0)?;
        Ok(HandlerOutput::Plain(Some(Payload::Json(value))))
    }
}
