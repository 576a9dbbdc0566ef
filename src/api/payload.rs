//! Decoded values exchanged between the wire and operation code.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A single decoded parameter or output value.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// A schema-checked value (strings included).
    Json(Value),
    /// Raw text, e.g. a `text/plain` body.
    Text(String),
    /// Raw bytes, e.g. an `application/octet-stream` body.
    Binary(Bytes),
}

impl Payload {
    /// Borrow the value as text if it is textual.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Payload::Text(text) => Some(text),
            Payload::Json(Value::String(text)) => Some(text),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Payload::Binary(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Convert into a serde value; binary payloads are not representable.
    pub fn to_value(&self) -> Option<Value> {
        match self {
            Payload::Json(value) => Some(value.clone()),
            Payload::Text(text) => Some(Value::String(text.clone())),
            Payload::Binary(_) => None,
        }
    }

    /// Deserialize into a concrete type.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        match self.to_value() {
            Some(value) => serde_json::from_value(value),
            None => Err(serde::de::Error::custom("binary payload cannot be deserialized")),
        }
    }

    /// The string form used on the wire for path, query, header and cookie values.
    pub fn to_param_string(&self) -> String {
        match self {
            Payload::Text(text) | Payload::Json(Value::String(text)) => text.clone(),
            Payload::Json(value) => value.to_string(),
            Payload::Binary(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        }
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Json(value)
    }
}

impl From<bool> for Payload {
    fn from(value: bool) -> Self {
        Payload::Json(Value::Bool(value))
    }
}

macro_rules! payload_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Payload {
                fn from(value: $ty) -> Self {
                    Payload::Json(Value::from(value))
                }
            }
        )*
    };
}

payload_from_number!(i32, i64, u32, u64, f64);

impl From<Bytes> for Payload {
    fn from(bytes: Bytes) -> Self {
        Payload::Binary(bytes)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Payload::Binary(Bytes::from(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_param_string_values() {
        assert_eq!(Payload::from(5).to_param_string(), "5");
        assert_eq!(Payload::from(true).to_param_string(), "true");
        assert_eq!(Payload::from("myString").to_param_string(), "myString");
        assert_eq!(Payload::Json(json!("quoted")).to_param_string(), "quoted");
        assert_eq!(
            Payload::Json(json!({"name": "aName", "age": 65})).to_param_string(),
            r#"{"age":65,"name":"aName"}"#
        );
    }

    #[test]
    fn test_text_accessors() {
        assert_eq!(Payload::Json(json!("a")).as_str(), Some("a"));
        assert_eq!(Payload::Text("b".into()).as_str(), Some("b"));
        assert_eq!(Payload::Json(json!(1)).as_str(), None);
    }

    #[test]
    fn test_deserialize_binary_fails() {
        let payload = Payload::from(vec![1u8, 2, 3]);
        assert!(payload.deserialize::<Vec<u8>>().is_err());
        assert_eq!(payload.as_bytes().map(|b| b.len()), Some(3));
    }
}
