//! Untyped payload values delivered alongside wire events.
//!
//! A socket.io event carries an ordered list of arguments whose shapes are
//! only known at runtime. `PayloadValue` makes those shapes explicit so the
//! decoders can match on them exhaustively.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

/// A structured error value, either received as-is from the transport or
/// synthesized from an error-ish payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketError {
    message: String,
}

impl SocketError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The human-readable error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for SocketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for SocketError {}

/// One element of a raw event payload.
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadValue {
    /// An already-structured error value.
    Error(SocketError),
    /// A plain string.
    Text(String),
    /// A string-keyed mapping built by the host (not parsed from JSON).
    Map(BTreeMap<String, PayloadValue>),
    /// A JSON object or array as delivered by a JSON-speaking client.
    Json(Value),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// A binary attachment.
    Binary(Vec<u8>),
    Null,
}

impl PayloadValue {
    /// Convert a JSON value, narrowing scalars to their dedicated variants.
    ///
    /// Objects and arrays stay as `Json`; integers too large for `i64` stay
    /// as `Json` numbers so no precision is lost.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::String(s) => Self::Text(s),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int(i)
                } else if n.is_u64() {
                    Self::Json(Value::Number(n))
                } else {
                    n.as_f64().map(Self::Float).unwrap_or(Self::Null)
                }
            }
            other @ (Value::Array(_) | Value::Object(_)) => Self::Json(other),
        }
    }

    /// Render this value as JSON.
    ///
    /// Structured errors become `{"message": ...}`, binary data becomes an
    /// array of byte values, and non-finite floats become `null`.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Error(e) => serde_json::json!({ "message": e.message() }),
            Self::Text(s) => Value::String(s.clone()),
            Self::Map(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Self::Json(v) => v.clone(),
            Self::Int(i) => Value::from(*i),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Self::Bool(b) => Value::Bool(*b),
            Self::Binary(bytes) => Value::Array(bytes.iter().map(|b| Value::from(*b)).collect()),
            Self::Null => Value::Null,
        }
    }

    /// Short name of this value's shape, used in decode error messages.
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Error(_) => "error",
            Self::Text(_) => "string",
            Self::Map(_) => "map",
            Self::Json(Value::Object(_)) => "json object",
            Self::Json(Value::Array(_)) => "json array",
            Self::Json(_) => "json value",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Bool(_) => "boolean",
            Self::Binary(_) => "binary",
            Self::Null => "null",
        }
    }
}

impl fmt::Display for PayloadValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error(e) => write!(f, "{e}"),
            Self::Text(s) => f.write_str(s),
            Self::Map(_) => write!(f, "{}", self.to_json()),
            Self::Json(v) => write!(f, "{v}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Binary(bytes) => write!(f, "<{} bytes>", bytes.len()),
            Self::Null => f.write_str("null"),
        }
    }
}

impl From<Value> for PayloadValue {
    fn from(value: Value) -> Self {
        Self::from_json(value)
    }
}

impl From<SocketError> for PayloadValue {
    fn from(e: SocketError) -> Self {
        Self::Error(e)
    }
}

impl From<&str> for PayloadValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for PayloadValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for PayloadValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for PayloadValue {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for PayloadValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for PayloadValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Vec<u8>> for PayloadValue {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Binary(bytes)
    }
}

impl From<BTreeMap<String, PayloadValue>> for PayloadValue {
    fn from(map: BTreeMap<String, PayloadValue>) -> Self {
        Self::Map(map)
    }
}

/// Build a payload from the argument list of a JSON-speaking client.
pub fn payload_from_json(args: Vec<Value>) -> Vec<PayloadValue> {
    args.into_iter().map(PayloadValue::from_json).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_narrows_scalars() {
        assert_eq!(PayloadValue::from_json(json!("hi")), PayloadValue::Text("hi".into()));
        assert_eq!(PayloadValue::from_json(json!(7)), PayloadValue::Int(7));
        assert_eq!(PayloadValue::from_json(json!(-2)), PayloadValue::Int(-2));
        assert_eq!(PayloadValue::from_json(json!(1.5)), PayloadValue::Float(1.5));
        assert_eq!(PayloadValue::from_json(json!(true)), PayloadValue::Bool(true));
        assert_eq!(PayloadValue::from_json(json!(null)), PayloadValue::Null);
    }

    #[test]
    fn test_from_json_keeps_objects_and_arrays() {
        let obj = json!({"message": "timeout"});
        assert_eq!(PayloadValue::from_json(obj.clone()), PayloadValue::Json(obj));

        let arr = json!([1, 2]);
        assert_eq!(PayloadValue::from_json(arr.clone()), PayloadValue::Json(arr));
    }

    #[test]
    fn test_from_json_large_unsigned_stays_json() {
        let big = json!(u64::MAX);
        assert_eq!(PayloadValue::from_json(big.clone()), PayloadValue::Json(big));
    }

    #[test]
    fn test_to_json() {
        let mut map = BTreeMap::new();
        map.insert("message".to_string(), PayloadValue::from("oops"));
        map.insert("code".to_string(), PayloadValue::Int(3));
        assert_eq!(
            PayloadValue::Map(map).to_json(),
            json!({"message": "oops", "code": 3})
        );

        assert_eq!(
            PayloadValue::Error(SocketError::new("bad")).to_json(),
            json!({"message": "bad"})
        );
        assert_eq!(PayloadValue::Binary(vec![1, 2]).to_json(), json!([1, 2]));
        assert_eq!(PayloadValue::Float(f64::NAN).to_json(), json!(null));
    }

    #[test]
    fn test_display() {
        assert_eq!(PayloadValue::Int(42).to_string(), "42");
        assert_eq!(PayloadValue::from("text").to_string(), "text");
        assert_eq!(PayloadValue::Bool(false).to_string(), "false");
        assert_eq!(PayloadValue::Float(3.0).to_string(), "3.0");
        assert_eq!(PayloadValue::Float(-0.25).to_string(), "-0.25");
        assert_eq!(PayloadValue::Binary(vec![0; 4]).to_string(), "<4 bytes>");
        assert_eq!(PayloadValue::Json(json!([1, "a"])).to_string(), r#"[1,"a"]"#);
    }

    #[test]
    fn test_shape_names() {
        assert_eq!(PayloadValue::Int(1).shape(), "integer");
        assert_eq!(PayloadValue::Json(json!({})).shape(), "json object");
        assert_eq!(PayloadValue::Json(json!(u64::MAX)).shape(), "json value");
        assert_eq!(PayloadValue::Null.shape(), "null");
    }

    #[test]
    fn test_payload_from_json() {
        let payload = payload_from_json(vec![json!("hello"), json!(7)]);
        assert_eq!(payload, vec![PayloadValue::from("hello"), PayloadValue::Int(7)]);
    }
}
