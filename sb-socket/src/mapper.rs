//! Payload decoders for each event kind.
//!
//! Every decoder has the same signature so the registry can hold them in a
//! table. Only the reconnect-attempt decoder can fail; the error decoder
//! always produces a value, degrading to a generic message when the payload
//! shape is not recognized.

use serde_json::Value;
use thiserror::Error;

use sb_core::constants::{FALLBACK_ERROR_MESSAGE, UNKNOWN_ERROR_PREFIX};
use sb_core::error::SbError;

use crate::events::{EventKind, MappedResult};
use crate::payload::{PayloadValue, SocketError};

/// A payload decoder.
pub type Decoder = fn(&[PayloadValue]) -> Result<MappedResult, DecodeError>;

/// A payload did not have the shape its event kind requires.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("{kind} payload element {index}: expected {expected}, found {found}")]
    TypeMismatch {
        kind: EventKind,
        index: usize,
        expected: &'static str,
        found: &'static str,
    },
}

impl From<DecodeError> for SbError {
    fn from(e: DecodeError) -> Self {
        SbError::Decode(e.to_string())
    }
}

/// Shared decoder for every kind whose payload carries no information.
pub fn decode_unit(_payload: &[PayloadValue]) -> Result<MappedResult, DecodeError> {
    Ok(MappedResult::Unit)
}

/// Pass the payload through untouched.
pub fn decode_message(payload: &[PayloadValue]) -> Result<MappedResult, DecodeError> {
    Ok(MappedResult::Message(payload.to_vec()))
}

/// Read the attempt counter from element 0.
pub fn decode_reconnect_attempt(payload: &[PayloadValue]) -> Result<MappedResult, DecodeError> {
    let mismatch = |found: &'static str| DecodeError::TypeMismatch {
        kind: EventKind::ReconnectAttempt,
        index: 0,
        expected: "32-bit integer",
        found,
    };

    let attempt = match payload.first() {
        None => return Err(mismatch("nothing")),
        Some(PayloadValue::Int(n)) => {
            i32::try_from(*n).map_err(|_| mismatch("out-of-range integer"))?
        }
        Some(PayloadValue::Json(Value::Number(n))) => n
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .ok_or_else(|| mismatch("out-of-range number"))?,
        Some(other) => return Err(mismatch(other.shape())),
    };
    Ok(MappedResult::ReconnectAttempt(attempt))
}

/// Turn element 0 into a `SocketError`. Never fails.
pub fn decode_error(payload: &[PayloadValue]) -> Result<MappedResult, DecodeError> {
    let error = match payload.first() {
        Some(value) => error_from_value(value),
        None => SocketError::new(FALLBACK_ERROR_MESSAGE),
    };
    Ok(MappedResult::Error(error))
}

/// First matching rule wins.
fn error_from_value(value: &PayloadValue) -> SocketError {
    match value {
        PayloadValue::Error(e) => e.clone(),
        PayloadValue::Text(message) => SocketError::new(message.as_str()),
        PayloadValue::Map(map) => match map.get("message") {
            Some(PayloadValue::Text(message)) => SocketError::new(message.as_str()),
            _ => SocketError::new(FALLBACK_ERROR_MESSAGE),
        },
        PayloadValue::Json(Value::Object(obj)) => match obj.get("message") {
            Some(Value::String(message)) => SocketError::new(message.as_str()),
            // Scalar messages are coerced to text; anything else keeps the whole object.
            Some(scalar @ (Value::Number(_) | Value::Bool(_))) => {
                SocketError::new(scalar.to_string())
            }
            _ => SocketError::new(Value::Object(obj.clone()).to_string()),
        },
        other => SocketError::new(format!("{UNKNOWN_ERROR_PREFIX}{other}")),
    }
}
