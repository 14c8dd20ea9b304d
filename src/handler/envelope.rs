//! Envelope module
//!
//! Response bodies are JSON objects. Handlers describe them with typed
//! structs and convert through `to_envelope`.

use chrono::{DateTime, SecondsFormat, Utc};
use hyper::StatusCode;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{HandlerFault, HandlerResult};

/// JSON object returned as a response body
pub type Envelope = Map<String, Value>;

/// Envelope plus the status code it is sent with
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: StatusCode,
    pub envelope: Envelope,
}

impl Reply {
    pub const fn new(status: StatusCode, envelope: Envelope) -> Self {
        Self { status, envelope }
    }

    pub const fn ok(envelope: Envelope) -> Self {
        Self::new(StatusCode::OK, envelope)
    }

    /// String field of the envelope, if present
    pub fn field(&self, key: &str) -> Option<&str> {
        self.envelope.get(key).and_then(Value::as_str)
    }
}

/// Serialize a typed response into an envelope
pub fn to_envelope<T: Serialize>(route: &'static str, value: &T) -> HandlerResult<Envelope> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        _ => Err(HandlerFault::NotAnObject(route)),
    }
}

/// ISO-8601 / RFC 3339 timestamp with microseconds, UTC
pub fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Micros, true)
}
