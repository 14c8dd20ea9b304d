//! HTTP response building module
//!
//! Serializes envelopes and wraps them in `application/json` responses.

use chrono::{SecondsFormat, Utc};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::config::ServiceInfo;
use crate::logger::Logger;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Error envelope sent when a response cannot be serialized or built
fn fallback_body(info: &ServiceInfo) -> Bytes {
    let body = serde_json::json!({
        "error": "Internal server error",
        "status": "error",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        "processed_by": info.processed_by,
    });
    Bytes::from(body.to_string())
}

/// Serialize a response body to JSON bytes
///
/// A serialization failure downgrades the response to a 500 error envelope.
pub fn encode_json<T: Serialize>(
    status: StatusCode,
    body: &T,
    info: &ServiceInfo,
    logger: &dyn Logger,
) -> (StatusCode, Bytes) {
    match serde_json::to_vec(body) {
        Ok(json) => (status, Bytes::from(json)),
        Err(e) => {
            logger.error(&format!("Failed to serialize response: {e}"));
            (StatusCode::INTERNAL_SERVER_ERROR, fallback_body(info))
        }
    }
}

/// Build JSON response
pub fn build_json_response(
    status: StatusCode,
    body: Bytes,
    info: &ServiceInfo,
    logger: &dyn Logger,
) -> Response<Full<Bytes>> {
    let content_length = body.len();
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
        .header(CONTENT_LENGTH, content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            logger.error(&format!("Failed to build {status} response: {e}"));
            fallback_response(info)
        })
}

fn fallback_response(info: &ServiceInfo) -> Response<Full<Bytes>> {
    let body = fallback_body(info);
    let content_length = HeaderValue::from(body.len());
    let mut response = Response::new(Full::new(body));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
    headers.insert(CONTENT_LENGTH, content_length);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::NoopLogger;
    use serde::ser::Error as _;
    use serde_json::Value;
    use std::collections::HashMap;

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("refused"))
        }
    }

    #[test]
    fn test_encode_json() {
        let body = HashMap::from([("status", "healthy")]);
        let info = ServiceInfo::default();
        let (status, bytes) = encode_json(StatusCode::OK, &body, &info, &NoopLogger);
        assert_eq!(status, StatusCode::OK);
        assert_eq!(&bytes[..], br#"{"status":"healthy"}"#);
    }

    #[test]
    fn test_encode_json_failure_falls_back_to_error_envelope() {
        let info = ServiceInfo::default();
        let (status, bytes) = encode_json(StatusCode::OK, &Unserializable, &info, &NoopLogger);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Internal server error");
        assert_eq!(body["status"], "error");
        assert_eq!(body["processed_by"], "API2-Rust");
        assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
        assert_eq!(body.as_object().unwrap().len(), 4);
    }

    #[test]
    fn test_build_json_response_headers() {
        let info = ServiceInfo::default();
        let body = Bytes::from_static(b"{}");
        let resp = build_json_response(StatusCode::NOT_FOUND, body, &info, &NoopLogger);
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.headers()["content-type"], "application/json");
        assert_eq!(resp.headers()["content-length"], "2");
    }

    #[test]
    fn test_fallback_response_is_json() {
        let resp = fallback_response(&ServiceInfo::default());
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(resp.headers()["content-type"], "application/json");
        assert_ne!(resp.headers()["content-length"], "0");
    }
}
