//! Error translation
//!
//! Turns a routing miss or a handler fault into the uniform error envelope.

use chrono::{DateTime, Utc};
use hyper::StatusCode;
use serde_json::Value;

use super::envelope::{timestamp, Envelope, Reply};
use crate::config::ServiceInfo;
use crate::error::HandlerFault;
use crate::logger::Logger;
use crate::routing::Route;

pub const NOT_FOUND_MESSAGE: &str = "Endpoint not found";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Error envelope: `{error, status:"error", timestamp, processed_by}`
///
/// Built field by field so that producing it cannot fail.
fn error_envelope(message: &str, info: &ServiceInfo, now: DateTime<Utc>) -> Envelope {
    let mut envelope = Envelope::new();
    envelope.insert("error".to_string(), Value::from(message));
    envelope.insert("status".to_string(), Value::from("error"));
    envelope.insert("timestamp".to_string(), Value::from(timestamp(now)));
    envelope.insert(
        "processed_by".to_string(),
        Value::from(info.processed_by.as_str()),
    );
    envelope
}

/// 404 for a request with no matching route
pub fn not_found(
    method: &hyper::Method,
    path: &str,
    info: &ServiceInfo,
    logger: &dyn Logger,
    now: DateTime<Utc>,
) -> Reply {
    logger.warn(&format!(
        "{}: Endpoint not found: {method} {path}",
        info.name
    ));
    Reply::new(
        StatusCode::NOT_FOUND,
        error_envelope(NOT_FOUND_MESSAGE, info, now),
    )
}

/// 500 for a handler fault; the fault detail is logged, never returned
pub fn internal_error(
    route: &Route,
    fault: &HandlerFault,
    info: &ServiceInfo,
    logger: &dyn Logger,
    now: DateTime<Utc>,
) -> Reply {
    logger.error(&format!(
        "{}: Internal server error in {} ({}): {fault}",
        info.name, route.name, route.path
    ));
    Reply::new(
        StatusCode::INTERNAL_SERVER_ERROR,
        error_envelope(INTERNAL_ERROR_MESSAGE, info, now),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::endpoints;
    use crate::logger::{Level, MemoryLogger};
    use hyper::Method;

    #[test]
    fn test_not_found_envelope_and_log() {
        let logger = MemoryLogger::default();
        let info = ServiceInfo::default();
        let reply = not_found(&Method::DELETE, "/missing", &info, &logger, Utc::now());

        assert_eq!(reply.status, StatusCode::NOT_FOUND);
        assert_eq!(reply.field("error"), Some(NOT_FOUND_MESSAGE));
        assert_eq!(reply.field("status"), Some("error"));
        assert_eq!(reply.field("processed_by"), Some("API2-Rust"));
        assert!(reply.field("timestamp").is_some());
        assert_eq!(reply.envelope.len(), 4);

        let warnings = logger.messages_at(Level::Warn);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("/missing"));
    }

    #[test]
    fn test_internal_error_hides_detail() {
        let logger = MemoryLogger::default();
        let info = ServiceInfo::default();
        let route = Route::new("root", "/", &[Method::GET], endpoints::root);
        let fault = HandlerFault::Injected("disk on fire".to_string());
        let reply = internal_error(&route, &fault, &info, &logger, Utc::now());

        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(reply.field("error"), Some(INTERNAL_ERROR_MESSAGE));
        assert_eq!(reply.field("status"), Some("error"));
        assert_eq!(reply.envelope.len(), 4);
        let body = Value::Object(reply.envelope).to_string();
        assert!(!body.contains("disk on fire"));

        let errors = logger.messages_at(Level::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("disk on fire"));
    }
}
