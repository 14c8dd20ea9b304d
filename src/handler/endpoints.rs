//! Endpoint handlers
//!
//! Each handler is a pure function of the request context, the service
//! identity and the build time of the response.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use super::context::RequestContext;
use super::envelope::{timestamp, to_envelope, Envelope};
use crate::config::ServiceInfo;
use crate::error::HandlerResult;

#[derive(Debug, Serialize)]
struct RootResponse<'a> {
    message: String,
    status: &'static str,
    timestamp: String,
    processed_by: &'a str,
    language: &'a str,
    framework: &'a str,
}

#[derive(Debug, Serialize)]
struct ApiHelloResponse<'a> {
    message: String,
    status: &'static str,
    timestamp: String,
    processed_by: &'a str,
    request_data: Option<Value>,
    python_version: &'a str,
    response_from: &'a str,
}

#[derive(Debug, Serialize)]
struct HealthResponse<'a> {
    message: String,
    status: &'static str,
    timestamp: String,
    service: &'a str,
}

/// `GET|POST /` - greeting with the service's identity tags; body ignored
pub fn root(
    _ctx: &RequestContext<'_>,
    info: &ServiceInfo,
    now: DateTime<Utc>,
) -> HandlerResult<Envelope> {
    to_envelope(
        "root",
        &RootResponse {
            message: format!("Hello from {}", info.name),
            status: "success",
            timestamp: timestamp(now),
            processed_by: &info.processed_by,
            language: &info.language,
            framework: &info.framework,
        },
    )
}

/// `GET|POST /api/hello` - echoes a JSON POST body under `request_data`
pub fn api_hello(
    ctx: &RequestContext<'_>,
    info: &ServiceInfo,
    now: DateTime<Utc>,
) -> HandlerResult<Envelope> {
    to_envelope(
        "api_hello",
        &ApiHelloResponse {
            message: format!("Hello from {} /api/hello endpoint", info.name),
            status: "success",
            timestamp: timestamp(now),
            processed_by: &info.processed_by,
            request_data: ctx.json_body(),
            python_version: &info.runtime_version,
            response_from: &info.name,
        },
    )
}

/// `GET /health`
pub fn health(
    _ctx: &RequestContext<'_>,
    info: &ServiceInfo,
    now: DateTime<Utc>,
) -> HandlerResult<Envelope> {
    to_envelope(
        "health",
        &HealthResponse {
            message: format!("{} is healthy", info.name),
            status: "healthy",
            timestamp: timestamp(now),
            service: &info.health_service,
        },
    )
}
