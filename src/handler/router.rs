//! Request routing entry point
//!
//! Adapts hyper requests to the dispatcher: reads the optional JSON body,
//! dispatches, serializes the reply and writes the access log line.

use http_body_util::{BodyExt, Full, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{CONTENT_LENGTH, CONTENT_TYPE, REFERER, USER_AGENT};
use hyper::http::request::Parts;
use hyper::{Method, Request, Response, StatusCode, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use super::context::{is_json_content_type, RequestContext};
use super::dispatch::dispatch;
use crate::config::AppState;
use crate::http;
use crate::logger::{AccessLogEntry, Logger};

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let logger = state.logger.as_ref();
    let (parts, body) = req.into_parts();

    let content_type = header_str(&parts, CONTENT_TYPE);
    let json_post = parts.method == Method::POST && content_type.is_some_and(is_json_content_type);
    let body_bytes = if json_post {
        read_body(&parts, body, state.config.http.max_body_size, logger).await
    } else {
        None
    };

    let info = &state.config.service;
    let ctx = RequestContext::new(&parts.method, parts.uri.path())
        .with_body(content_type, body_bytes.as_deref());
    let reply = dispatch(&state.routes, info, logger, &ctx);

    let (status, body) = http::encode_json(reply.status, &reply.envelope, info, logger);
    let body_len = body.len();
    let response = http::build_json_response(status, body, info, logger);

    if state.config.logging.access_log {
        log_access(&state, &parts, peer_addr, status, body_len, started);
    }

    Ok(response)
}

/// Read the request body, bounded by `max_body_size`
///
/// Oversized or unreadable bodies are logged and treated as absent.
async fn read_body<B>(
    parts: &Parts,
    body: B,
    max_body_size: u64,
    logger: &dyn Logger,
) -> Option<Bytes>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    if let Some(size) = header_str(parts, CONTENT_LENGTH).and_then(|v| v.parse::<u64>().ok()) {
        if size > max_body_size {
            logger.warn(&format!(
                "Request body too large: {size} bytes (max: {max_body_size}), ignoring body"
            ));
            return None;
        }
    }

    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Some(collected.to_bytes()),
        Err(e) => {
            logger.warn(&format!("Failed to read request body, ignoring it: {e}"));
            None
        }
    }
}

fn header_str(parts: &Parts, name: hyper::header::HeaderName) -> Option<&str> {
    parts.headers.get(name).and_then(|v| v.to_str().ok())
}

fn version_str(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

fn log_access(
    state: &AppState,
    parts: &Parts,
    peer_addr: SocketAddr,
    status: StatusCode,
    body_len: usize,
    started: Instant,
) {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        parts.method.to_string(),
        parts.uri.path().to_string(),
    );
    entry.query = parts.uri.query().map(ToString::to_string);
    entry.http_version = version_str(parts.version).to_string();
    entry.status = status.as_u16();
    entry.body_bytes = body_len;
    entry.referer = header_str(parts, REFERER).map(ToString::to_string);
    entry.user_agent = header_str(parts, USER_AGENT).map(ToString::to_string);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);

    state
        .logger
        .access(&entry.format(&state.config.logging.access_log_format));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, ServiceInfo};
    use crate::error::{HandlerFault, HandlerResult};
    use crate::handler::Envelope;
    use crate::logger::MemoryLogger;
    use crate::routing::{Route, RouteTable};
    use chrono::{DateTime, Utc};
    use serde_json::{json, Value};

    const PEER: &str = "127.0.0.1:40000";

    fn test_state(routes: RouteTable) -> (Arc<AppState>, Arc<MemoryLogger>) {
        let config = Config::load_from("no-such-config-file", None).unwrap();
        let logger = Arc::new(MemoryLogger::default());
        let state = AppState::with_routes(config, routes, logger.clone());
        (Arc::new(state), logger)
    }

    fn request(
        method: Method,
        uri: &str,
        content_type: Option<&str>,
        body: &str,
    ) -> Request<Full<Bytes>> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(ct) = content_type {
            builder = builder.header(CONTENT_TYPE, ct);
        }
        builder.body(Full::new(Bytes::from(body.to_string()))).unwrap()
    }

    async fn send(
        state: &Arc<AppState>,
        req: Request<Full<Bytes>>,
    ) -> (StatusCode, Value, Response<Full<Bytes>>) {
        let resp = handle_request(req, Arc::clone(state), PEER.parse().unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = resp.body().clone().collect().await.unwrap().to_bytes();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        (status, json, resp)
    }

    fn faulting(
        _: &RequestContext<'_>,
        _: &ServiceInfo,
        _: DateTime<Utc>,
    ) -> HandlerResult<Envelope> {
        Err(HandlerFault::Injected("seam".to_string()))
    }

    #[tokio::test]
    async fn test_json_responses_for_every_route() {
        let (state, _) = test_state(RouteTable::standard());

        let (status, body, resp) = send(&state, request(Method::GET, "/", None, "")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(body["status"], "success");
        assert_eq!(body["language"], "Rust");

        let (status, body, _) = send(&state, request(Method::GET, "/health", None, "")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let (status, body, _) = send(&state, request(Method::GET, "/api/hello", None, "")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["request_data"], Value::Null);
    }

    #[tokio::test]
    async fn test_post_json_body_is_echoed() {
        let (state, _) = test_state(RouteTable::standard());
        let req = request(Method::POST, "/api/hello", Some("application/json"), r#"{"x":1}"#);
        let (status, body, _) = send(&state, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["request_data"], json!({"x": 1}));
    }

    #[tokio::test]
    async fn test_post_non_json_or_malformed_body_is_null() {
        let (state, _) = test_state(RouteTable::standard());

        let req = request(Method::POST, "/api/hello", Some("text/plain"), r#"{"x":1}"#);
        let (_, body, _) = send(&state, req).await;
        assert_eq!(body["request_data"], Value::Null);

        let req = request(Method::POST, "/api/hello", Some("application/json"), "{oops");
        let (status, body, _) = send(&state, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["request_data"], Value::Null);

        let req = request(Method::POST, "/api/hello", None, "");
        let (_, body, _) = send(&state, req).await;
        assert_eq!(body["request_data"], Value::Null);
    }

    #[tokio::test]
    async fn test_oversized_body_is_ignored() {
        let (state, logger) = test_state(RouteTable::standard());
        let big = format!(r#"{{"pad":"{}"}}"#, "a".repeat(2 * 1_048_576));
        let req = request(Method::POST, "/api/hello", Some("application/json"), &big);
        let (status, body, _) = send(&state, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["request_data"], Value::Null);
        assert!(logger
            .messages_at(crate::logger::Level::Warn)
            .iter()
            .any(|m| m.contains("Failed to read request body")));
    }

    #[tokio::test]
    async fn test_not_found_and_fault_envelopes() {
        let routes = RouteTable::standard()
            .with(Route::new("boom", "/boom", &[Method::GET], faulting));
        let (state, _) = test_state(routes);

        let (status, body, _) = send(&state, request(Method::GET, "/missing", None, "")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Endpoint not found");
        assert_eq!(body["processed_by"], "API2-Rust");

        let (status, body, _) = send(&state, request(Method::DELETE, "/health", None, "")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Endpoint not found");

        let (status, body, _) = send(&state, request(Method::GET, "/boom", None, "")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
        assert_eq!(body["status"], "error");
        assert!(!body.to_string().contains("seam"));
    }

    #[tokio::test]
    async fn test_access_log_line_written() {
        let (state, logger) = test_state(RouteTable::standard());
        send(&state, request(Method::GET, "/health?probe=1", None, "")).await;

        let lines = logger.access_lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("127.0.0.1 - - ["));
        assert!(lines[0].contains("\"GET /health?probe=1 HTTP/1.1\" 200"));
    }

    #[tokio::test]
    async fn test_concurrent_requests_are_independent() {
        let (state, _) = test_state(RouteTable::standard());
        let mut tasks = Vec::new();
        for i in 0..24_u32 {
            let state = Arc::clone(&state);
            tasks.push(tokio::spawn(async move {
                let body = format!(r#"{{"id":{i}}}"#);
                let req = request(Method::POST, "/api/hello", Some("application/json"), &body);
                let (_, json, _) = send(&state, req).await;
                (i, json)
            }));
        }
        for task in tasks {
            let (i, json) = task.await.unwrap();
            assert_eq!(json["request_data"], json!({ "id": i }));
        }
    }
}
