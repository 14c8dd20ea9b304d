//! Request context module
//!
//! Per-request view handed to handlers; borrowed from the inbound request
//! and dropped once the reply is built.

use hyper::Method;
use serde_json::Value;

/// Request context encapsulating information needed for request processing
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    pub method: &'a Method,
    pub path: &'a str,
    /// Raw `Content-Type` header, if any
    pub content_type: Option<&'a str>,
    /// Body bytes; only read for POST requests declaring JSON
    pub body: Option<&'a [u8]>,
}

impl<'a> RequestContext<'a> {
    pub const fn new(method: &'a Method, path: &'a str) -> Self {
        Self {
            method,
            path,
            content_type: None,
            body: None,
        }
    }

    #[must_use]
    pub const fn with_body(
        mut self,
        content_type: Option<&'a str>,
        body: Option<&'a [u8]>,
    ) -> Self {
        self.content_type = content_type;
        self.body = body;
        self
    }

    /// Whether the request declares a JSON content type
    pub fn declares_json(&self) -> bool {
        self.content_type.is_some_and(is_json_content_type)
    }

    /// Parsed JSON body of a POST request
    ///
    /// Any other method, a non-JSON content type, a missing body or a body
    /// that does not parse all yield `None`.
    pub fn json_body(&self) -> Option<Value> {
        if *self.method != Method::POST || !self.declares_json() {
            return None;
        }
        serde_json::from_slice(self.body?).ok()
    }
}

/// `application/json` or any `application/*+json` type, parameters ignored
pub fn is_json_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_content_types() {
        assert!(is_json_content_type("application/json"));
        assert!(is_json_content_type("Application/JSON; charset=utf-8"));
        assert!(is_json_content_type("application/problem+json"));
        assert!(!is_json_content_type("text/plain"));
        assert!(!is_json_content_type("text/json+xml"));
        assert!(!is_json_content_type(""));
    }

    #[test]
    fn test_json_body_parsed_for_post() {
        let method = Method::POST;
        let ctx = RequestContext::new(&method, "/api/hello")
            .with_body(Some("application/json"), Some(br#"{"x":1}"#.as_slice()));
        assert_eq!(ctx.json_body(), Some(json!({"x": 1})));
    }

    #[test]
    fn test_json_body_scalars_are_kept_verbatim() {
        let method = Method::POST;
        let ctx = RequestContext::new(&method, "/api/hello")
            .with_body(Some("application/json"), Some(b"[1, \"two\", null]".as_slice()));
        assert_eq!(ctx.json_body(), Some(json!([1, "two", null])));
    }

    #[test]
    fn test_json_body_absent_cases() {
        let post = Method::POST;
        let get = Method::GET;

        let malformed = RequestContext::new(&post, "/api/hello")
            .with_body(Some("application/json"), Some(b"{not json".as_slice()));
        assert_eq!(malformed.json_body(), None);

        let wrong_type = RequestContext::new(&post, "/api/hello")
            .with_body(Some("text/plain"), Some(br#"{"x":1}"#.as_slice()));
        assert_eq!(wrong_type.json_body(), None);

        let no_body = RequestContext::new(&post, "/api/hello")
            .with_body(Some("application/json"), None);
        assert_eq!(no_body.json_body(), None);

        let empty = RequestContext::new(&post, "/api/hello")
            .with_body(Some("application/json"), Some(b"".as_slice()));
        assert_eq!(empty.json_body(), None);

        let via_get = RequestContext::new(&get, "/api/hello")
            .with_body(Some("application/json"), Some(br#"{"x":1}"#.as_slice()));
        assert_eq!(via_get.json_body(), None);
    }
}
