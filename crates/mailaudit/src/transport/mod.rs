//! Request transport seam.
//!
//! The service hands each request to a [`Transport`] and gets raw bytes and
//! a status back. [`HttpTransport`] is the `reqwest` implementation; tests
//! and callers with their own HTTP stack can provide another.

mod http;

pub use http::HttpTransport;

use std::fmt;
use std::future::Future;

/// HTTP method of a feed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Read a monitor list.
    Get,
    /// Create or update a monitor.
    Post,
    /// Remove a monitor.
    Delete,
}

impl Method {
    /// Returns the method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// HTTP method.
    pub method: Method,
    /// Absolute resource URL.
    pub url: String,
    /// `User-Agent` header value.
    pub user_agent: String,
    /// `Content-Type` header value, set when there is a body.
    pub content_type: Option<&'static str>,
    /// Request body.
    pub body: Option<Vec<u8>>,
}

impl Request {
    /// Creates a request without a body.
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            user_agent: user_agent.into(),
            content_type: None,
            body: None,
        }
    }

    /// Attaches a body and its content type.
    #[must_use]
    pub fn with_body(mut self, content_type: &'static str, body: Vec<u8>) -> Self {
        self.content_type = Some(content_type);
        self.body = Some(body);
        self
    }
}

/// A response as received, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Vec<u8>,
}

impl Response {
    /// Creates a response.
    #[must_use]
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for a 2xx status.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Sends one request and returns one response.
///
/// Implementations attach credentials themselves; the service never sees
/// them. A transport must not retry.
pub trait Transport: Send + Sync {
    /// Transport failure type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Sends `request` and waits for the response.
    fn send(&self, request: Request) -> impl Future<Output = Result<Response, Self::Error>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_names() {
        assert_eq!(Method::Get.to_string(), "GET");
        assert_eq!(Method::Post.as_str(), "POST");
        assert_eq!(Method::Delete.as_str(), "DELETE");
    }

    #[test]
    fn test_request_with_body() {
        let request = Request::new(Method::Post, "https://example.com/x", "agent")
            .with_body("application/atom+xml", b"<entry/>".to_vec());
        assert_eq!(request.content_type, Some("application/atom+xml"));
        assert_eq!(request.body.as_deref(), Some(&b"<entry/>"[..]));
    }

    #[test]
    fn test_response_success_range() {
        assert!(Response::new(200, "").is_success());
        assert!(Response::new(201, "").is_success());
        assert!(Response::new(299, "").is_success());
        assert!(!Response::new(199, "").is_success());
        assert!(!Response::new(300, "").is_success());
        assert!(!Response::new(404, "").is_success());
    }
}
