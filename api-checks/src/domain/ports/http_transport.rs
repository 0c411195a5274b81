//! Driven port for sending HTTP requests to the backend under test.
//!
//! Scenarios describe requests with paths relative to the backend root, so the
//! same catalogue replays against the live service, a fake, or a mock.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use super::define_port_error;

/// HTTP methods used by the checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
}

impl HttpMethod {
    /// Returns the upper-case method token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully resolved request handed to the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    /// Request method.
    pub method: HttpMethod,
    /// Path relative to the backend root, starting with `/`.
    pub path: String,
    /// Query parameters in send order.
    pub query: Vec<(String, String)>,
    /// Extra request headers in send order.
    pub headers: Vec<(String, String)>,
    /// JSON body, if any.
    pub body: Option<Value>,
}

impl TransportRequest {
    /// Starts a request with no query, headers, or body.
    ///
    /// # Examples
    ///
    /// ```
    /// use api_checks::domain::ports::{HttpMethod, TransportRequest};
    ///
    /// let request = TransportRequest::new(HttpMethod::Get, "/test-orders/1")
    ///     .with_header("api_key", "1234567890123456");
    /// assert_eq!(request.header("api_key"), Some("1234567890123456"));
    /// assert!(request.body.is_none());
    /// ```
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Appends a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Returns the first header value with `name`, compared case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns the first query value with `name`.
    #[must_use]
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Status and raw body returned by the backend.
///
/// Any status code, including 4xx and 5xx, is a normal response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text; empty when the backend sent nothing.
    pub body: String,
}

impl TransportResponse {
    /// Builds a response from a status and body text.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Builds a response with an empty body.
    #[must_use]
    pub const fn empty(status: u16) -> Self {
        Self {
            status,
            body: String::new(),
        }
    }

    /// Builds a response carrying `body` serialised as JSON.
    #[must_use]
    pub fn json(status: u16, body: &Value) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }
}

define_port_error! {
    /// Errors surfaced when a request could not complete.
    pub enum TransportError {
        /// Network transport failed before a response arrived.
        Transport {
            /// Underlying failure.
            message: String
        } => "transport failed: {message}",
        /// The request exceeded the configured timeout.
        Timeout {
            /// Underlying failure.
            message: String
        } => "request timed out: {message}",
        /// The adapter could not build the request.
        InvalidRequest {
            /// Why the request was rejected.
            message: String
        } => "request invalid: {message}",
    }
}

/// Port for sending one request and returning the backend's response.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send `request` and wait for the response.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use api_checks::domain::ports::{HttpMethod, HttpTransport, TransportRequest};
    ///
    /// let response = transport
    ///     .send(&TransportRequest::new(HttpMethod::Get, "/test-orders/1"))
    ///     .await?;
    /// assert_eq!(response.status, 200);
    /// # Ok::<(), api_checks::domain::ports::TransportError>(())
    /// ```
    async fn send(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError>;
}
