//! Reqwest-backed transport adapter.
//!
//! This adapter owns transport details only: URL joining, header and body
//! encoding, timeout, and error mapping. Every HTTP status is returned as a
//! response.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::{Client, Method, Url};

use crate::domain::ports::{
    HttpMethod, HttpTransport, TransportError, TransportRequest, TransportResponse,
};

const DEFAULT_USER_AGENT: &str = concat!("api-checks/", env!("CARGO_PKG_VERSION"));

/// Transport that sends requests to one backend over HTTP.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: Url,
}

impl ReqwestTransport {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// Paths are resolved under `base_url`, so a base with a path prefix
    /// (`https://host/prefix`) keeps that prefix.
    /// ```rust,ignore
    /// let transport = ReqwestTransport::new(base_url, Duration::from_secs(30))?;
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: with_trailing_slash(base_url),
        })
    }

    /// Backend root every request path is joined onto.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|error| TransportError::invalid_request(format!("path '{path}': {error}")))
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError> {
        let url = self.url_for(&request.path)?;
        let mut builder = self.client.request(method(request.method), url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|error| {
                TransportError::invalid_request(format!("header name '{name}': {error}"))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|error| {
                TransportError::invalid_request(format!("header '{name}' value: {error}"))
            })?;
            builder = builder.header(header_name, header_value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_transport_error)?;
        Ok(TransportResponse { status, body })
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

const fn method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn map_transport_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::timeout(error.to_string())
    } else {
        TransportError::transport(error.to_string())
    }
}
