//! Run-wide context: credentials and the order-service API key.
//!
//! The API key is resolved once before any scenario runs. A configured key
//! wins; otherwise, when order-service credentials are set, the key returned
//! by `GET /test-orders?username=…&password=…` is used for every
//! authenticated step.

use std::fmt;

use loan_fixtures::LoginCredentials;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use super::ports::{HttpMethod, HttpTransport, TransportError, TransportRequest};
use super::scenario::Requirement;

/// Path of the order-service credential exchange.
pub const ORDERS_LOGIN_PATH: &str = "/test-orders";

/// Credentials and key shared by every scenario in a run.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CheckContext {
    api_key: Option<String>,
    student: Option<LoginCredentials>,
    orders: Option<LoginCredentials>,
}

impl CheckContext {
    /// Creates a context with nothing configured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key sent on authenticated order steps.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the credentials posted to `/login/student`.
    #[must_use]
    pub fn with_student_credentials(mut self, credentials: LoginCredentials) -> Self {
        self.student = Some(credentials);
        self
    }

    /// Sets the credentials exchanged for an API key.
    #[must_use]
    pub fn with_orders_credentials(mut self, credentials: LoginCredentials) -> Self {
        self.orders = Some(credentials);
        self
    }

    /// The API key, if one is available.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Student login credentials, if configured.
    #[must_use]
    pub const fn student_credentials(&self) -> Option<&LoginCredentials> {
        self.student.as_ref()
    }

    /// Order-service credentials, if configured.
    #[must_use]
    pub const fn orders_credentials(&self) -> Option<&LoginCredentials> {
        self.orders.as_ref()
    }

    /// Returns `true` when `requirement` can be met.
    #[must_use]
    pub const fn satisfies(&self, requirement: Requirement) -> bool {
        match requirement {
            Requirement::ApiKey => self.api_key.is_some(),
            Requirement::StudentCredentials => self.student.is_some(),
            Requirement::OrderCredentials => self.orders.is_some(),
        }
    }

    /// First requirement in `requirements` this context cannot meet.
    #[must_use]
    pub fn first_unmet(&self, requirements: &[Requirement]) -> Option<Requirement> {
        requirements
            .iter()
            .copied()
            .find(|requirement| !self.satisfies(*requirement))
    }
}

impl fmt::Debug for CheckContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckContext")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("student", &self.student)
            .field("orders", &self.orders)
            .finish()
    }
}

/// Errors raised while exchanging order-service credentials for a key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiKeyError {
    /// The credential exchange returned a non-200 status.
    #[error("credential exchange returned status {status}")]
    Rejected {
        /// Status returned by the backend.
        status: u16,
    },
    /// The response did not carry a non-empty `api_key` string.
    #[error("credential exchange response has no api_key field")]
    MissingKey,
    /// The request could not be sent.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Where the run's API key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeySource {
    /// Taken from configuration.
    Configured,
    /// Returned by the order-service credential exchange.
    CredentialExchange,
}

/// Resolves the API key for a run.
///
/// Returns `Ok(None)` when neither a key nor order-service credentials are
/// configured; scenarios that need a key are then skipped.
///
/// # Errors
///
/// Returns [`ApiKeyError`] when the credential exchange fails.
pub async fn resolve_api_key(
    transport: &dyn HttpTransport,
    configured: Option<&str>,
    credentials: Option<&LoginCredentials>,
) -> Result<Option<(String, ApiKeySource)>, ApiKeyError> {
    if let Some(key) = configured.map(str::trim).filter(|key| !key.is_empty()) {
        info!(source = "configured", "using configured API key");
        return Ok(Some((key.to_owned(), ApiKeySource::Configured)));
    }
    let Some(login) = credentials else {
        debug!("no API key or order-service credentials configured");
        return Ok(None);
    };

    let request = TransportRequest::new(HttpMethod::Get, ORDERS_LOGIN_PATH)
        .with_query("username", login.username.clone())
        .with_query("password", login.password.clone());
    let response = transport.send(&request).await?;
    if response.status != 200 {
        return Err(ApiKeyError::Rejected {
            status: response.status,
        });
    }

    let key = serde_json::from_str::<Value>(&response.body)
        .ok()
        .and_then(|body| {
            body.get("api_key")
                .and_then(Value::as_str)
                .map(str::to_owned)
        })
        .filter(|key| !key.trim().is_empty())
        .ok_or(ApiKeyError::MissingKey)?;
    info!(source = "credential-exchange", "resolved API key");
    Ok(Some((key, ApiKeySource::CredentialExchange)))
}
