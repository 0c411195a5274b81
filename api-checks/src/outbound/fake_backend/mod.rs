//! In-process stand-in for the practice backend.
//!
//! `FakeBackend` implements the transport port directly, answering the
//! loan-decision, student-login, and order endpoints the way the live service
//! is expected to. It backs offline dry runs (`--backend fake`) and the test
//! suite.

mod loan_decision;
mod orders;

use async_trait::async_trait;
use loan_fixtures::{LoanRequest, LoginCredentials};
use serde_json::{Value, json};
use tracing::debug;
use uuid::Uuid;

use self::orders::{KeyCheck, OrderStore};
use crate::domain::ports::{
    HttpMethod, HttpTransport, TransportError, TransportRequest, TransportResponse,
};
use crate::domain::API_KEY_HEADER;

/// API key the fake accepts unless another is configured.
pub const FAKE_API_KEY: &str = "1234567890123456";

/// Fake backend answering every endpoint the catalogue uses.
#[derive(Debug)]
pub struct FakeBackend {
    api_key: String,
    orders: OrderStore,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self::with_api_key(FAKE_API_KEY)
    }
}

impl FakeBackend {
    /// Creates a fake accepting [`FAKE_API_KEY`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fake accepting `api_key`.
    #[must_use]
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            orders: OrderStore::default(),
        }
    }

    /// Key accepted on authenticated order requests.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Credentials the fake accepts for both login endpoints.
    ///
    /// Any non-blank pair is accepted; these are what dry runs use when none
    /// are configured.
    #[must_use]
    pub fn demo_credentials() -> LoginCredentials {
        LoginCredentials::new("fake-student", "fake-password")
    }

    /// Answers one request.
    ///
    /// # Examples
    ///
    /// ```
    /// use api_checks::domain::ports::{HttpMethod, TransportRequest};
    /// use api_checks::outbound::fake_backend::FakeBackend;
    ///
    /// let backend = FakeBackend::new();
    /// let response = backend.respond(&TransportRequest::new(HttpMethod::Get, "/test-orders/1"));
    /// assert_eq!(response.status, 200);
    /// ```
    #[must_use]
    pub fn respond(&self, request: &TransportRequest) -> TransportResponse {
        let segments: Vec<&str> = request
            .path
            .trim_matches('/')
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();

        match (request.method, segments.as_slice()) {
            (HttpMethod::Post, ["api", "loan-calc", "decision"]) => {
                loan_decision(request.body.as_ref())
            }
            (HttpMethod::Post, ["login", "student"]) => student_login(request.body.as_ref()),
            (HttpMethod::Get, ["test-orders"]) => self.orders_login(request),
            (HttpMethod::Post, ["test-orders"]) => self.orders.create(request.body.as_ref()),
            (HttpMethod::Get, ["test-orders", id]) => self.orders.get(id),
            (HttpMethod::Put, ["test-orders", id]) => {
                self.orders
                    .update(id, self.check_key(request), request.body.as_ref())
            }
            (HttpMethod::Delete, ["test-orders", id]) => {
                self.orders.delete(id, self.check_key(request))
            }
            _ => TransportResponse::new(404, "not found"),
        }
    }

    fn check_key(&self, request: &TransportRequest) -> KeyCheck {
        match request.header(API_KEY_HEADER) {
            None => KeyCheck::Missing,
            Some(key) if key == self.api_key => KeyCheck::Valid,
            Some(_) => KeyCheck::Invalid,
        }
    }

    fn orders_login(&self, request: &TransportRequest) -> TransportResponse {
        match (
            request.query_value("username"),
            request.query_value("password"),
        ) {
            (Some(username), Some(password))
                if !username.trim().is_empty() && !password.trim().is_empty() =>
            {
                TransportResponse::json(200, &json!({ "api_key": self.api_key }))
            }
            (Some(_), Some(_)) => TransportResponse::new(401, "invalid credentials"),
            _ => TransportResponse::new(400, "username and password are required"),
        }
    }
}

fn loan_decision(body: Option<&Value>) -> TransportResponse {
    let decision = body
        .and_then(|value| serde_json::from_value::<LoanRequest>(value.clone()).ok())
        .and_then(|request| loan_decision::decide(&request));
    match decision {
        Some(decision) => TransportResponse::json(200, &decision.to_json(Uuid::new_v4())),
        None => TransportResponse::empty(400),
    }
}

fn student_login(body: Option<&Value>) -> TransportResponse {
    let credentials =
        body.and_then(|value| serde_json::from_value::<LoginCredentials>(value.clone()).ok());
    match credentials {
        Some(login) if !login.username.trim().is_empty() && !login.password.trim().is_empty() => {
            TransportResponse::new(200, format!("fake-token-{}", Uuid::new_v4().simple()))
        }
        _ => TransportResponse::empty(401),
    }
}

#[async_trait]
impl HttpTransport for FakeBackend {
    async fn send(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError> {
        let response = self.respond(request);
        debug!(
            method = %request.method,
            path = %request.path,
            status = response.status,
            "fake backend answered"
        );
        Ok(response)
    }
}
