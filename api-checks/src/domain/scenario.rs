//! Scenario and step descriptions, free of transport details.
//!
//! A [`Scenario`] is an ordered list of [`Step`]s. Each step names a request
//! relative to the backend root and the [`Expectation`] its response must meet.
//! Credentials and the API key are not stored here; they are applied from a
//! [`CheckContext`] when the request is resolved.

use std::fmt;
use std::str::FromStr;

use loan_fixtures::{LoanRequest, Order};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::expectation::Expectation;
use super::ports::{HttpMethod, TransportRequest};
use super::session::CheckContext;

/// Header carrying the order-service API key.
pub const API_KEY_HEADER: &str = "api_key";

/// Key sent by scenarios probing invalid-key handling.
pub const INVALID_API_KEY: &str = "invalid-key";

/// Group of scenarios sharing an endpoint family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Suite {
    /// `POST /api/loan-calc/decision`
    LoanDecision,
    /// `POST /login/student`
    Login,
    /// `/test-orders` endpoints
    Orders,
}

impl Suite {
    /// Every suite in catalogue order.
    pub const ALL: [Self; 3] = [Self::LoanDecision, Self::Login, Self::Orders];

    /// Returns the kebab-case suite name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LoanDecision => "loan-decision",
            Self::Login => "login",
            Self::Orders => "orders",
        }
    }
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a suite.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown suite '{name}' (expected loan-decision, login, or orders)")]
pub struct UnknownSuite {
    /// The rejected name.
    pub name: String,
}

impl FromStr for Suite {
    type Err = UnknownSuite;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|suite| suite.as_str() == value)
            .ok_or_else(|| UnknownSuite {
                name: value.to_owned(),
            })
    }
}

/// Which API key, if any, a request carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiKeyPolicy {
    /// No `api_key` header.
    Omitted,
    /// The key resolved for this run.
    Resolved,
    /// A fixed key, used to probe rejection.
    Literal(String),
}

/// Query parameters a request carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryPolicy {
    /// No query string.
    None,
    /// `username` and `password` from the order-service credentials.
    OrderCredentials,
}

/// Request body source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// No body.
    Empty,
    /// A loan application.
    Loan(LoanRequest),
    /// A well-formed order.
    Order(Order),
    /// Arbitrary JSON, used for malformed payloads.
    Raw(Value),
    /// The configured student login credentials.
    StudentCredentials,
}

/// A request relative to the backend root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    /// Request method.
    pub method: HttpMethod,
    /// Path starting with `/`.
    pub path: String,
    /// Query source.
    pub query: QueryPolicy,
    /// API key header source.
    pub api_key: ApiKeyPolicy,
    /// Body source.
    pub body: RequestBody,
}

impl RequestSpec {
    /// Starts a request with no query, key, or body.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: QueryPolicy::None,
            api_key: ApiKeyPolicy::Omitted,
            body: RequestBody::Empty,
        }
    }

    /// Sets the API key policy.
    #[must_use]
    pub fn with_api_key(mut self, api_key: ApiKeyPolicy) -> Self {
        self.api_key = api_key;
        self
    }

    /// Sets the query policy.
    #[must_use]
    pub fn with_query(mut self, query: QueryPolicy) -> Self {
        self.query = query;
        self
    }

    /// Sets the body source.
    #[must_use]
    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Context this request cannot be built without.
    #[must_use]
    pub fn requirements(&self) -> Vec<Requirement> {
        let mut needs = Vec::new();
        if self.api_key == ApiKeyPolicy::Resolved {
            needs.push(Requirement::ApiKey);
        }
        if self.query == QueryPolicy::OrderCredentials {
            needs.push(Requirement::OrderCredentials);
        }
        if self.body == RequestBody::StudentCredentials {
            needs.push(Requirement::StudentCredentials);
        }
        needs
    }

    /// Builds the transport request, applying credentials from `context`.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Missing`] when `context` lacks something the
    /// request needs, or [`RequestError::Serialise`] when the body cannot be
    /// encoded.
    pub fn resolve(&self, context: &CheckContext) -> Result<TransportRequest, RequestError> {
        let mut request = TransportRequest::new(self.method, self.path.clone());

        if self.query == QueryPolicy::OrderCredentials {
            let credentials = context
                .orders_credentials()
                .ok_or(RequestError::Missing(Requirement::OrderCredentials))?;
            request = request
                .with_query("username", credentials.username.clone())
                .with_query("password", credentials.password.clone());
        }

        match &self.api_key {
            ApiKeyPolicy::Omitted => {}
            ApiKeyPolicy::Resolved => {
                let key = context
                    .api_key()
                    .ok_or(RequestError::Missing(Requirement::ApiKey))?;
                request = request.with_header(API_KEY_HEADER, key);
            }
            ApiKeyPolicy::Literal(key) => {
                request = request.with_header(API_KEY_HEADER, key.clone());
            }
        }

        let body = match &self.body {
            RequestBody::Empty => None,
            RequestBody::Loan(loan) => Some(to_json(loan)?),
            RequestBody::Order(order) => Some(to_json(order)?),
            RequestBody::Raw(value) => Some(value.clone()),
            RequestBody::StudentCredentials => {
                let credentials = context
                    .student_credentials()
                    .ok_or(RequestError::Missing(Requirement::StudentCredentials))?;
                Some(to_json(credentials)?)
            }
        };
        if let Some(json) = body {
            request = request.with_body(json);
        }

        Ok(request)
    }
}

fn to_json(value: &impl Serialize) -> Result<Value, RequestError> {
    serde_json::to_value(value).map_err(|error| RequestError::Serialise {
        message: error.to_string(),
    })
}

/// Context a request may depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Requirement {
    /// An order-service API key.
    ApiKey,
    /// Student login credentials.
    StudentCredentials,
    /// Order-service login credentials.
    OrderCredentials,
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ApiKey => "an API key",
            Self::StudentCredentials => "student credentials",
            Self::OrderCredentials => "order-service credentials",
        })
    }
}

/// Errors raised while turning a [`RequestSpec`] into a transport request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// The context does not provide something the request needs.
    #[error("request needs {0}, which is not configured")]
    Missing(Requirement),
    /// The body could not be encoded as JSON.
    #[error("failed to encode request body: {message}")]
    Serialise {
        /// Encoder message.
        message: String,
    },
}

/// One request and the expectation on its response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Request to send.
    pub request: RequestSpec,
    /// Expected response.
    pub expectation: Expectation,
}

/// A named, ordered sequence of steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    name: String,
    suite: Suite,
    steps: Vec<Step>,
}

impl Scenario {
    /// Builds a single-step scenario.
    #[must_use]
    pub fn single(
        name: impl Into<String>,
        suite: Suite,
        request: RequestSpec,
        expectation: Expectation,
    ) -> Self {
        Self::chained(name, suite, vec![Step { request, expectation }])
    }

    /// Builds a scenario from several steps run in order.
    #[must_use]
    pub fn chained(name: impl Into<String>, suite: Suite, steps: Vec<Step>) -> Self {
        Self {
            name: name.into(),
            suite,
            steps,
        }
    }

    /// Scenario name, unique within the catalogue.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owning suite.
    #[must_use]
    pub const fn suite(&self) -> Suite {
        self.suite
    }

    /// Steps in run order.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Distinct context needed by any step, in first-use order.
    #[must_use]
    pub fn requirements(&self) -> Vec<Requirement> {
        let mut needs: Vec<Requirement> = Vec::new();
        for requirement in self.steps.iter().flat_map(|step| step.request.requirements()) {
            if !needs.contains(&requirement) {
                needs.push(requirement);
            }
        }
        needs
    }
}
