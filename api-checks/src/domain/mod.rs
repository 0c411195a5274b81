//! Domain model for the API checks: scenarios, expectations, and the runner.
//!
//! Nothing here knows about reqwest, the command line, or configuration
//! sources. The only way out is the [`ports::HttpTransport`] port.

mod assertions;
mod catalogue;
mod expectation;
pub mod ports;
mod report;
mod runner;
mod scenario;
mod selection;
mod session;

pub use assertions::{AssertionFailure, SoftAssertions};
pub use catalogue::{LOAN_DECISION_PATH, STUDENT_LOGIN_PATH, catalogue};
pub use expectation::{BodyExpectation, Expectation, FieldCheck, FieldExpectation, StatusExpectation};
pub use report::{ScenarioOutcome, ScenarioReport, SuiteReport, Summary};
pub use runner::{DEFAULT_CONCURRENCY, ScenarioRunner};
pub use scenario::{
    API_KEY_HEADER, ApiKeyPolicy, INVALID_API_KEY, QueryPolicy, RequestBody, RequestError,
    RequestSpec, Requirement, Scenario, Step, Suite, UnknownSuite,
};
pub use selection::{Selection, SelectionError};
pub use session::{ApiKeyError, ApiKeySource, CheckContext, ORDERS_LOGIN_PATH, resolve_api_key};
