//! Canonical request fixtures for the loan-decision and order API checks.
//!
//! This crate owns the request bodies the API checks send. It knows nothing
//! about HTTP: every fixture is a plain serialisable record, and the scenario
//! runner decides where and how to send it.
//!
//! # Overview
//!
//! The crate supports:
//!
//! - One canonical table of named loan scenarios ([`LoanScenario`])
//! - A versioned JSON [`FixtureRegistry`] that can override the canonical
//!   values for a different deployment
//! - Order and login payloads used by the order-management checks
//!
//! # Example
//!
//! ```
//! use loan_fixtures::{FixtureRegistry, LoanRequest, LoanScenario};
//!
//! let registry = FixtureRegistry::canonical();
//! let fixture = registry.find_loan("low-risk").expect("canonical fixture");
//!
//! assert_eq!(fixture.request(), &LoanRequest::for_scenario(LoanScenario::LowRisk));
//! assert_eq!(fixture.request().income, 1500);
//! ```

mod atomic_io;
mod error;
pub mod export_cli;
mod loan;
mod login;
mod order;
mod registry;

pub use error::RegistryError;
pub use loan::{LoanRequest, LoanScenario, UnknownLoanScenario};
pub use login::LoginCredentials;
pub use order::{Order, OrderStatus, malformed_order, malformed_order_update};
pub use registry::{FixtureRegistry, LoanFixture};
