//! End-to-end checks for the loan-decision, student login, and order APIs.
//!
//! The [`domain`] holds the scenario catalogue and the runner. Requests leave
//! through the [`domain::ports::HttpTransport`] port, implemented in
//! [`outbound`] by a reqwest client and an in-process fake backend.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;
