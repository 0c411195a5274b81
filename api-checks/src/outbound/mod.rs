//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **http**: reqwest-backed transport for the live backend
//! - **fake_backend**: in-process backend for dry runs and tests
//!
//! Adapters are thin translators between domain types and the outside world.
//! The fake carries the backend's rules, never the runner's.

pub mod fake_backend;
pub mod http;
