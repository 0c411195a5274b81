//! HTTP outbound adapter.
//!
//! This module provides a thin reqwest implementation of the
//! `HttpTransport` port.

mod reqwest_transport;

pub use reqwest_transport::ReqwestTransport;
