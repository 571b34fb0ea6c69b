//! # Catalog Resilience
//!
//! Resilience patterns for Catalog Cloud.
//! Provides a circuit breaker and timeout helpers used to keep slow or
//! unreachable infrastructure from stalling request handling.

pub mod circuit_breaker;
pub mod timeout;

pub use circuit_breaker::*;
pub use timeout::*;
