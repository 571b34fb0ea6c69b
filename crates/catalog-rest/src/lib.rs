//! # Catalog REST
//!
//! HTTP surface of Catalog Cloud: product and auth endpoints under
//! `/api/v1`, health probes, and Swagger UI.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
