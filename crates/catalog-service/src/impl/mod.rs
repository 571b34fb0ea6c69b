//! Service implementations.
//!
//! Trait definitions live in the parent module (e.g. `product_service.rs`).

pub mod auth_service_impl;
pub mod product_service_impl;

pub use auth_service_impl::AuthServiceImpl;
pub use product_service_impl::ProductServiceImpl;
