//! # Catalog Service
//!
//! Business logic for the catalog: product and auth use cases, request and
//! response DTOs, and the list cache that sits between product listing and
//! the repository.

pub mod auth_service;
pub mod cache;
pub mod dto;
pub mod r#impl;
pub mod product_service;

pub use auth_service::*;
pub use cache::*;
pub use dto::*;
pub use product_service::*;
pub use r#impl::{AuthServiceImpl, ProductServiceImpl};
