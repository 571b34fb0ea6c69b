//! # Catalog Security
//!
//! JWT issuance and validation plus Argon2 password hashing.

pub mod jwt;
pub mod password;

pub use jwt::*;
pub use password::*;
