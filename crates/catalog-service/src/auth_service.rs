//! Authentication service trait definition.

use crate::dto::{AuthResponse, LoginRequest, RegisterRequest, RegisteredUser};
use async_trait::async_trait;
use catalog_core::{CatalogResult, Interface};

/// Account registration and login.
#[async_trait]
pub trait AuthService: Interface + Send + Sync {
    /// Registers a new account.
    async fn register(&self, request: RegisterRequest) -> CatalogResult<RegisteredUser>;

    /// Verifies credentials and issues an access token.
    async fn login(&self, request: LoginRequest) -> CatalogResult<AuthResponse>;
}
