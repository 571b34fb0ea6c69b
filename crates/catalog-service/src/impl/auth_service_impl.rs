//! Authentication service implementation.

use crate::auth_service::AuthService;
use crate::dto::{AuthResponse, LoginRequest, RegisterRequest, RegisteredUser};
use async_trait::async_trait;
use catalog_core::{normalize_email, CatalogError, CatalogResult, NewUser, ValidateExt};
use catalog_repository::UserRepository;
use catalog_security::{PasswordHasherInterface, TokenProviderInterface};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Authentication service.
pub struct AuthServiceImpl {
    user_repository: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasherInterface>,
    token_provider: Arc<dyn TokenProviderInterface>,
}

impl AuthServiceImpl {
    /// Creates a new authentication service.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasherInterface>,
        token_provider: Arc<dyn TokenProviderInterface>,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            token_provider,
        }
    }
}

#[async_trait]
impl AuthService for AuthServiceImpl {
    async fn register(&self, request: RegisterRequest) -> CatalogResult<RegisteredUser> {
        request.validate_request()?;

        let email = normalize_email(&request.email);
        debug!("Registering user: {}", email);

        if self.user_repository.exists_by_email(&email).await? {
            return Err(CatalogError::conflict("Email is already registered"));
        }

        let password_hash = self.password_hasher.hash(&request.password)?;
        let full_name = request
            .full_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        let user = self
            .user_repository
            .create(&NewUser {
                email,
                password_hash,
                full_name,
            })
            .await?;

        info!("User registered: {}", user.id);
        Ok(RegisteredUser::from(user))
    }

    async fn login(&self, request: LoginRequest) -> CatalogResult<AuthResponse> {
        request.validate_request()?;

        let email = normalize_email(&request.email);
        debug!("Login attempt for: {}", email);

        let Some(user) = self.user_repository.find_by_email(&email).await? else {
            warn!("Login failed: unknown email");
            return Err(CatalogError::InvalidCredentials);
        };

        if !self.password_hasher.verify(&request.password, &user.password_hash)? {
            warn!("Login failed: bad password for user {}", user.id);
            return Err(CatalogError::InvalidCredentials);
        }

        let issued = self
            .token_provider
            .issue_token(user.id, &user.email, user.display_name())?;

        info!("User logged in: {}", user.id);
        Ok(AuthResponse {
            token: issued.token,
            expires_at_utc: issued.expires_at,
        })
    }
}

impl std::fmt::Debug for AuthServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthServiceImpl").finish_non_exhaustive()
    }
}
