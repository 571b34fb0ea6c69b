//! JWT token provider for creating and validating tokens.

use super::Claims;
use catalog_config::SecurityConfig;
use catalog_core::{CatalogError, CatalogResult, Interface, UserId};
use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::sync::Arc;
use tracing::{debug, warn};

/// A signed token and its expiry.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Interface for token issuance and validation.
pub trait TokenProviderInterface: Interface + Send + Sync {
    /// Issues a signed access token for a user.
    fn issue_token(&self, user_id: UserId, email: &str, name: &str) -> CatalogResult<IssuedToken>;

    /// Validates a token and returns its claims.
    fn validate_token(&self, token: &str) -> CatalogResult<Claims>;
}

/// HS256 token provider.
#[derive(Clone)]
pub struct TokenProvider {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    config: Arc<SecurityConfig>,
    validation: Validation,
}

impl TokenProvider {
    /// Creates a new token provider.
    #[must_use]
    pub fn new(config: Arc<SecurityConfig>) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.jwt_issuer]);
        validation.set_audience(&[&config.jwt_audience]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = config.jwt_leeway_secs;

        Self {
            encoding_key,
            decoding_key,
            config,
            validation,
        }
    }
}

impl TokenProviderInterface for TokenProvider {
    fn issue_token(&self, user_id: UserId, email: &str, name: &str) -> CatalogResult<IssuedToken> {
        let lifetime = chrono::Duration::from_std(self.config.token_expiration())
            .map_err(|e| CatalogError::Configuration(format!("Invalid token lifetime: {e}")))?;
        let expires_at = Utc::now() + lifetime;

        let claims = Claims::new(
            user_id,
            email.to_string(),
            name.to_string(),
            self.config.jwt_issuer.clone(),
            self.config.jwt_audience.clone(),
            expires_at,
        );

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| CatalogError::internal(format!("Failed to generate access token: {e}")))?;

        debug!("Generated access token for user {}", user_id);
        Ok(IssuedToken {
            token,
            expires_at: claims.expires_at(),
        })
    }

    fn validate_token(&self, token: &str) -> CatalogResult<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            warn!("Token validation failed: {}", e);
            match e.kind() {
                ErrorKind::ExpiredSignature => CatalogError::TokenExpired,
                ErrorKind::InvalidToken | ErrorKind::InvalidSignature => {
                    CatalogError::InvalidToken("Invalid token signature".to_string())
                }
                ErrorKind::InvalidIssuer => CatalogError::InvalidToken("Invalid token issuer".to_string()),
                ErrorKind::InvalidAudience => {
                    CatalogError::InvalidToken("Invalid token audience".to_string())
                }
                _ => CatalogError::InvalidToken(e.to_string()),
            }
        })?;

        Ok(token_data.claims)
    }
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider")
            .field("issuer", &self.config.jwt_issuer)
            .field("audience", &self.config.jwt_audience)
            .finish_non_exhaustive()
    }
}
