//! Password hashing using Argon2.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use catalog_config::SecurityConfig;
use catalog_core::{CatalogError, CatalogResult, Interface};
use tracing::debug;

/// Interface for password hashing operations.
pub trait PasswordHasherInterface: Interface + Send + Sync {
    /// Hashes a password.
    fn hash(&self, password: &str) -> CatalogResult<String>;

    /// Verifies a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> CatalogResult<bool>;
}

/// Argon2id hasher. Hashes are PHC strings carrying their own salt and
/// parameters, so changing the configured cost never invalidates old hashes.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Builds a hasher using `memory_mib` MiB per hash.
    ///
    /// An out-of-range cost falls back to the argon2 defaults.
    #[must_use]
    pub fn with_cost(memory_mib: u32) -> Self {
        let params = Params::new(
            memory_mib.saturating_mul(1024),
            Params::DEFAULT_T_COST,
            Params::DEFAULT_P_COST,
            None,
        )
        .unwrap_or(Params::DEFAULT);

        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }

    /// Builds a hasher from `security.password_hash_cost`.
    #[must_use]
    pub fn from_config(config: &SecurityConfig) -> Self {
        Self::with_cost(config.password_hash_cost)
    }
}

impl PasswordHasherInterface for PasswordHasher {
    fn hash(&self, password: &str) -> CatalogResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| CatalogError::internal(format!("Failed to hash password: {e}")))?;

        debug!("Password hashed successfully");
        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, hash: &str) -> CatalogResult<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| CatalogError::internal(format!("Invalid password hash format: {e}")))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => {
                debug!("Password verification failed: incorrect password");
                Ok(false)
            }
            Err(e) => Err(CatalogError::internal(format!("Password verification error: {e}"))),
        }
    }
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher").finish_non_exhaustive()
    }
}
