//! PostgreSQL user repository implementation.

use crate::{traits::UserRepository, DatabasePool};
use async_trait::async_trait;
use catalog_core::{CatalogError, CatalogResult, NewUser, User, UserId};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

/// PostgreSQL user repository implementation.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: Arc<DatabasePool>,
}

impl PgUserRepository {
    /// Creates a new PostgreSQL user repository.
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    email: String,
    password_hash: String,
    full_name: Option<String>,
    created_utc: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId(row.id),
            email: row.email,
            password_hash: row.password_hash,
            full_name: row.full_name,
            created_utc: row.created_utc,
        }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_email(&self, email: &str) -> CatalogResult<Option<User>> {
        debug!("Finding user by email: {}", email);

        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, email, password_hash, full_name, created_utc
            FROM users
            WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(User::from))
    }

    async fn exists_by_email(&self, email: &str) -> CatalogResult<bool> {
        let result: Option<i32> = sqlx::query_scalar("SELECT 1 FROM users WHERE email = $1 LIMIT 1")
            .bind(email)
            .fetch_optional(self.pool.inner())
            .await?;

        Ok(result.is_some())
    }

    async fn create(&self, user: &NewUser) -> CatalogResult<User> {
        debug!("Creating user: {}", user.email);

        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO users (email, password_hash, full_name, created_utc)
            VALUES ($1, $2, $3, NOW())
            RETURNING id, email, password_hash, full_name, created_utc
            ",
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.full_name.as_deref())
        .fetch_one(self.pool.inner())
        .await
        .map_err(|e| match CatalogError::from(e) {
            CatalogError::Conflict(_) => CatalogError::conflict("Email is already registered"),
            other => other,
        })?;

        Ok(row.into())
    }
}

impl std::fmt::Debug for PgUserRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgUserRepository").finish_non_exhaustive()
    }
}
