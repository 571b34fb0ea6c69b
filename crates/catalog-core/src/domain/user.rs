//! User entity.

use crate::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An account allowed to modify the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Database-assigned identity.
    pub id: UserId,

    /// Unique email, stored trimmed and lower-cased.
    pub email: String,

    /// Argon2 hash (never exposed via API).
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Optional display name carried into issued tokens.
    pub full_name: Option<String>,

    /// Registration timestamp.
    pub created_utc: DateTime<Utc>,
}

impl User {
    /// Name shown to other parties: the full name, or the email when unset.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.email)
    }
}

/// Fields required to insert a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub full_name: Option<String>,
}

/// Normalizes an email for storage and lookup.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
