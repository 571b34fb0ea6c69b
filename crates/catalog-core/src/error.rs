//! Unified error types for all layers of the application.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for all layers of Catalog Cloud.
///
/// Cache connectivity problems get their own variant so the read path can
/// tell them apart from system-of-record failures and fall back to the
/// database instead of failing the request.
#[derive(Error, Debug)]
pub enum CatalogError {
    // ============ Domain Errors ============
    /// Resource not found
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Field-level validation errors
    #[error("Validation failed for {} field(s)", .0.len())]
    ValidationErrors(Vec<FieldError>),

    /// Conflict error (e.g., duplicate entry)
    #[error("Conflict: {0}")]
    Conflict(String),

    // ============ Authentication Errors ============
    /// Unauthorized access
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Invalid token
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Token expired
    #[error("Token expired")]
    TokenExpired,

    /// Invalid credentials
    #[error("Invalid credentials")]
    InvalidCredentials,

    // ============ Infrastructure Errors ============
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The cache backing store could not be reached
    #[error("Cache unavailable: {0}")]
    CacheUnavailable(String),

    /// Payload could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    // ============ Resilience Errors ============
    /// Circuit breaker open
    #[error("Service unavailable: circuit breaker open for {0}")]
    CircuitBreakerOpen(String),

    /// Timeout error
    #[error("Operation timed out: {0}")]
    Timeout(String),

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CatalogError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::ValidationErrors(_) => 400,
            Self::Conflict(_) => 409,
            Self::Unauthorized(_)
            | Self::InvalidToken(_)
            | Self::TokenExpired
            | Self::InvalidCredentials => 401,
            Self::CacheUnavailable(_) | Self::CircuitBreakerOpen(_) | Self::Timeout(_) => 503,
            Self::Database(_)
            | Self::Configuration(_)
            | Self::Serialization(_)
            | Self::Internal(_)
            | Self::Other(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::ValidationErrors(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::InvalidToken(_) => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::CacheUnavailable(_) => "CACHE_UNAVAILABLE",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::CircuitBreakerOpen(_) => "CIRCUIT_BREAKER_OPEN",
            Self::Timeout(_) => "TIMEOUT",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates a conflict error.
    #[must_use]
    pub fn conflict<T: Into<String>>(message: T) -> Self {
        Self::Conflict(message.into())
    }

    /// Creates an unauthorized error.
    #[must_use]
    pub fn unauthorized<T: Into<String>>(message: T) -> Self {
        Self::Unauthorized(message.into())
    }

    /// Creates a cache unavailable error.
    #[must_use]
    pub fn cache_unavailable<T: Into<String>>(message: T) -> Self {
        Self::CacheUnavailable(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Checks if this error should trip a circuit breaker.
    #[must_use]
    pub const fn should_trip_circuit_breaker(&self) -> bool {
        matches!(
            self,
            Self::Database(_) | Self::CacheUnavailable(_) | Self::Timeout(_)
        )
    }

    /// Returns true for internal failures whose message must not reach clients.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for CatalogError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound {
                resource_type: "database_row",
                id: "unknown".to_string(),
            },
            sqlx::Error::Database(db_err) => {
                // PostgreSQL unique violation
                if db_err.code().as_deref() == Some("23505") {
                    return Self::Conflict(db_err.message().to_string());
                }
                Self::Database(err.to_string())
            }
            _ => Self::Database(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Serializable error response for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional field-level errors for validation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// Field-level validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FieldError {
    /// Field name
    pub field: String,
    /// Error message
    pub message: String,
    /// Error code
    pub code: String,
}

impl FieldError {
    /// Creates a field error.
    #[must_use]
    pub fn new(
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code: code.into(),
        }
    }
}

impl ErrorResponse {
    /// Creates a new error response from a `CatalogError`.
    ///
    /// Server-side failures get a generic message; their detail belongs in
    /// the logs, not in the response body.
    #[must_use]
    pub fn from_error(error: &CatalogError) -> Self {
        let message = if error.is_server_error() {
            "An internal error occurred".to_string()
        } else {
            error.to_string()
        };
        let details = match error {
            CatalogError::ValidationErrors(fields) => Some(fields.clone()),
            _ => None,
        };
        Self {
            code: error.error_code().to_string(),
            message,
            details,
        }
    }
}

impl From<&CatalogError> for ErrorResponse {
    fn from(error: &CatalogError) -> Self {
        Self::from_error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(CatalogError::not_found("Product", 1).status_code(), 404);
        assert_eq!(CatalogError::ValidationErrors(vec![]).status_code(), 400);
        assert_eq!(CatalogError::unauthorized("not logged in").status_code(), 401);
        assert_eq!(CatalogError::conflict("duplicate").status_code(), 409);
        assert_eq!(CatalogError::InvalidCredentials.status_code(), 401);
        assert_eq!(CatalogError::TokenExpired.status_code(), 401);
    }

    #[test]
    fn test_infrastructure_status_codes() {
        assert_eq!(CatalogError::Database("down".to_string()).status_code(), 500);
        assert_eq!(CatalogError::cache_unavailable("refused").status_code(), 503);
        assert_eq!(CatalogError::Timeout("slow".to_string()).status_code(), 503);
        assert_eq!(CatalogError::internal("oops").status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CatalogError::not_found("Product", 1).error_code(), "NOT_FOUND");
        assert_eq!(
            CatalogError::ValidationErrors(vec![]).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(CatalogError::cache_unavailable("x").error_code(), "CACHE_UNAVAILABLE");
        assert_eq!(CatalogError::internal("x").error_code(), "INTERNAL_ERROR");
        assert_eq!(CatalogError::InvalidCredentials.error_code(), "INVALID_CREDENTIALS");
    }

    #[test]
    fn test_circuit_breaker_errors() {
        assert!(CatalogError::cache_unavailable("refused").should_trip_circuit_breaker());
        assert!(CatalogError::Timeout("timeout".to_string()).should_trip_circuit_breaker());
        assert!(!CatalogError::ValidationErrors(vec![]).should_trip_circuit_breaker());
        assert!(!CatalogError::Serialization("bad json".to_string()).should_trip_circuit_breaker());
    }

    #[test]
    fn test_error_constructors() {
        let not_found = CatalogError::not_found("Product", "123");
        assert!(not_found.to_string().contains("Product"));
        assert!(not_found.to_string().contains("123"));

        let conflict = CatalogError::conflict("duplicate email");
        assert!(conflict.to_string().contains("duplicate email"));
    }

    #[test]
    fn test_error_response_hides_internal_messages() {
        let err = CatalogError::Database("password=secret host=db".to_string());
        let response = ErrorResponse::from_error(&err);
        assert_eq!(response.code, "DATABASE_ERROR");
        assert!(!response.message.contains("secret"));
    }

    #[test]
    fn test_error_response_keeps_client_messages() {
        let err = CatalogError::not_found("Product", 7);
        let response = ErrorResponse::from(&err);
        assert_eq!(response.code, "NOT_FOUND");
        assert!(response.message.contains('7'));
        assert!(response.details.is_none());
    }

    #[test]
    fn test_error_response_carries_field_errors() {
        let err = CatalogError::ValidationErrors(vec![FieldError::new(
            "price",
            "range",
            "price must not be negative",
        )]);
        let response = ErrorResponse::from_error(&err);
        let details = response.details.expect("details");
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].field, "price");
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let err: CatalogError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, CatalogError::Serialization(_)));
    }
}
