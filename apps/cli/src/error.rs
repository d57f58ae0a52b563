//! # Application Error Type
//!
//! Unified error type for CLI commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in ClimaQuote                             │
//! │                                                                         │
//! │  climaquote quote qty 7 2 -1                                            │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, AppError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Database Error? ─── DbError::QueryFailed("...") ──┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Engine Error? ─── CoreError::LineNotFound ────── AppError ────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  main(): "error: Quote line not found: 3" + exit code from ErrorCode    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use clima_core::{CoreError, ValidationError};
use clima_db::DbError;
use thiserror::Error;

/// Error returned from CLI commands.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// Machine-readable error code, also drives the exit status
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Quote, line or catalog item not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Database operation failed
    DatabaseError,

    /// Configuration could not be loaded
    ConfigError,

    /// Anything else
    Internal,
}

impl ErrorCode {
    /// Process exit status for this kind of failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            ErrorCode::Internal => 1,
            ErrorCode::ValidationError => 2,
            ErrorCode::NotFound => 3,
            ErrorCode::DatabaseError => 4,
            ErrorCode::ConfigError => 5,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::Internal => "INTERNAL",
        };
        f.write_str(code)
    }
}

impl AppError {
    /// Creates a new application error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        AppError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ConfigError, message)
    }
}

/// Result type for commands.
pub type AppResult<T> = Result<T, AppError>;

/// Converts database errors to application errors.
impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => AppError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => {
                AppError::validation(format!("{} '{}' already exists", field, value))
            }
            DbError::ConnectionFailed(e) => {
                AppError::new(ErrorCode::DatabaseError, format!("Database connection failed: {}", e))
            }
            DbError::MigrationFailed(e) => {
                AppError::new(ErrorCode::DatabaseError, format!("Database migration failed: {}", e))
            }
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                AppError::validation("Invalid reference")
            }
            DbError::PoolExhausted => {
                AppError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Decode { entity, reason } => {
                tracing::error!(entity = %entity, "Stored record could not be read: {}", reason);
                AppError::new(ErrorCode::DatabaseError, format!("Stored {} is corrupt", entity))
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts engine errors to application errors.
impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::MaterialNotFound(id) => AppError::not_found("Material", &id),
            CoreError::ServiceNotFound(id) => AppError::not_found("Service", &id),
            CoreError::LineNotFound(id) => AppError::not_found("Quote line", &id),
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_not_found_maps_to_not_found() {
        let err: AppError = DbError::not_found("Quote", "abc").into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.to_string(), "Quote not found: abc");
        assert_eq!(err.code.exit_code(), 3);
    }

    #[test]
    fn test_core_validation_maps_to_validation() {
        let err: AppError = CoreError::Validation(ValidationError::EmptyQuote).into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(
            err.message,
            "quote must contain at least one material or service"
        );
    }

    #[test]
    fn test_query_failure_hides_details() {
        let err: AppError = DbError::QueryFailed("syntax error near FROM".to_string()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.message, "Database operation failed");
    }
}
