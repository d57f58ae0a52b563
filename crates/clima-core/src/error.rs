//! # Error Types
//!
//! Domain-specific error types for clima-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  clima-core errors (this file)                                         │
//! │  ├── CoreError        - Quote engine / catalog lookup failures         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  clima-db errors (separate crate)                                      │
//! │  └── DbError          - Record store failures                          │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── AppError         - What the user sees                             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → AppError → terminal               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Copper detection and pricing never produce errors: unrecognized input
//! degrades to "not copper" and the catalog price is used instead.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Quote engine errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Material id is not in the catalog snapshot.
    #[error("Material not found: {0}")]
    MaterialNotFound(String),

    /// Service id is not in the catalog snapshot.
    #[error("Service not found: {0}")]
    ServiceNotFound(String),

    /// Quote line id does not exist on the quote.
    ///
    /// ## When This Occurs
    /// - Quantity change on a line that was already removed
    /// - Stale line id coming from a previous listing
    #[error("Quote line not found: {0}")]
    LineNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These are caller-level gates: the engine itself happily computes totals
/// for an empty quote or an unnamed client.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// NaN or infinite numeric input.
    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    /// Invalid format (e.g., invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A quote must carry at least one material or service line.
    #[error("quote must contain at least one material or service")]
    EmptyQuote,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
