//! # Validation Module
//!
//! Input validation for ClimaQuote.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI argument parsing (clap)                                   │
//! │  └── Types: numbers parse as numbers, ids as strings                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Commands                                                      │
//! │  └── THIS MODULE: business rules before anything is saved               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                             │
//! │  ├── NOT NULL / CHECK constraints                                       │
//! │  └── Foreign key constraints                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The line engine does not call these: it computes totals for any quote,
//! including an empty one. Saving is where the gates apply.

use crate::error::ValidationError;
use crate::types::{DiscountMode, Quote};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted catalog or client name.
pub const MAX_NAME_LEN: usize = 200;

/// Longest accepted validity period, in days.
pub const MAX_VALIDITY_DAYS: u32 = 365;

// =============================================================================
// String Validators
// =============================================================================

fn validate_required_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a material or service name.
///
/// ## Example
/// ```rust
/// use clima_core::validation::validate_item_name;
///
/// assert!(validate_item_name("Tubo de Cobre 1/4\"").is_ok());
/// assert!(validate_item_name("   ").is_err());
/// ```
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    validate_required_text("name", name, MAX_NAME_LEN)
}

/// Validates a unit of measure ("m", "kg", "un").
pub fn validate_unit(unit: &str) -> ValidationResult<()> {
    validate_required_text("unit", unit, 20)
}

/// Validates the client name of a quote.
pub fn validate_client_name(name: &str) -> ValidationResult<()> {
    validate_required_text("client name", name, MAX_NAME_LEN)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price or cost. Zero is allowed.
///
/// ## Example
/// ```rust
/// use clima_core::validation::validate_price;
///
/// assert!(validate_price(10.99).is_ok());
/// assert!(validate_price(0.0).is_ok());
/// assert!(validate_price(-1.0).is_err());
/// assert!(validate_price(f64::INFINITY).is_err());
/// ```
pub fn validate_price(price: f64) -> ValidationResult<()> {
    if !price.is_finite() {
        return Err(ValidationError::NotFinite {
            field: "price".to_string(),
        });
    }

    if price < 0.0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a copper price per kg. Must be a positive finite number.
pub fn validate_copper_price(price_per_kg: f64) -> ValidationResult<()> {
    if !price_per_kg.is_finite() {
        return Err(ValidationError::NotFinite {
            field: "copper price".to_string(),
        });
    }

    if price_per_kg <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "copper price".to_string(),
        });
    }

    Ok(())
}

/// Validates a discount input.
///
/// ## Rules
/// - Finite and non-negative
/// - A percentage may not exceed 100
pub fn validate_discount(value: f64, mode: DiscountMode) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: "discount".to_string(),
        });
    }

    if value < 0.0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "discount".to_string(),
        });
    }

    if mode == DiscountMode::Percentage && value > 100.0 {
        return Err(ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(())
}

/// Validates a validity period in days.
pub fn validate_validity_days(days: u32) -> ValidationResult<()> {
    if days == 0 || days > MAX_VALIDITY_DAYS {
        return Err(ValidationError::OutOfRange {
            field: "validity days".to_string(),
            min: 1,
            max: MAX_VALIDITY_DAYS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Quote Validators
// =============================================================================

/// Gates applied before a quote is saved.
///
/// ## Rules
/// - Client name is required
/// - At least one material or service line
pub fn validate_quote_for_save(quote: &Quote) -> ValidationResult<()> {
    validate_client_name(&quote.client_name)?;

    if quote.is_empty() {
        return Err(ValidationError::EmptyQuote);
    }

    validate_validity_days(quote.validity_days)
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_item_name() {
        assert!(validate_item_name("Cabo PP 3x1.5mm").is_ok());
        assert!(validate_item_name("").is_err());
        assert!(validate_item_name(&"A".repeat(201)).is_err());
        // Accented characters count once each.
        assert!(validate_item_name(&"é".repeat(200)).is_ok());
    }

    #[test]
    fn test_validate_copper_price() {
        assert!(validate_copper_price(75.0).is_ok());
        assert!(validate_copper_price(0.0).is_err());
        assert!(validate_copper_price(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_discount() {
        assert!(validate_discount(10.0, DiscountMode::Fixed).is_ok());
        assert!(validate_discount(150.0, DiscountMode::Fixed).is_ok());
        assert!(validate_discount(150.0, DiscountMode::Percentage).is_err());
        assert!(validate_discount(-1.0, DiscountMode::Fixed).is_err());
    }

    #[test]
    fn test_validate_quote_for_save() {
        let mut quote = Quote::new("");
        assert!(matches!(
            validate_quote_for_save(&quote),
            Err(ValidationError::Required { .. })
        ));

        quote.client_name = "Beatriz".to_string();
        assert!(matches!(
            validate_quote_for_save(&quote),
            Err(ValidationError::EmptyQuote)
        ));

        quote.add_custom_service("Limpeza", 180.0).unwrap();
        assert!(validate_quote_for_save(&quote).is_ok());
    }

    #[test]
    fn test_validate_validity_days() {
        assert!(validate_validity_days(15).is_ok());
        assert!(validate_validity_days(0).is_err());
        assert!(validate_validity_days(366).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("custom-123").is_err());
    }
}
