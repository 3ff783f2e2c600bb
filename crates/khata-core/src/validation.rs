//! # Validation Module
//!
//! Field-level validators shared by the input types in [`crate::input`].
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: JSON extraction (api-server)                                  │
//! │  ├── Shape and type checks (serde)                                      │
//! │  └── Money/tax strings parsed exactly                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE: business rule validation                         │
//! │  ├── Required text, lengths, positive quantities                        │
//! │  └── Reference ids are UUIDs                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                             │
//! │  ├── NOT NULL / CHECK constraints                                       │
//! │  ├── UNIQUE constraints                                                 │
//! │  └── Foreign key constraints                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use khata_core::validation::{validate_name, validate_quantity};
//!
//! assert!(validate_name("name", "Acme Traders").is_ok());
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::TaxRate;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted name-like field.
pub const MAX_NAME_LEN: usize = 200;

/// Longest accepted free-text field (address, notes, description).
pub const MAX_TEXT_LEN: usize = 2000;

/// Highest accepted tax rate: 100.00%.
pub const MAX_TAX_RATE_BPS: u32 = 10_000;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required, non-blank name-like field.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most [`MAX_NAME_LEN`] characters
pub fn validate_name(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates an optional free-text field. `None` always passes.
pub fn validate_optional_text(field: &str, value: Option<&str>) -> ValidationResult<()> {
    match value {
        Some(v) if v.chars().count() > MAX_TEXT_LEN => Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_TEXT_LEN,
        }),
        _ => Ok(()),
    }
}

/// Validates a reference to another record.
///
/// ## Example
/// ```rust
/// use khata_core::validation::validate_reference;
///
/// assert!(validate_reference("customerId", "550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_reference("customerId", "not-a-uuid").is_err());
/// ```
pub fn validate_reference(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a moved or billed quantity. Must be > 0.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a count that may be zero (opening stock, reorder level).
pub fn validate_non_negative_count(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a price or other amount where zero is allowed.
///
/// ## Example
/// ```rust
/// use khata_core::money::Money;
/// use khata_core::validation::validate_amount;
///
/// assert!(validate_amount("rate", Money::zero()).is_ok());
/// assert!(validate_amount("rate", Money::from_paise(-100)).is_err());
/// ```
pub fn validate_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates money changing hands (payments, expenses). Must be > 0.
pub fn validate_positive_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.paise() <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a tax rate: 0% to 100%.
pub fn validate_tax_rate(field: &str, rate: TaxRate) -> ValidationResult<()> {
    if rate.bps() > MAX_TAX_RATE_BPS {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::from(MAX_TAX_RATE_BPS),
        });
    }

    Ok(())
}

/// Checks a client-supplied derived value against the computed one.
///
/// `expected` is `None` when computing it overflowed, which rejects the
/// input whatever was supplied.
pub fn validate_derived(
    field: &str,
    expected: Option<Money>,
    supplied: Option<Money>,
) -> ValidationResult<Money> {
    let expected = expected.ok_or_else(|| ValidationError::OutOfRange {
        field: field.to_string(),
        min: i64::MIN,
        max: i64::MAX,
    })?;

    match supplied {
        Some(s) if s != expected => Err(ValidationError::Mismatch {
            field: field.to_string(),
            expected: expected.to_string(),
            supplied: s.to_string(),
        }),
        _ => Ok(expected),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
