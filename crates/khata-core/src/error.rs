//! # Error Types
//!
//! Domain-specific error types for khata-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  khata-core errors (this file)                                          │
//! │  ├── CoreError        - Business rule violations                        │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  khata-db errors (separate crate)                                       │
//! │  └── DbError          - Database operation failures                     │
//! │                                                                         │
//! │  HTTP errors (api-server)                                               │
//! │  └── ApiError         - Status code + {"error": "..."} body             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::types::InvoiceStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations. Every variant is the client's fault (HTTP 400).
#[derive(Debug, Error)]
pub enum CoreError {
    /// Invoice status change not in the transition table.
    ///
    /// ## When This Occurs
    /// - `PATCH` moving a `paid` invoice anywhere else
    /// - `draft → overdue` (an invoice must be issued before it is late)
    #[error("Invoice cannot move from {from} to {to}")]
    InvalidStatusTransition {
        from: InvoiceStatus,
        to: InvoiceStatus,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before anything touches the store.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range, including amounts whose
    /// computed total does not fit in paise.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A supplied derived value disagrees with the computed one.
    ///
    /// ## When This Occurs
    /// - `total` is not `subtotal - discount + tax`
    /// - a line `amount` is not `quantity * rate` plus tax
    #[error("{field} is {supplied} but should be {expected}")]
    Mismatch {
        field: String,
        expected: String,
        supplied: String,
    },

    /// A partial update carrying no fields.
    #[error("update must change at least one field")]
    EmptyUpdate,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidStatusTransition {
            from: InvoiceStatus::Paid,
            to: InvoiceStatus::Draft,
        };
        assert_eq!(err.to_string(), "Invoice cannot move from paid to draft");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::Mismatch {
            field: "total".to_string(),
            expected: "118.00".to_string(),
            supplied: "120.00".to_string(),
        };
        assert_eq!(err.to_string(), "total is 120.00 but should be 118.00");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::EmptyUpdate.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
