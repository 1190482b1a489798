//! # Error Types
//!
//! Domain-specific error types for ebarimt-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  ebarimt-core errors (this file)                                       │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Payload cannot be built from the document      │
//! │                                                                         │
//! │  ebarimt-client errors (separate crate)                                │
//! │  └── ClientError      - Transport / HTTP / malformed responses         │
//! │                                                                         │
//! │  ebarimt-db errors (separate crate)                                    │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  ebarimt-workflow errors (separate crate)                              │
//! │  └── WorkflowError    - What the host framework sees                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field name, code, etc.)
//! 3. Errors are enum variants, never String
//! 4. A ValidationError means submission was never attempted

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
///
/// Business rule violations detected without touching the network or the
/// database. Callers translate these to user-facing messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A receipt log is not in a state that allows the requested operation.
    ///
    /// ## When This Occurs
    /// - Submitting a document that already has a Success receipt
    /// - Voiding a Pending, Failed or already-Voided receipt
    #[error("Receipt log for {reference} is {current_status}, cannot {operation}")]
    InvalidReceiptStatus {
        reference: String,
        current_status: String,
        operation: String,
    },

    /// B2B receipts cannot be voided through the POS API.
    ///
    /// The tax authority requires a return invoice for B2B corrections.
    #[error("Cannot void B2B receipt for {reference}; create a return invoice instead")]
    B2bVoidNotAllowed { reference: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Payload validation errors.
///
/// Raised when a receipt payload cannot be built from the source document.
/// Surfaced immediately to the caller; no submission attempt, no log write.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required document field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Document has no line items.
    #[error("Document {reference} has no line items")]
    EmptyDocument { reference: String },

    /// A monetary amount is zero or negative where a positive one is needed.
    #[error("{field} must be positive, got {amount}")]
    NonPositiveAmount { field: String, amount: i64 },

    /// Customer TIN is required for business-to-business receipts.
    #[error("Customer TIN is required for B2B receipts on {reference}")]
    MissingCustomerTin { reference: String },

    /// Quantity on a line item is invalid.
    #[error("Line {index} of {reference} has invalid quantity {qty}")]
    InvalidQuantity {
        reference: String,
        index: usize,
        qty: i64,
    },
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
        let err = CoreError::InvalidReceiptStatus {
            reference: "Sales Invoice/SINV-0001".to_string(),
            current_status: "Success".to_string(),
            operation: "submit".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Receipt log for Sales Invoice/SINV-0001 is Success, cannot submit"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "district_code".to_string(),
        };
        assert_eq!(err.to_string(), "district_code is required");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::EmptyDocument {
            reference: "SINV-0001".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
