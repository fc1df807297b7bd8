//! # Error Types
//!
//! Domain-specific error types for boutik-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                        Error Types                             │
//! │                                                                │
//! │  boutik-core errors (this file)                                │
//! │  ├── ValidationError - input that cannot be normalized away    │
//! │  └── SaleRejection   - a sale refused by the ledger rules      │
//! │                                                                │
//! │  boutik-db errors (separate crate)                             │
//! │  └── DbError         - storage and migration failures          │
//! │                                                                │
//! │  Note: out-of-enum categories/units are NOT errors. Voice      │
//! │  input is imprecise, so they silently normalize to defaults.   │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rejection messages are in French because they go straight to the
//! merchant's screen, mirroring the rest of the user-facing surface.

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Only conditions that cannot be fixed by normalization end up here:
/// a product with no name, or negative amounts. Everything else
/// (unknown category, unknown unit, unknown action) is normalized.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty after trimming.
    #[error("Required field is empty: {field}")]
    Required { field: &'static str },

    /// A numeric field that must be non-negative is negative.
    #[error("Field must not be negative: {field}")]
    Negative { field: &'static str },
}

// =============================================================================
// Sale Rejection
// =============================================================================

/// Why the sale transaction engine refused a sale.
///
/// A rejection is a normal outcome, not a storage fault: nothing was
/// written, the caller shows the message and the merchant tries again.
/// Storage faults travel separately as `DbError`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SaleRejection {
    /// A line referenced a product that does not exist for this tenant.
    #[error("Produit inconnu : {name}")]
    UnknownProduct { name: String },

    /// A line asked for more than the quantity on hand.
    #[error("Stock insuffisant pour {name}. Seulement {available} en stock.")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    /// A line carried a zero or negative quantity.
    #[error("Quantité invalide pour {name}")]
    InvalidQuantity { name: String },

    /// The sale had no lines at all.
    #[error("Aucun article à vendre.")]
    EmptySale,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_messages() {
        let r = SaleRejection::UnknownProduct {
            name: "Riz".to_string(),
        };
        assert_eq!(r.to_string(), "Produit inconnu : Riz");

        let r = SaleRejection::InsufficientStock {
            name: "Riz".to_string(),
            available: 15,
            requested: 20,
        };
        assert_eq!(
            r.to_string(),
            "Stock insuffisant pour Riz. Seulement 15 en stock."
        );
    }
}
