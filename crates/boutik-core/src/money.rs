//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                  │
//! │                                                              │
//! │  In floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                │
//! │                                                              │
//! │  A stock valuation that drifts by a franc per operation is   │
//! │  a ledger nobody trusts.                                     │
//! │                                                              │
//! │  OUR SOLUTION: integer francs                                │
//! │    The CFA franc has no subunit, so every amount in the      │
//! │    system is a whole number of francs stored as i64.         │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use boutik_core::money::Money;
//!
//! let price = Money::from_francs(1000); // 1000 FCFA
//! let total = price * 10;               // 10000 FCFA
//! assert_eq!(total.francs(), 10_000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in whole CFA francs.
///
/// ## Design Decisions
/// - **i64 (signed)**: room for very large stock valuations, and arithmetic
///   intermediate values never wrap in practice
/// - **Single-field tuple struct**: zero-cost abstraction over i64
/// - **Transparent serde**: serializes as a plain number on the wire
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole francs.
    ///
    /// ## Example
    /// ```rust
    /// use boutik_core::money::Money;
    ///
    /// let price = Money::from_francs(1500);
    /// assert_eq!(price.francs(), 1500);
    /// ```
    #[inline]
    pub const fn from_francs(francs: i64) -> Self {
        Money(francs)
    }

    /// Returns the value in francs.
    #[inline]
    pub const fn francs(&self) -> i64 {
        self.0
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is strictly positive.
    ///
    /// Used by the upsert-merge rule: a zero (absent) price in the input
    /// must not erase a previously recorded price.
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

// =============================================================================
// Arithmetic Operators
// =============================================================================

impl Add for Money {
    type Output = Money;

    #[inline]
    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    #[inline]
    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl Mul<i64> for Money {
    type Output = Money;

    #[inline]
    fn mul(self, quantity: i64) -> Money {
        Money(self.0 * quantity)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Display
// =============================================================================

/// Formats as "12 500 FCFA" (space-separated thousands, French convention).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let negative = self.0 < 0;
        let digits = self.0.unsigned_abs().to_string();

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
        let offset = digits.len() % 3;
        for (i, c) in digits.chars().enumerate() {
            if i != 0 && (i + 3 - offset) % 3 == 0 {
                grouped.push(' ');
            }
            grouped.push(c);
        }

        if negative {
            write!(f, "-{} FCFA", grouped)
        } else {
            write!(f, "{} FCFA", grouped)
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic() {
        let price = Money::from_francs(1000);
        assert_eq!((price * 10).francs(), 10_000);
        assert_eq!((price + Money::from_francs(500)).francs(), 1500);
        assert_eq!((price - Money::from_francs(250)).francs(), 750);
    }

    #[test]
    fn test_sum() {
        let total: Money = [700, 300, 1000]
            .into_iter()
            .map(Money::from_francs)
            .sum();
        assert_eq!(total.francs(), 2000);
    }

    #[test]
    fn test_display_grouping() {
        assert_eq!(Money::from_francs(0).to_string(), "0 FCFA");
        assert_eq!(Money::from_francs(950).to_string(), "950 FCFA");
        assert_eq!(Money::from_francs(12_500).to_string(), "12 500 FCFA");
        assert_eq!(Money::from_francs(1_250_000).to_string(), "1 250 000 FCFA");
        assert_eq!(Money::from_francs(-7500).to_string(), "-7 500 FCFA");
    }

    #[test]
    fn test_serde_transparent() {
        // Money is a plain number on the wire
        let m = Money::from_francs(1234);
        // serde_json is a dev-dependency here
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "1234");
        let back: Money = serde_json::from_str("1234").unwrap();
        assert_eq!(back, m);
    }
}
