//! # Money Module
//!
//! Provides the `Money` type for handling prices safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  WHERE FLOATS ARE ALLOWED, AND WHERE THEY ARE NOT                       │
//! │                                                                         │
//! │  Prices are exact: 25.00 per soda, 140.00 per hour.                     │
//! │    → stored as integer minor units (2500, 14000)                        │
//! │    → line totals and items_amount are exact integer sums                │
//! │                                                                         │
//! │  Table time is not: 1h 37m 12.4s × 140.00/h                             │
//! │    → table charges are fractional, computed in f64                      │
//! │    → only the final session total is stored as f64                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cue_core::money::Money;
//!
//! let price = Money::from_cents(2_500); // 25.00
//! let line = price.multiply_quantity(2).unwrap();
//! assert_eq!(line.cents(), 5_000);
//! assert_eq!(line.to_major(), 50.0);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit.
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                                                                         │
/// │  InventoryItem.selling_price ──► SessionItem.unit_price (snapshot)      │
/// │                                        │                                │
/// │                                        ▼                                │
/// │                               SessionItem.total_price                   │
/// │                                        │                                │
/// │                                        ▼ SUM                            │
/// │  RateTable ──► hourly_rate      TableSession.items_amount               │
/// │                    │                   │                                │
/// │                    └───── settle() ────┘──► total_amount (f64)          │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use cue_core::money::Money;
    ///
    /// let rate = Money::from_cents(14_000); // 140.00
    /// assert_eq!(rate.cents(), 14_000);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns the value in major units as a float.
    ///
    /// Only for arithmetic with fractional quantities (hours played) and
    /// for presentation. Never convert back into `Money`.
    #[inline]
    pub fn to_major(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Multiplies money by a quantity, failing instead of overflowing.
    ///
    /// ## Example
    /// ```rust
    /// use cue_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(2_500);
    /// assert_eq!(unit_price.multiply_quantity(3).unwrap().cents(), 7_500);
    /// assert!(Money::from_cents(i64::MAX).multiply_quantity(2).is_err());
    /// ```
    pub fn multiply_quantity(&self, qty: i64) -> Result<Self, ValidationError> {
        self.0
            .checked_mul(qty)
            .map(Money)
            .ok_or_else(|| ValidationError::Overflow {
                field: "total_price".to_string(),
            })
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows the amount with two decimals and no currency symbol.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(14_050);
        assert_eq!(money.cents(), 14_050);
        assert_eq!(money.major(), 140);
        assert_eq!(money.minor(), 50);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(14_000).to_string(), "140.00");
        assert_eq!(Money::from_cents(2_505).to_string(), "25.05");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1_000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1_500);
        assert_eq!(a.multiply_quantity(3).unwrap().cents(), 3_000);
    }

    #[test]
    fn test_multiply_quantity_overflow() {
        let huge = Money::from_cents(10_000_000_000_000_000);
        let err = huge.multiply_quantity(999).unwrap_err();
        assert!(matches!(err, ValidationError::Overflow { field } if field == "total_price"));
    }

    #[test]
    fn test_sum_of_line_totals() {
        let lines = [
            Money::from_cents(5_000),
            Money::from_cents(1_250),
            Money::from_cents(40),
        ];
        let total: Money = lines.iter().copied().sum();
        assert_eq!(total.cents(), 6_290);
    }

    #[test]
    fn test_to_major() {
        assert_eq!(Money::from_cents(14_000).to_major(), 140.0);
        assert_eq!(Money::from_cents(5_000).to_major(), 50.0);
    }
}
