//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A receipt whose stocks don't sum to its amount is rejected by the     │
//! │  tax authority. Integer möngö make the sums exact and the payload      │
//! │  builder deterministic.                                                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use ebarimt_core::money::Money;
//!
//! // 55,000.00 MNT, VAT-inclusive (the Mongolian convention)
//! let gross = Money::from_mongo(5_500_000);
//!
//! // Extract the 10% VAT portion: gross * 1000 / 11000
//! let vat = gross.vat_from_gross(1000);
//! assert_eq!(vat.mongo(), 500_000); // 5,000.00 MNT
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in möngö (1/100 of a tögrög, MNT).
///
/// ## Design Decisions
/// - **i64 (signed)**: allows negative values for returns and corrections
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support for JSON serialization
///
/// Every amount in a receipt payload (line totals, VAT, city tax, payment
/// amounts) flows through this type; the wire layer converts to decimal
/// tögrög only at serialization time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from möngö (the smallest currency unit).
    #[inline]
    pub const fn from_mongo(mongo: i64) -> Self {
        Money(mongo)
    }

    /// Creates a Money value from whole tögrög.
    #[inline]
    pub const fn from_tugrik(tugrik: i64) -> Self {
        Money(tugrik * 100)
    }

    /// Returns the value in möngö.
    #[inline]
    pub const fn mongo(&self) -> i64 {
        self.0
    }

    /// Zero amount.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks whether the amount is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks whether the amount is strictly positive.
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Extracts the tax portion from a tax-inclusive gross amount.
    ///
    /// Mongolian prices include VAT, so the receipt reports
    /// `vat = gross * rate / (10000 + rate)` with the rate in basis
    /// points (1000 bps = 10%). Rounded half away from zero.
    ///
    /// ## Example
    /// ```rust
    /// use ebarimt_core::money::Money;
    ///
    /// let gross = Money::from_mongo(1_100_00);
    /// assert_eq!(gross.vat_from_gross(1000).mongo(), 100_00);
    /// ```
    pub fn vat_from_gross(&self, rate_bps: u32) -> Money {
        if rate_bps == 0 {
            return Money::zero();
        }
        let num = self.0 as i128 * rate_bps as i128;
        let den = 10_000i128 + rate_bps as i128;
        Money(div_round_half_away(num, den))
    }

    /// Calculates a tax on this (net) amount at the given rate.
    ///
    /// Used for city tax: `city_tax = net * 200 / 10000` (2%).
    pub fn tax_at(&self, rate_bps: u32) -> Money {
        if rate_bps == 0 {
            return Money::zero();
        }
        let num = self.0 as i128 * rate_bps as i128;
        Money(div_round_half_away(num, 10_000))
    }

    /// Formats the amount as decimal tögrög for the wire payload.
    ///
    /// The API expects plain decimal numbers with two fraction digits
    /// ("55000.00"), never möngö integers.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        format!("{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

/// Integer division rounding half away from zero.
fn div_round_half_away(num: i128, den: i128) -> i64 {
    let quotient = num / den;
    let remainder = num % den;
    let rounded = if remainder.abs() * 2 >= den.abs() {
        quotient + num.signum() * den.signum()
    } else {
        quotient
    };
    rounded as i64
}

// =============================================================================
// Operators
// =============================================================================

impl Add for Money {
    type Output = Money;
    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;
    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Mul<i64> for Money {
    type Output = Money;
    fn mul(self, rhs: i64) -> Money {
        Money(self.0 * rhs)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}₮", self.to_decimal_string())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vat_extraction_standard_rate() {
        // 110.00 gross at 10% inclusive -> 10.00 VAT
        let gross = Money::from_mongo(11_000);
        assert_eq!(gross.vat_from_gross(1000).mongo(), 1_000);
    }

    #[test]
    fn test_vat_extraction_rounds_half_away() {
        // 100.05 gross: vat = 10005 * 1000 / 11000 = 909.54... -> 910
        let gross = Money::from_mongo(10_005);
        assert_eq!(gross.vat_from_gross(1000).mongo(), 910);
    }

    #[test]
    fn test_vat_zero_rate() {
        let gross = Money::from_mongo(10_000);
        assert_eq!(gross.vat_from_gross(0), Money::zero());
    }

    #[test]
    fn test_city_tax_two_percent() {
        let net = Money::from_tugrik(10_000);
        assert_eq!(net.tax_at(200), Money::from_tugrik(200));
    }

    #[test]
    fn test_decimal_string() {
        assert_eq!(Money::from_mongo(5_500_000).to_decimal_string(), "55000.00");
        assert_eq!(Money::from_mongo(105).to_decimal_string(), "1.05");
        assert_eq!(Money::from_mongo(-105).to_decimal_string(), "-1.05");
        assert_eq!(Money::zero().to_decimal_string(), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_mongo(1_000);
        let b = Money::from_mongo(250);
        assert_eq!((a + b).mongo(), 1_250);
        assert_eq!((a - b).mongo(), 750);
        assert_eq!((b * 4).mongo(), 1_000);
    }
}
