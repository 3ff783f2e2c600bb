//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Integer Paise, Decimal Strings
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  WHERE MONEY LIVES                                                      │
//! │                                                                         │
//! │  JSON (wire)          Rust (Money)            SQLite                    │
//! │  ───────────          ────────────            ──────                    │
//! │  "1250.50"   ──parse──► Money(125050) ──bind──► INTEGER 125050          │
//! │  "1250.50"  ◄─format── Money(125050) ◄─decode─ INTEGER 125050          │
//! │                                                                         │
//! │  Floats never appear on any path. 0.1 + 0.2 stays 0.30.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use khata_core::money::Money;
//!
//! let price: Money = "10.99".parse().unwrap();
//! assert_eq!(price.paise(), 1099);
//!
//! let line = price.checked_mul_quantity(3).unwrap();
//! assert_eq!(line.to_string(), "32.97");
//!
//! // Arithmetic is checked; an overflow is `None`, never a wrapped total.
//! assert!(Money::from_paise(i64::MAX).checked_add(price).is_none());
//! ```

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::types::TaxRate;

// =============================================================================
// Fixed-Point Parsing
// =============================================================================

/// Failure to read a two-decimal fixed-point string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseAmountError {
    #[error("amount is empty")]
    Empty,

    #[error("'{0}' is not a decimal number")]
    NotANumber(String),

    #[error("'{0}' has more than two decimal places")]
    TooPrecise(String),

    #[error("'{0}' is out of range")]
    OutOfRange(String),
}

/// Parses `"123"`, `"123.4"`, `"-123.45"` into hundredths (`12300`, `12340`, `-12345`).
///
/// Shared by [`Money`] (paise) and [`TaxRate`] (basis points), which are both
/// fixed-point values with two fraction digits on the wire.
pub(crate) fn parse_hundredths(input: &str) -> Result<i64, ParseAmountError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(ParseAmountError::Empty);
    }

    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };

    let (whole, fraction) = match digits.split_once('.') {
        Some((w, f)) => (w, f),
        None => (digits, ""),
    };

    let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction) {
        return Err(ParseAmountError::NotANumber(s.to_string()));
    }
    if fraction.len() > 2 {
        return Err(ParseAmountError::TooPrecise(s.to_string()));
    }

    let whole: i64 = if whole.is_empty() {
        0
    } else {
        whole
            .parse()
            .map_err(|_| ParseAmountError::OutOfRange(s.to_string()))?
    };
    let fraction: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().unwrap_or(0) * 10,
        _ => fraction.parse::<i64>().unwrap_or(0),
    };

    let magnitude = whole
        .checked_mul(100)
        .and_then(|w| w.checked_add(fraction))
        .ok_or_else(|| ParseAmountError::OutOfRange(s.to_string()))?;

    Ok(if negative { -magnitude } else { magnitude })
}

/// Formats hundredths as a decimal string with exactly two fraction digits.
pub(crate) fn format_hundredths(value: i64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let sign = if value < 0 { "-" } else { "" };
    let abs = value.unsigned_abs();
    write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (paise for INR).
///
/// ## Design Decisions
/// - **i64 (signed)**: allows negative values for discounts and credit notes
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Wire format**: a decimal string such as `"1250.00"`, never a JSON number
/// - **Storage**: an SQLite `INTEGER` column holding paise
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise.
    ///
    /// ## Example
    /// ```rust
    /// use khata_core::money::Money;
    ///
    /// let price = Money::from_paise(1099); // ₹10.99
    /// assert_eq!(price.paise(), 1099);
    /// ```
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Calculates tax on this amount, rounding half up to the nearest paisa.
    ///
    /// ## Implementation
    /// Integer math only: `(amount * bps + 5000) / 10000`, carried out in
    /// i128. `None` when the result does not fit back into paise.
    ///
    /// ## Example
    /// ```rust
    /// use khata_core::money::Money;
    /// use khata_core::types::TaxRate;
    ///
    /// let base = Money::from_paise(1000);  // ₹10.00
    /// let rate = TaxRate::from_bps(825);    // 8.25%
    /// assert_eq!(base.calculate_tax(rate).unwrap().paise(), 83);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Option<Money> {
        let tax = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        i64::try_from(tax).ok().map(Money)
    }

    /// Multiplies money by a quantity. `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use khata_core::money::Money;
    ///
    /// let rate = Money::from_paise(299);
    /// assert_eq!(rate.checked_mul_quantity(3).unwrap().paise(), 897);
    /// assert!(rate.checked_mul_quantity(i64::MAX).is_none());
    /// ```
    #[inline]
    pub const fn checked_mul_quantity(&self, qty: i64) -> Option<Money> {
        match self.0.checked_mul(qty) {
            Some(paise) => Some(Money(paise)),
            None => None,
        }
    }

    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(paise) => Some(Money(paise)),
            None => None,
        }
    }

    #[inline]
    pub const fn checked_sub(&self, other: Money) -> Option<Money> {
        match self.0.checked_sub(other.0) {
            Some(paise) => Some(Money(paise)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal, two fraction digits, no currency symbol: `"1250.00"`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_hundredths(self.0, f)
    }
}

impl FromStr for Money {
    type Err = ParseAmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hundredths(s).map(Money)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(HundredthsVisitor("a decimal amount string")).map(Money)
    }
}

/// Serde visitor for two-decimal fixed-point strings.
pub(crate) struct HundredthsVisitor(pub(crate) &'static str);

impl<'de> Visitor<'de> for HundredthsVisitor {
    type Value = i64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        parse_hundredths(v).map_err(E::custom)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_paise() {
        let money = Money::from_paise(1099);
        assert_eq!(money.paise(), 1099);
        assert!(!money.is_negative());
        assert!(Money::from_paise(-550).is_negative());
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_paise(1099).to_string(), "10.99");
        assert_eq!(Money::from_paise(500).to_string(), "5.00");
        assert_eq!(Money::from_paise(-550).to_string(), "-5.50");
        assert_eq!(Money::from_paise(-5).to_string(), "-0.05");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_parse() {
        assert_eq!("10.99".parse::<Money>().unwrap().paise(), 1099);
        assert_eq!("10.9".parse::<Money>().unwrap().paise(), 1090);
        assert_eq!("10".parse::<Money>().unwrap().paise(), 1000);
        assert_eq!(".5".parse::<Money>().unwrap().paise(), 50);
        assert_eq!("-3.05".parse::<Money>().unwrap().paise(), -305);
        assert_eq!(" 7.00 ".parse::<Money>().unwrap().paise(), 700);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!("".parse::<Money>(), Err(ParseAmountError::Empty));
        assert!(matches!("abc".parse::<Money>(), Err(ParseAmountError::NotANumber(_))));
        assert!(matches!("1e5".parse::<Money>(), Err(ParseAmountError::NotANumber(_))));
        assert!(matches!(".".parse::<Money>(), Err(ParseAmountError::NotANumber(_))));
        assert!(matches!("1.234".parse::<Money>(), Err(ParseAmountError::TooPrecise(_))));
        assert!(matches!(
            "99999999999999999999".parse::<Money>(),
            Err(ParseAmountError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_json_is_a_string() {
        let json = serde_json::to_string(&Money::from_paise(125050)).unwrap();
        assert_eq!(json, "\"1250.50\"");

        let back: Money = serde_json::from_str("\"1250.5\"").unwrap();
        assert_eq!(back.paise(), 125050);

        // Numbers are rejected: floats would defeat the point.
        assert!(serde_json::from_str::<Money>("1250.5").is_err());
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_paise(1000);
        let b = Money::from_paise(500);

        assert_eq!(a.checked_add(b).unwrap().paise(), 1500);
        assert_eq!(a.checked_sub(b).unwrap().paise(), 500);
        assert_eq!(b.checked_mul_quantity(4).unwrap().paise(), 2000);
    }

    #[test]
    fn test_arithmetic_overflow_is_none() {
        let max = Money::from_paise(i64::MAX);

        assert!(max.checked_add(Money::from_paise(1)).is_none());
        assert!(Money::from_paise(i64::MIN).checked_sub(Money::from_paise(1)).is_none());
        assert!(Money::from_paise(10000).checked_mul_quantity(i64::MAX).is_none());
        // 100% of the largest amount still fits.
        assert_eq!(max.calculate_tax(TaxRate::from_bps(10_000)), Some(max));
        assert!(max.calculate_tax(TaxRate::from_bps(20_000)).is_none());
    }

    #[test]
    fn test_tax_calculation_with_rounding() {
        // ₹10.00 at 8.25% = ₹0.825 → ₹0.83 (half up)
        let tax = Money::from_paise(1000).calculate_tax(TaxRate::from_bps(825)).unwrap();
        assert_eq!(tax.paise(), 83);

        // ₹250.00 at 18% = ₹45.00
        let tax = Money::from_paise(25000).calculate_tax(TaxRate::from_bps(1800)).unwrap();
        assert_eq!(tax.paise(), 4500);
    }
}
