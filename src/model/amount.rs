//! Amount type for handling rupee values as they appear in spreadsheet cells.
//!
//! This module provides the `Amount` type which wraps `Decimal` and handles parsing values that
//! may or may not include a rupee sign or comma separators.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Represents a rupee amount.
///
/// The stored cell value is the plain decimal (e.g. `1250.50`); the currency symbol and digit
/// grouping only appear in rendered output via [`Amount::display_inr`]. Parsing accepts cells
/// that carry a `₹` or `Rs` prefix or comma separators and strips them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount {
    value: Decimal,
}

impl Amount {
    /// Creates a new Amount from a Decimal value.
    pub const fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.value
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.value().is_zero()
    }

    /// Returns true if the amount is positive.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.value().is_sign_positive()
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        self.value().is_sign_negative()
    }

    /// Renders the amount for display, e.g. `₹12,345.60` or `-₹150.00`.
    pub fn display_inr(&self) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        let num = self.value().abs();
        format!(
            "{sign}₹{}",
            format_num::format_num!(",.2", num.to_f64().unwrap_or_default())
        )
    }
}

/// An error that can occur when parsing strings into `Decimal` values.
pub struct AmountError(rust_decimal::Error);

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        // An empty cell reads as zero.
        if trimmed.is_empty() {
            return Ok(Amount::default());
        }

        // Separate the sign so that both "-₹50" and "₹-50" parse.
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        // Strip a currency prefix if present.
        let unsigned = unsigned
            .strip_prefix('₹')
            .or_else(|| unsigned.strip_prefix("Rs."))
            .or_else(|| unsigned.strip_prefix("Rs"))
            .unwrap_or(unsigned)
            .trim_start();

        let (negative, unsigned) = match unsigned.strip_prefix('-') {
            Some(rest) => (!negative, rest),
            None => (negative, unsigned),
        };

        // Remove comma separators.
        let cleaned = unsigned.replace(',', "");

        let mut value = Decimal::from_str(&cleaned).map_err(AmountError)?;
        if negative {
            value.set_sign_negative(true);
        }
        Ok(Amount { value })
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.value, f)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain() {
        let amount = Amount::from_str("50.00").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("50.00").unwrap());
    }

    #[test]
    fn test_parse_with_rupee_sign() {
        let amount = Amount::from_str("₹50.00").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("50.00").unwrap());
    }

    #[test]
    fn test_parse_with_rs_prefix() {
        let amount = Amount::from_str("Rs. 1,250.50").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("1250.50").unwrap());
    }

    #[test]
    fn test_parse_negative() {
        let amount = Amount::from_str("-₹50.00").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("-50.00").unwrap());
    }

    #[test]
    fn test_parse_empty_string() {
        let amount = Amount::from_str("").unwrap();
        assert_eq!(amount.value(), Decimal::ZERO);
    }

    #[test]
    fn test_parse_whitespace() {
        let amount = Amount::from_str("  ₹50.00  ").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("50.00").unwrap());
    }

    #[test]
    fn test_parse_with_commas() {
        let amount = Amount::from_str("1,00,000.00").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("100000.00").unwrap());
    }

    #[test]
    fn test_parse_garbage_fails() {
        assert!(Amount::from_str("fifty").is_err());
    }

    #[test]
    fn test_display_round_trip() {
        let amount = Amount::from_str("1250.50").unwrap();
        assert_eq!(amount.to_string(), "1250.50");
        let reparsed = Amount::from_str(&amount.to_string()).unwrap();
        assert_eq!(reparsed, amount);
    }

    #[test]
    fn test_display_inr() {
        let amount = Amount::from_str("12345.6").unwrap();
        assert_eq!(amount.display_inr(), "₹12,345.60");
    }

    #[test]
    fn test_display_inr_negative() {
        let amount = Amount::from_str("-150").unwrap();
        assert_eq!(amount.display_inr(), "-₹150.00");
    }

    #[test]
    fn test_serialize() {
        let amount = Amount::from_str("50.00").unwrap();
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "\"50.00\"");
    }

    #[test]
    fn test_deserialize() {
        let amount: Amount = serde_json::from_str("\"₹1,000.00\"").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("1000.00").unwrap());
    }

    #[test]
    fn test_zero_is_not_positive_or_negative() {
        let zero = Amount::from_str("0.00").unwrap();
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());
        assert!(zero.is_zero());
    }
}
