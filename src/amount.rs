//! Rupee amounts kept at paisa precision.
//!
//! Balances are `rust_decimal` values fixed at 2 decimal places, so
//! `10000.78 - 500` is exactly `9500.78`. All arithmetic is checked: a sum
//! that does not fit is an [`AtmError::InvalidAmount`], never a panic.

use crate::error::{AtmError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

const TOO_LARGE: &str = "Amount is too large for this account.";

/// A rupee amount as typed at the ATM or held in an account.
///
/// Amounts read from the console may be negative or zero; it is up to
/// [`Account`](crate::Account) to reject them.
///
/// ```
/// use std::str::FromStr;
/// use atm_sim::Amount;
///
/// let balance = Amount::from_str("10000.78").unwrap();
/// let left = balance.checked_sub(Amount::from_rupees(500)).unwrap();
/// assert_eq!(left.to_string(), "9500.78");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Amount(Decimal);

impl Amount {
    /// Paisa precision.
    pub const SCALE: u32 = 2;

    pub const ZERO: Self = Amount(Decimal::ZERO);

    /// Wraps a decimal, rounding it to paisa.
    pub fn new(value: Decimal) -> Self {
        let mut paisa = value;
        paisa.rescale(Self::SCALE);
        Amount(paisa)
    }

    pub fn from_rupees(rupees: i64) -> Self {
        Amount::new(Decimal::from(rupees))
    }

    /// Strictly greater than zero once rounded to paisa.
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// `self + rhs`, or `InvalidAmount` naming `rhs` if the sum overflows.
    pub fn checked_add(self, rhs: Amount) -> Result<Amount> {
        self.0
            .checked_add(rhs.0)
            .map(Amount::new)
            .ok_or(AtmError::InvalidAmount {
                amount: rhs,
                reason: TOO_LARGE,
            })
    }

    /// `self - rhs`, or `InvalidAmount` naming `rhs` if the difference overflows.
    pub fn checked_sub(self, rhs: Amount) -> Result<Amount> {
        self.0
            .checked_sub(rhs.0)
            .map(Amount::new)
            .ok_or(AtmError::InvalidAmount {
                amount: rhs,
                reason: TOO_LARGE,
            })
    }
}

impl FromStr for Amount {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Amount::new)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Seed balances arrive as CSV text.
impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Amount::from_str(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amt(s: &str) -> Amount {
        Amount::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_rounds_to_paisa() {
        assert_eq!(amt("500").to_string(), "500.00");
        assert_eq!(amt("  2.25  ").to_string(), "2.25");
        assert_eq!(amt("0.001"), Amount::ZERO);
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert!(Amount::from_str("abc").is_err());
        assert!(Amount::from_str("").is_err());
        assert!(Amount::from_str("12rs").is_err());
    }

    #[test]
    fn test_checked_arithmetic_is_exact() {
        let balance = amt("10000.78");

        assert_eq!(balance.checked_sub(amt("500")).unwrap().to_string(), "9500.78");
        assert_eq!(balance.checked_add(amt("0.22")).unwrap().to_string(), "10001.00");
    }

    #[test]
    fn test_checked_add_overflow_is_invalid_amount() {
        let huge = amt("79228162514264337593543950335");
        let err = amt("10000.78").checked_add(huge).unwrap_err();

        match err {
            AtmError::InvalidAmount { amount, .. } => assert_eq!(amount, huge),
            other => panic!("Expected InvalidAmount, got {:?}", other),
        }
        assert!(amt("-1").checked_sub(huge).is_err());
    }

    #[test]
    fn test_positive_means_at_least_one_paisa() {
        assert!(amt("0.01").is_positive());
        assert!(!Amount::ZERO.is_positive());
        assert!(!amt("-5").is_positive());
    }
}
