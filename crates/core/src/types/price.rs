//! Non-negative decimal price type.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative: {0}")]
    Negative(Decimal),
}

/// A product price.
///
/// Amounts are decimal (never floating point) and guaranteed non-negative at
/// construction. Display renders as `$x.xx`.
///
/// ```
/// use gadget_grove_core::Price;
/// use rust_decimal::Decimal;
///
/// let price = Price::new(Decimal::new(1999_99, 2)).expect("non-negative");
/// assert_eq!(price.to_string(), "$1999.99");
/// assert!(Price::new(Decimal::new(-5, 0)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Total for `quantity` units at this price.
    #[must_use]
    pub fn line_total(&self, quantity: u32) -> Decimal {
        self.0 * Decimal::from(quantity)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("decimal literal")
    }

    #[test]
    fn rejects_negative_amounts() {
        assert_eq!(
            Price::new(dec("-5")),
            Err(PriceError::Negative(dec("-5")))
        );
    }

    #[test]
    fn accepts_zero_and_positive_amounts() {
        assert!(Price::new(Decimal::ZERO).is_ok());
        assert!(Price::new(dec("1999.99")).is_ok());
    }

    #[test]
    fn line_total_multiplies_by_quantity() {
        let price = Price::new(dec("1999.99")).expect("non-negative");
        assert_eq!(price.line_total(3), dec("5999.97"));
        assert_eq!(price.line_total(0), Decimal::ZERO);
    }

    #[test]
    fn displays_with_two_decimal_places() {
        let price = Price::new(dec("1599.9")).expect("non-negative");
        assert_eq!(price.to_string(), "$1599.90");
    }

    #[test]
    fn deserializing_a_negative_price_fails() {
        let result: Result<Price, _> = serde_json::from_str("-1.50");
        assert!(result.is_err());
    }
}
