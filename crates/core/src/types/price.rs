//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are non-negative amounts in the store currency. The check runs on
//! construction and on deserialization, so a `Price` in hand is always valid.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected price amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("price must not be negative (got {0})")]
pub struct NegativePriceError(pub Decimal);

/// A non-negative price in the store currency (USD).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns `NegativePriceError` if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, NegativePriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(NegativePriceError(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: u64) -> Self {
        Self(Decimal::from(cents) / Decimal::ONE_HUNDRED)
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Decimal {
        self.0.saturating_mul(Decimal::from(quantity))
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format_amount(self.0)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = NegativePriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl ::core::fmt::Display for Price {
    fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
        f.write_str(&self.display())
    }
}

/// Format a decimal amount as a dollar string with two places.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_rejects_negative() {
        let result = Price::new(Decimal::new(-1, 2));
        assert_eq!(result, Err(NegativePriceError(Decimal::new(-1, 2))));
        assert!(Price::new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_price_display() {
        assert_eq!(Price::from_cents(2999).display(), "$29.99");
        assert_eq!(Price::from_cents(12000).display(), "$120.00");
        assert_eq!(Price::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn test_price_times() {
        let price = Price::from_cents(2999);
        assert_eq!(price.times(2), Decimal::new(5998, 2));
        assert_eq!(price.times(0), Decimal::ZERO);
    }

    #[test]
    fn test_price_deserialize_validates() {
        let ok: Price = serde_json::from_str("\"29.99\"").expect("deserialize");
        assert_eq!(ok, Price::from_cents(2999));

        let err = serde_json::from_str::<Price>("\"-5.00\"");
        assert!(err.is_err());
    }
}
