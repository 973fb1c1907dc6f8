//! Type-safe price representation using decimal arithmetic.
//!
//! The backend validates currency fields as fixed two-place decimals, so every
//! amount leaving the storefront goes through [`round_currency`] first.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Number of decimal places used for every currency amount.
pub const CURRENCY_SCALE: u32 = 2;

/// Round an amount to exactly two decimal places, midpoint away from zero.
///
/// The scale is forced to 2 so `100` serializes as `"100.00"`.
#[must_use]
pub fn round_currency(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(CURRENCY_SCALE);
    rounded
}

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dinars, not millimes).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Format for display (e.g., "200.00 DT").
    #[must_use]
    pub fn display(&self) -> String {
        format!(
            "{} {}",
            round_currency(self.amount),
            self.currency_code.symbol()
        )
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    TND,
    EUR,
    USD,
}

impl CurrencyCode {
    /// Display symbol used by the storefront.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::TND => "DT",
            Self::EUR => "€",
            Self::USD => "$",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_round_currency_pads_scale() {
        assert_eq!(round_currency(Decimal::from(100)).to_string(), "100.00");
    }

    #[test]
    fn test_round_currency_midpoint_away_from_zero() {
        let amount = Decimal::from_str("10.005").unwrap();
        assert_eq!(round_currency(amount).to_string(), "10.01");
        let amount = Decimal::from_str("10.004").unwrap();
        assert_eq!(round_currency(amount).to_string(), "10.00");
    }

    #[test]
    fn test_price_display() {
        let price = Price::new(Decimal::from_str("189.5").unwrap(), CurrencyCode::TND);
        assert_eq!(price.display(), "189.50 DT");
    }
}
