//! Type-safe price representation using decimal arithmetic.

use core::fmt;
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Error returned when a currency code is not one the store trades in.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported currency code: {0}")]
pub struct CurrencyError(pub String);

/// ISO 4217 currency codes accepted by the store and its carriers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    BGN,
    EUR,
    GBP,
    USD,
}

impl CurrencyCode {
    /// The three-letter ISO code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::BGN => "BGN",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::USD => "USD",
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CurrencyCode {
    type Err = CurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BGN" => Ok(Self::BGN),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "USD" => Ok(Self::USD),
            _ => Err(CurrencyError(s.to_string())),
        }
    }
}

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., leva, not stotinki).
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

    /// Amount rounded to whole units, halves away from zero.
    #[must_use]
    pub fn whole_units(&self) -> Decimal {
        round_half_up(self.amount, 0)
    }

    /// Amount in minor units (cents, stotinki) as an integer string.
    ///
    /// This is the shape Shopify expects for carrier-service `total_price`.
    #[must_use]
    pub fn minor_units(&self) -> String {
        round_half_up(self.amount * Decimal::ONE_HUNDRED, 0)
            .normalize()
            .to_string()
    }
}

/// Round to `dp` decimal places, halves away from zero.
///
/// `Decimal::round` uses banker's rounding, which does not match how prices
/// and percentages are shown to customers.
#[must_use]
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}
