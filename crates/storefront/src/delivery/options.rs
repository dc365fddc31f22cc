//! Customer-facing delivery options derived from courier quotes.

use indecisive_wear_core::CurrencyCode;
use indecisive_wear_core::types::price::round_half_up;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ProviderId, RateQuote};

/// Where the parcel is handed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryKind {
    /// Courier delivers to the customer's address.
    Home,
    /// Customer collects from the courier's office.
    Office,
}

impl DeliveryKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Office => "office",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Home => "Home delivery",
            Self::Office => "Office pickup",
        }
    }
}

/// A shipping choice presented at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryOption {
    pub provider: ProviderId,
    pub kind: DeliveryKind,
    pub price: Decimal,
    pub currency: CurrencyCode,
    pub min_days: u32,
    pub max_days: u32,
}

/// Split a usable quote into home and office options.
///
/// Home delivery costs the quoted price and takes `estimated_days` to one day
/// more. Office pickup is `office_discount_percent` cheaper and one day faster,
/// but never under one day.
#[must_use]
pub fn delivery_options(quote: &RateQuote, office_discount_percent: u8) -> [DeliveryOption; 2] {
    let home_min = quote.estimated_days.max(1);
    let office_min = home_min.saturating_sub(1).max(1);

    let office_share = Decimal::from(100 - u32::from(office_discount_percent.min(99)));
    let office_price = round_half_up(quote.price * office_share / Decimal::ONE_HUNDRED, 2);

    [
        DeliveryOption {
            provider: quote.provider,
            kind: DeliveryKind::Home,
            price: quote.price,
            currency: quote.currency,
            min_days: home_min,
            max_days: home_min + 1,
        },
        DeliveryOption {
            provider: quote.provider,
            kind: DeliveryKind::Office,
            price: office_price,
            currency: quote.currency,
            min_days: office_min,
            max_days: office_min + 1,
        },
    ]
}
