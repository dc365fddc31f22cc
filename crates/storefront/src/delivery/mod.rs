//! Shipping-rate aggregation across courier APIs.
//!
//! # Architecture
//!
//! - Each courier is a thin `reqwest` JSON client ([`econt`], [`speedy`])
//! - [`Carrier`] dispatches to the configured couriers
//! - [`DeliveryManager`] fans requests out to every courier concurrently and
//!   gathers the results; one courier failing never hides the others
//! - Every usable quote becomes two customer-facing options: home delivery
//!   and (cheaper, faster) office pickup
//!
//! Checkout must keep working when couriers are down, so the HTTP layer uses
//! [`DeliveryManager::available_options`], which logs failures and degrades to
//! "no shipping options" instead of returning an error.

pub mod carrier;
pub mod econt;
mod manager;
mod options;
pub mod speedy;

pub use carrier::{Carrier, CarrierError};
pub use manager::DeliveryManager;
pub use options::{DeliveryKind, DeliveryOption, delivery_options};

use std::fmt;

use indecisive_wear_core::{CurrencyCode, DeliveryAddress};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that stop a whole quoting batch (as opposed to one courier).
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// We do not ship to the destination country.
    #[error("Unsupported destination country: {0}")]
    UnsupportedDestination(String),

    /// No courier is configured.
    #[error("No delivery providers configured")]
    NoProviders,

    /// A courier client could not be built.
    #[error("Carrier setup failed: {0}")]
    Setup(#[from] CarrierError),
}

/// Couriers we integrate with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Econt,
    Speedy,
}

impl ProviderId {
    /// Stable lower-case identifier, used in service codes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Econt => "econt",
            Self::Speedy => "speedy",
        }
    }

    /// Customer-facing courier name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Econt => "Econt",
            Self::Speedy => "Speedy",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parcel to be priced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryRequest {
    pub from: DeliveryAddress,
    pub to: DeliveryAddress,
    /// Total parcel weight in kilograms.
    pub weight_kg: Decimal,
    /// Declared value for insurance, in `currency`.
    pub declared_value: Option<Decimal>,
    /// Currency of the cart, and so of `declared_value`.
    #[serde(default)]
    pub currency: CurrencyCode,
}

/// One courier's answer to a [`DeliveryRequest`].
///
/// A quote with errors is unusable; it is kept so failures can be logged
/// alongside the quotes that succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateQuote {
    pub provider: ProviderId,
    pub price: Decimal,
    pub currency: CurrencyCode,
    /// Estimated transit time in days.
    pub estimated_days: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl RateQuote {
    /// A successful quote.
    #[must_use]
    pub const fn new(
        provider: ProviderId,
        price: Decimal,
        currency: CurrencyCode,
        estimated_days: u32,
    ) -> Self {
        Self {
            provider,
            price,
            currency,
            estimated_days,
            errors: Vec::new(),
        }
    }

    /// A placeholder quote recording why a courier failed.
    #[must_use]
    pub fn failed(provider: ProviderId, error: impl Into<String>) -> Self {
        Self {
            provider,
            price: Decimal::ZERO,
            currency: CurrencyCode::default(),
            estimated_days: 0,
            errors: vec![error.into()],
        }
    }

    /// Whether the quote can be shown to customers.
    #[must_use]
    pub const fn is_usable(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Keep only quotes without errors.
pub fn usable_quotes(quotes: impl IntoIterator<Item = RateQuote>) -> Vec<RateQuote> {
    quotes.into_iter().filter(RateQuote::is_usable).collect()
}
