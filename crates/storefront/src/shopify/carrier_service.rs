//! Shopify carrier-service callback types.
//!
//! At checkout Shopify POSTs the cart and addresses to our callback URL and
//! expects `{ "rates": [...] }` back. This module maps that payload onto a
//! [`DeliveryRequest`] and delivery options back onto Shopify rates.
//!
//! See <https://shopify.dev/docs/api/admin-rest/latest/resources/carrierservice>.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use hmac::{Hmac, Mac};
use indecisive_wear_core::{CurrencyCode, DeliveryAddress, Price};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use crate::delivery::{DeliveryOption, DeliveryRequest};

/// Header carrying the base64 HMAC-SHA256 of the request body.
pub const HMAC_HEADER: &str = "X-Shopify-Hmac-Sha256";

/// Used when the checkout address has no phone number.
pub const PLACEHOLDER_PHONE: &str = "0000000000";

/// Used when the checkout address has no email.
pub const PLACEHOLDER_EMAIL: &str = "noreply@indecisive-wear.com";

type HmacSha256 = Hmac<Sha256>;

/// A rate request that cannot be turned into a parcel.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RateRequestError {
    /// Line weight or value overflows when multiplied out and summed.
    #[error("cart {0} is too large")]
    TotalsOverflow(&'static str),
}

// =============================================================================
// Request Payload
// =============================================================================

/// Body of a carrier-service rate request.
#[derive(Debug, Clone, Deserialize)]
pub struct RateRequestPayload {
    pub rate: RateRequest,
}

/// Cart and addresses Shopify wants priced.
#[derive(Debug, Clone, Deserialize)]
pub struct RateRequest {
    /// Shop location. Missing when the shop has no fulfillment address.
    #[serde(default)]
    pub origin: Option<ShopifyAddress>,
    pub destination: ShopifyAddress,
    #[serde(default)]
    pub items: Vec<ShopifyItem>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
}

/// Address as sent by Shopify; every field may be null.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShopifyAddress {
    /// ISO 3166-1 alpha-2 code.
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub province: Option<String>,
    pub city: Option<String>,
    pub name: Option<String>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub company_name: Option<String>,
}

/// One cart line.
#[derive(Debug, Clone, Deserialize)]
pub struct ShopifyItem {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    pub quantity: u32,
    pub grams: u32,
    /// Unit price in minor units.
    pub price: u64,
    #[serde(default = "default_true")]
    pub requires_shipping: bool,
}

const fn default_true() -> bool {
    true
}

// =============================================================================
// Response
// =============================================================================

/// Body of a carrier-service rate response.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RateResponse {
    pub rates: Vec<ShopifyRate>,
}

/// A shipping rate shown at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShopifyRate {
    pub service_name: String,
    pub service_code: String,
    /// Price in minor units, as a string.
    pub total_price: String,
    pub description: String,
    pub currency: String,
    /// `YYYY-MM-DD`.
    pub min_delivery_date: String,
    /// `YYYY-MM-DD`.
    pub max_delivery_date: String,
    pub phone_required: bool,
}

impl ShopifyRate {
    /// Build a rate for `option`, counting delivery days from `today`.
    #[must_use]
    pub fn from_option(option: &DeliveryOption, today: NaiveDate) -> Self {
        let min_date = add_business_days(today, option.min_days);
        let max_date = add_business_days(today, option.max_days);

        Self {
            service_name: format!(
                "{} - {}",
                option.provider.display_name(),
                option.kind.label()
            ),
            service_code: format!("{}_{}", option.provider.as_str(), option.kind.as_str()),
            total_price: Price::new(option.price, option.currency).minor_units(),
            description: format!(
                "Delivery in {}-{} business days",
                option.min_days, option.max_days
            ),
            currency: option.currency.code().to_string(),
            min_delivery_date: min_date.format("%Y-%m-%d").to_string(),
            max_delivery_date: max_date.format("%Y-%m-%d").to_string(),
            phone_required: true,
        }
    }
}

impl RateResponse {
    /// Shopify rates for every delivery option.
    #[must_use]
    pub fn from_options(options: &[DeliveryOption], today: NaiveDate) -> Self {
        Self {
            rates: options
                .iter()
                .map(|option| ShopifyRate::from_option(option, today))
                .collect(),
        }
    }
}

// =============================================================================
// Adapters
// =============================================================================

impl RateRequest {
    /// Convert into a courier-neutral request.
    ///
    /// `fallback_origin` is used when Shopify sends no origin. Items that do
    /// not require shipping are ignored. A missing or unknown currency falls
    /// back to the store default.
    ///
    /// # Errors
    ///
    /// Returns [`RateRequestError::TotalsOverflow`] when the cart weight or
    /// value does not fit in 64 bits.
    pub fn to_delivery_request(
        &self,
        fallback_origin: &DeliveryAddress,
    ) -> Result<DeliveryRequest, RateRequestError> {
        let from = self
            .origin
            .as_ref()
            .map_or_else(|| fallback_origin.clone(), ShopifyAddress::to_delivery_address);

        let grams = self.shipped_total("weight", |item| u64::from(item.grams))?;
        let minor_units = self.shipped_total("value", |item| item.price)?;

        let currency = self
            .currency
            .as_deref()
            .and_then(|code| code.parse::<CurrencyCode>().ok())
            .unwrap_or_default();

        Ok(DeliveryRequest {
            from,
            to: self.destination.to_delivery_address(),
            weight_kg: Decimal::from(grams) / Decimal::ONE_THOUSAND,
            declared_value: Some(Decimal::from(minor_units) / Decimal::ONE_HUNDRED),
            currency,
        })
    }

    /// Sum of `per_unit * quantity` over items that need shipping.
    fn shipped_total(
        &self,
        what: &'static str,
        per_unit: impl Fn(&ShopifyItem) -> u64,
    ) -> Result<u64, RateRequestError> {
        self.items
            .iter()
            .filter(|item| item.requires_shipping)
            .try_fold(0u64, |total, item| {
                per_unit(item)
                    .checked_mul(u64::from(item.quantity))
                    .and_then(|line| total.checked_add(line))
            })
            .ok_or(RateRequestError::TotalsOverflow(what))
    }
}

impl ShopifyAddress {
    /// Convert into a [`DeliveryAddress`], filling contact placeholders.
    #[must_use]
    pub fn to_delivery_address(&self) -> DeliveryAddress {
        let country_code = non_empty(self.country.as_deref())
            .unwrap_or_default()
            .to_ascii_uppercase();

        DeliveryAddress {
            name: non_empty(self.name.as_deref()).unwrap_or_default(),
            phone: non_empty(self.phone.as_deref())
                .unwrap_or_else(|| PLACEHOLDER_PHONE.to_string()),
            email: non_empty(self.email.as_deref())
                .unwrap_or_else(|| PLACEHOLDER_EMAIL.to_string()),
            address1: non_empty(self.address1.as_deref()).unwrap_or_default(),
            address2: non_empty(self.address2.as_deref()),
            city: non_empty(self.city.as_deref()).unwrap_or_default(),
            province: non_empty(self.province.as_deref()),
            postal_code: non_empty(self.postal_code.as_deref()).unwrap_or_default(),
            country: country_name(&country_code).to_string(),
            country_code,
            company: non_empty(self.company_name.as_deref()),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

/// English country name for the codes couriers care about.
fn country_name(code: &str) -> &str {
    match code {
        "BG" => "Bulgaria",
        "GR" => "Greece",
        "RO" => "Romania",
        other => other,
    }
}

/// Add `days` working days to `date`, skipping Saturdays and Sundays.
#[must_use]
pub fn add_business_days(date: NaiveDate, days: u32) -> NaiveDate {
    let mut current = date;
    let mut remaining = days;
    while remaining > 0 {
        current += Duration::days(1);
        if !matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            remaining -= 1;
        }
    }
    current
}

// =============================================================================
// Signature
// =============================================================================

/// Check Shopify's HMAC over the raw request body.
///
/// The comparison is constant-time. A missing or undecodable header fails.
#[must_use]
pub fn verify_signature(body: &[u8], header: Option<&str>, secret: &str) -> bool {
    let Some(provided) = header.map(str::trim).filter(|h| !h.is_empty()) else {
        return false;
    };
    let Ok(provided) = STANDARD.decode(provided) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&provided).is_ok()
}

/// Base64 HMAC-SHA256 of `body`, as Shopify would send it.
#[must_use]
pub fn sign(body: &[u8], secret: &str) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(body);
    Some(STANDARD.encode(mac.finalize().into_bytes()))
}
