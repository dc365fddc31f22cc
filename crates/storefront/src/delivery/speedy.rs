//! Speedy shipping-price client.
//!
//! Uses the `calculate` endpoint of the Speedy REST API. Credentials travel in
//! the request body rather than in headers.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::carrier::{CarrierError, endpoint, read_body};
use super::{DeliveryRequest, ProviderId, RateQuote};
use crate::config::CarrierCredentials;
use indecisive_wear_core::{CurrencyCode, DeliveryAddress};

/// Speedy "Standard" parcel service.
const STANDARD_SERVICE_ID: u32 = 505;

/// Speedy identifies countries by ISO 3166-1 numeric code.
fn country_id(country_code: &str) -> Option<u16> {
    match country_code.trim().to_ascii_uppercase().as_str() {
        "BG" => Some(100),
        "GR" => Some(300),
        "RO" => Some(642),
        _ => None,
    }
}

/// Speedy calculation client.
#[derive(Clone)]
pub struct SpeedyClient {
    inner: Arc<SpeedyClientInner>,
}

struct SpeedyClientInner {
    client: reqwest::Client,
    endpoint: String,
    username: String,
    password: SecretString,
    fallback_days: u32,
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CalculationRequest<'a> {
    user_name: &'a str,
    password: &'a str,
    language: &'static str,
    sender: Party<'a>,
    recipient: Party<'a>,
    service: Service,
    content: Content,
    payment: Payment,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Party<'a> {
    phone1: Phone<'a>,
    client_name: &'a str,
    email: &'a str,
    private_person: bool,
    address_location: AddressLocation<'a>,
}

#[derive(Debug, Serialize)]
struct Phone<'a> {
    number: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AddressLocation<'a> {
    country_id: u16,
    site_name: &'a str,
    post_code: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Service {
    auto_adjust_pickup_date: bool,
    service_ids: [u32; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    additional_services: Option<AdditionalServices>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AdditionalServices {
    declared_value: DeclaredValue,
}

#[derive(Debug, Serialize)]
struct DeclaredValue {
    amount: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Content {
    parcels_count: u32,
    total_weight: f64,
    contents: &'static str,
    package: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Payment {
    courier_service_payer: &'static str,
}

#[derive(Debug, Deserialize)]
struct CalculationResponse {
    #[serde(default)]
    calculations: Vec<Calculation>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Calculation {
    price: Option<CalculationPrice>,
    pickup_date: Option<String>,
    delivery_deadline: Option<String>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct CalculationPrice {
    total: Decimal,
    currency: String,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

// =============================================================================
// SpeedyClient
// =============================================================================

impl SpeedyClient {
    /// Create a new Speedy client.
    ///
    /// # Errors
    ///
    /// Returns `CarrierError::Http` if the HTTP client cannot be created.
    pub fn new(credentials: &CarrierCredentials, timeout: Duration) -> Result<Self, CarrierError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        Ok(Self {
            inner: Arc::new(SpeedyClientInner {
                client,
                endpoint: endpoint(&credentials.base_url, "calculate"),
                username: credentials.username.clone(),
                password: credentials.password.clone(),
                fallback_days: credentials.transit_days.max(1),
            }),
        })
    }

    /// Price a parcel with the standard service.
    ///
    /// # Errors
    ///
    /// Returns `CarrierError` on transport failure, a non-2xx status, a
    /// Speedy error payload, a country Speedy does not serve, or a response
    /// without a calculation.
    #[instrument(skip(self, request), fields(provider = "speedy", weight = %request.weight_kg))]
    pub async fn quote(&self, request: &DeliveryRequest) -> Result<RateQuote, CarrierError> {
        let body = CalculationRequest {
            user_name: &self.inner.username,
            password: self.inner.password.expose_secret(),
            language: "EN",
            sender: party(&request.from, false)?,
            recipient: party(&request.to, true)?,
            service: Service {
                auto_adjust_pickup_date: true,
                service_ids: [STANDARD_SERVICE_ID],
                additional_services: request.declared_value.map(|value| AdditionalServices {
                    declared_value: DeclaredValue {
                        amount: value.to_f64().unwrap_or_default(),
                    },
                }),
            },
            content: Content {
                parcels_count: 1,
                total_weight: request.weight_kg.to_f64().unwrap_or_default(),
                contents: "Clothing",
                package: "BOX",
            },
            payment: Payment {
                courier_service_payer: "RECIPIENT",
            },
        };

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .json(&body)
            .send()
            .await?;

        let text = read_body(response, error_message).await?;
        let parsed: CalculationResponse = serde_json::from_str(&text)?;
        self.into_quote(parsed)
    }

    fn into_quote(&self, response: CalculationResponse) -> Result<RateQuote, CarrierError> {
        if let Some(error) = response.error {
            return Err(CarrierError::Api(error.message));
        }

        let calculation = response
            .calculations
            .into_iter()
            .next()
            .ok_or_else(|| CarrierError::UnexpectedResponse("no calculations".to_string()))?;

        if let Some(error) = calculation.error {
            return Err(CarrierError::Api(error.message));
        }

        let price = calculation
            .price
            .ok_or_else(|| CarrierError::UnexpectedResponse("missing price".to_string()))?;
        let currency = price
            .currency
            .parse::<CurrencyCode>()
            .map_err(|e| CarrierError::UnexpectedResponse(e.to_string()))?;

        let days = transit_days(
            calculation.pickup_date.as_deref(),
            calculation.delivery_deadline.as_deref(),
        )
        .unwrap_or(self.inner.fallback_days);

        Ok(RateQuote::new(ProviderId::Speedy, price.total, currency, days))
    }
}

fn party(address: &DeliveryAddress, private_person: bool) -> Result<Party<'_>, CarrierError> {
    let country_id = country_id(&address.country_code)
        .ok_or_else(|| CarrierError::UnsupportedCountry(address.country_code.clone()))?;

    Ok(Party {
        phone1: Phone {
            number: &address.phone,
        },
        client_name: &address.name,
        email: &address.email,
        private_person,
        address_location: AddressLocation {
            country_id,
            site_name: &address.city,
            post_code: &address.postal_code,
        },
    })
}

/// Days between pickup and the delivery deadline, at least one.
///
/// Both values start with an ISO date; the deadline also carries a time.
fn transit_days(pickup: Option<&str>, deadline: Option<&str>) -> Option<u32> {
    let parse = |value: &str| NaiveDate::parse_from_str(value.get(..10)?, "%Y-%m-%d").ok();
    let pickup = parse(pickup?)?;
    let deadline = parse(deadline?)?;

    let days = (deadline - pickup).num_days().max(1);
    u32::try_from(days).ok()
}

fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<CalculationResponse>(body)
        .ok()?
        .error
        .map(|e| e.message)
}
