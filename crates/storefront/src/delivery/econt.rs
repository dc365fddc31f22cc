//! Econt Express shipping-price client.
//!
//! Econt prices a parcel through its label service in `calculate` mode, which
//! validates the label and returns the price without creating a shipment.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::carrier::{CarrierError, endpoint, read_body};
use super::{DeliveryRequest, ProviderId, RateQuote};
use crate::config::CarrierCredentials;
use indecisive_wear_core::{CurrencyCode, DeliveryAddress};

const CREATE_LABEL_PATH: &str = "Shipments/LabelService.createLabel.json";

/// Econt label-service client.
#[derive(Clone)]
pub struct EcontClient {
    inner: Arc<EcontClientInner>,
}

struct EcontClientInner {
    client: reqwest::Client,
    endpoint: String,
    username: String,
    password: SecretString,
    transit_days: u32,
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CalculateRequest<'a> {
    label: Label<'a>,
    mode: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Label<'a> {
    sender_client: Client<'a>,
    sender_address: Address<'a>,
    receiver_client: Client<'a>,
    receiver_address: Address<'a>,
    pack_count: u32,
    shipment_type: &'static str,
    weight: f64,
    shipment_description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    services: Option<Services>,
}

#[derive(Debug, Serialize)]
struct Client<'a> {
    name: &'a str,
    phones: [&'a str; 1],
    email: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Address<'a> {
    city: City<'a>,
    full_address: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct City<'a> {
    country: Country<'a>,
    name: &'a str,
    post_code: &'a str,
}

#[derive(Debug, Serialize)]
struct Country<'a> {
    code2: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Services {
    declared_value_amount: f64,
    declared_value_currency: &'static str,
}

#[derive(Debug, Deserialize)]
struct CalculateResponse {
    label: Option<LabelPrice>,
    #[serde(rename = "type")]
    error_type: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LabelPrice {
    total_price: Option<Decimal>,
    currency: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

// =============================================================================
// EcontClient
// =============================================================================

impl EcontClient {
    /// Create a new Econt client.
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
            inner: Arc::new(EcontClientInner {
                client,
                endpoint: endpoint(&credentials.base_url, CREATE_LABEL_PATH),
                username: credentials.username.clone(),
                password: credentials.password.clone(),
                transit_days: credentials.transit_days.max(1),
            }),
        })
    }

    /// Price a parcel.
    ///
    /// # Errors
    ///
    /// Returns `CarrierError` on transport failure, a non-2xx status, an
    /// Econt error payload, or a response without a price.
    #[instrument(skip(self, request), fields(provider = "econt", weight = %request.weight_kg))]
    pub async fn quote(&self, request: &DeliveryRequest) -> Result<RateQuote, CarrierError> {
        let body = CalculateRequest {
            label: Label {
                sender_client: client(&request.from),
                sender_address: address(&request.from),
                receiver_client: client(&request.to),
                receiver_address: address(&request.to),
                pack_count: 1,
                shipment_type: "PACK",
                weight: request.weight_kg.to_f64().unwrap_or_default(),
                shipment_description: "Clothing",
                services: request.declared_value.map(|value| Services {
                    declared_value_amount: value.to_f64().unwrap_or_default(),
                    declared_value_currency: request.currency.code(),
                }),
            },
            mode: "calculate",
        };

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .basic_auth(
                &self.inner.username,
                Some(self.inner.password.expose_secret()),
            )
            .json(&body)
            .send()
            .await?;

        let text = read_body(response, error_message).await?;
        let parsed: CalculateResponse = serde_json::from_str(&text)?;
        self.into_quote(parsed)
    }

    fn into_quote(&self, response: CalculateResponse) -> Result<RateQuote, CarrierError> {
        if let Some(message) = response.message.filter(|m| !m.is_empty()) {
            let kind = response.error_type.unwrap_or_else(|| "Error".to_string());
            return Err(CarrierError::Api(format!("{kind}: {message}")));
        }

        let label = response
            .label
            .ok_or_else(|| CarrierError::UnexpectedResponse("missing label".to_string()))?;
        let price = label
            .total_price
            .ok_or_else(|| CarrierError::UnexpectedResponse("missing totalPrice".to_string()))?;
        let currency = label
            .currency
            .as_deref()
            .unwrap_or("BGN")
            .parse::<CurrencyCode>()
            .map_err(|e| CarrierError::UnexpectedResponse(e.to_string()))?;

        Ok(RateQuote::new(
            ProviderId::Econt,
            price,
            currency,
            self.inner.transit_days,
        ))
    }
}

fn client(address: &DeliveryAddress) -> Client<'_> {
    Client {
        name: &address.name,
        phones: [&address.phone],
        email: &address.email,
    }
}

fn address(address: &DeliveryAddress) -> Address<'_> {
    Address {
        city: City {
            country: Country {
                code2: &address.country_code,
            },
            name: &address.city,
            post_code: &address.postal_code,
        },
        full_address: address.street(),
    }
}

fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body).ok()?.message
}
