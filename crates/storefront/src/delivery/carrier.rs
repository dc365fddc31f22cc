//! Courier dispatch and the errors a single courier call can produce.

use std::time::Duration;

use thiserror::Error;

use super::econt::EcontClient;
use super::speedy::SpeedyClient;
use super::{DeliveryRequest, ProviderId, RateQuote};
use crate::config::DeliveryConfig;

/// Errors from one courier API call.
#[derive(Debug, Error)]
pub enum CarrierError {
    /// HTTP request failed (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Courier returned a non-success status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Courier accepted the request but reported a business error.
    #[error("API error: {0}")]
    Api(String),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Response parsed but is missing data we need.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// The courier cannot ship to this country.
    #[error("Country not served by carrier: {0}")]
    UnsupportedCountry(String),
}

/// A configured courier.
#[derive(Clone)]
pub enum Carrier {
    Econt(EcontClient),
    Speedy(SpeedyClient),
}

impl Carrier {
    /// Build every courier that has credentials configured.
    ///
    /// # Errors
    ///
    /// Returns `CarrierError::Http` if an HTTP client cannot be created.
    pub fn from_config(config: &DeliveryConfig) -> Result<Vec<Self>, CarrierError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let mut carriers = Vec::new();

        if let Some(credentials) = &config.econt {
            carriers.push(Self::Econt(EcontClient::new(credentials, timeout)?));
        }
        if let Some(credentials) = &config.speedy {
            carriers.push(Self::Speedy(SpeedyClient::new(credentials, timeout)?));
        }

        Ok(carriers)
    }

    /// Which courier this is.
    #[must_use]
    pub const fn provider(&self) -> ProviderId {
        match self {
            Self::Econt(_) => ProviderId::Econt,
            Self::Speedy(_) => ProviderId::Speedy,
        }
    }

    /// Ask the courier for a price.
    ///
    /// # Errors
    ///
    /// Returns `CarrierError` if the courier is unreachable, rejects the
    /// request, or answers with something we cannot read.
    pub async fn quote(&self, request: &DeliveryRequest) -> Result<RateQuote, CarrierError> {
        match self {
            Self::Econt(client) => client.quote(request).await,
            Self::Speedy(client) => client.quote(request).await,
        }
    }
}

/// Read a courier response body, turning non-2xx statuses into errors.
///
/// `error_message` extracts the courier's own error text from the body when
/// it has one.
pub(crate) async fn read_body(
    response: reqwest::Response,
    error_message: fn(&str) -> Option<String>,
) -> Result<String, CarrierError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        tracing::warn!(
            status = %status,
            body = %body.chars().take(500).collect::<String>(),
            "Carrier API returned non-success status"
        );
        let message = error_message(&body)
            .unwrap_or_else(|| body.chars().take(200).collect::<String>());
        return Err(CarrierError::Status {
            status: status.as_u16(),
            message,
        });
    }

    Ok(body)
}

/// Normalise a base URL so joined paths don't double or drop slashes.
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
