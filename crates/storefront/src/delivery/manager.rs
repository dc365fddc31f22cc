//! Concurrent quoting across all configured couriers.

use futures::future::join_all;
use indecisive_wear_core::DeliveryAddress;
use rust_decimal::Decimal;
use tracing::{info, instrument, warn};

use super::options::{DeliveryOption, delivery_options};
use super::{Carrier, DeliveryError, DeliveryRequest, RateQuote, usable_quotes};
use crate::config::DeliveryConfig;

/// Quotes parcels with every configured courier.
#[derive(Clone)]
pub struct DeliveryManager {
    carriers: Vec<Carrier>,
    supported_countries: Vec<String>,
    min_weight_kg: Decimal,
    office_discount_percent: u8,
}

impl DeliveryManager {
    /// Build a manager with the couriers that have credentials configured.
    ///
    /// # Errors
    ///
    /// Returns `DeliveryError::Setup` if a courier client cannot be created.
    pub fn from_config(config: &DeliveryConfig) -> Result<Self, DeliveryError> {
        let carriers = Carrier::from_config(config)?;
        Ok(Self::new(carriers, config))
    }

    /// Build a manager from explicit couriers, taking limits from `config`.
    #[must_use]
    pub fn new(carriers: Vec<Carrier>, config: &DeliveryConfig) -> Self {
        Self {
            carriers,
            supported_countries: config.supported_countries.clone(),
            min_weight_kg: config.min_weight_kg,
            office_discount_percent: config.office_discount_percent,
        }
    }

    /// Configured couriers.
    #[must_use]
    pub fn carriers(&self) -> &[Carrier] {
        &self.carriers
    }

    fn ships_to(&self, destination: &DeliveryAddress) -> bool {
        self.supported_countries
            .iter()
            .any(|c| destination.is_in_country(c))
    }

    /// Ask every courier for a price at once and wait for all of them.
    ///
    /// Couriers that fail are returned as quotes carrying `errors`; use
    /// [`usable_quotes`](super::usable_quotes) to drop them. Weight is raised
    /// to the configured minimum before any courier is called.
    ///
    /// # Errors
    ///
    /// Returns `DeliveryError::UnsupportedDestination` for countries we do not
    /// ship to and `DeliveryError::NoProviders` when no courier is configured.
    #[instrument(
        skip(self, request),
        fields(country = %request.to.country_code, weight = %request.weight_kg)
    )]
    pub async fn quote_rates(
        &self,
        request: &DeliveryRequest,
    ) -> Result<Vec<RateQuote>, DeliveryError> {
        if !self.ships_to(&request.to) {
            return Err(DeliveryError::UnsupportedDestination(
                request.to.country_code.clone(),
            ));
        }
        if self.carriers.is_empty() {
            return Err(DeliveryError::NoProviders);
        }

        let mut request = request.clone();
        request.weight_kg = request.weight_kg.max(self.min_weight_kg);
        let request = &request;

        let quotes = join_all(self.carriers.iter().map(|carrier| async move {
            carrier.quote(request).await.unwrap_or_else(|e| {
                warn!(provider = %carrier.provider(), error = %e, "Carrier quote failed");
                RateQuote::failed(carrier.provider(), e.to_string())
            })
        }))
        .await;

        Ok(quotes)
    }

    /// Home and office options for one usable quote.
    #[must_use]
    pub fn delivery_options(&self, quote: &RateQuote) -> [DeliveryOption; 2] {
        delivery_options(quote, self.office_discount_percent)
    }

    /// Every delivery option we can offer for this parcel.
    ///
    /// Never fails: unsupported destinations, courier outages and setup
    /// problems are logged and yield an empty list, so checkout keeps working
    /// without shipping choices.
    pub async fn available_options(&self, request: &DeliveryRequest) -> Vec<DeliveryOption> {
        let quotes = match self.quote_rates(request).await {
            Ok(quotes) => quotes,
            Err(DeliveryError::UnsupportedDestination(country)) => {
                info!(country = %country, "No delivery options for unsupported destination");
                return Vec::new();
            }
            Err(e) => {
                tracing::error!(error = %e, "Delivery quoting unavailable");
                return Vec::new();
            }
        };

        let requested = quotes.len();
        let usable = usable_quotes(quotes);

        if usable.is_empty() {
            tracing::error!(carriers = requested, "Every carrier failed to quote");
        } else if usable.len() < requested {
            warn!(
                carriers = requested,
                usable = usable.len(),
                "Some carriers failed to quote"
            );
        }

        usable
            .iter()
            .flat_map(|quote| self.delivery_options(quote))
            .collect()
    }
}
