//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::delivery::{DeliveryError, DeliveryManager};
use crate::shopify::StorefrontClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// Shopify client, the courier manager and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    storefront: StorefrontClient,
    delivery: DeliveryManager,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if a courier client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, DeliveryError> {
        let storefront = StorefrontClient::new(&config.shopify);
        let delivery = DeliveryManager::from_config(&config.delivery)?;

        Ok(Self::from_parts(config, storefront, delivery))
    }

    /// Assemble state from already-built clients.
    #[must_use]
    pub fn from_parts(
        config: StorefrontConfig,
        storefront: StorefrontClient,
        delivery: DeliveryManager,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                storefront,
                delivery,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the Shopify Storefront API client.
    #[must_use]
    pub fn storefront(&self) -> &StorefrontClient {
        &self.inner.storefront
    }

    /// Get a reference to the courier manager.
    #[must_use]
    pub fn delivery(&self) -> &DeliveryManager {
        &self.inner.delivery
    }
}
