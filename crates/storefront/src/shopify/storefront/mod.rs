//! Shopify Storefront API client implementation.
//!
//! Sends GraphQL documents with `reqwest` and decodes responses with `serde`.
//! Product pricing is cached using `moka` (5-minute TTL).

mod queries;

use std::sync::Arc;
use std::time::Duration;

use indecisive_wear_core::ProductPriceFacts;
use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::config::ShopifyStorefrontConfig;
use crate::shopify::types::ProductPricing;
use crate::shopify::{GraphQLError, ShopifyError};

/// GraphQL response envelope.
#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLError>>,
}

#[derive(Debug, Deserialize)]
struct ProductPricingData {
    product: Option<ProductPricing>,
}

// =============================================================================
// StorefrontClient
// =============================================================================

/// Client for the Shopify Storefront API.
///
/// Product pricing is cached for 5 minutes, keyed by handle.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    client: reqwest::Client,
    endpoint: String,
    access_token: SecretString,
    cache: Cache<String, ProductPriceFacts>,
}

impl StorefrontClient {
    /// Create a new Storefront API client.
    #[must_use]
    pub fn new(config: &ShopifyStorefrontConfig) -> Self {
        let endpoint = format!(
            "https://{}/api/{}/graphql.json",
            config.store, config.api_version
        );
        Self::with_endpoint(endpoint, config.storefront_private_token.clone())
    }

    /// Create a client against an explicit GraphQL endpoint.
    #[must_use]
    pub fn with_endpoint(endpoint: impl Into<String>, access_token: SecretString) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(StorefrontClientInner {
                client: reqwest::Client::new(),
                endpoint: endpoint.into(),
                access_token,
                cache,
            }),
        }
    }

    /// Execute a GraphQL query.
    async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, ShopifyError> {
        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            // Private access tokens use a different header than public tokens
            .header(
                "Shopify-Storefront-Private-Token",
                self.inner.access_token.expose_secret(),
            )
            .json(&serde_json::json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ShopifyError::RateLimited(retry_after));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Shopify API returned non-success status"
            );
            return Err(ShopifyError::GraphQL(vec![GraphQLError {
                message: format!(
                    "HTTP {status}: {}",
                    response_text.chars().take(200).collect::<String>()
                ),
                path: vec![],
            }]));
        }

        let response: GraphQLResponse<T> = serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to parse Shopify GraphQL response"
            );
            ShopifyError::Parse(e)
        })?;

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            debug!(errors = ?errors, "GraphQL errors in response");
            return Err(ShopifyError::GraphQL(errors));
        }

        response.data.ok_or_else(|| {
            ShopifyError::GraphQL(vec![GraphQLError {
                message: "No data in response".to_string(),
                path: vec![],
            }])
        })
    }

    /// Pricing facts for a product, by handle.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::NotFound` for unknown handles, and other
    /// `ShopifyError` variants for transport, GraphQL or data problems.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn product_price_facts(
        &self,
        handle: &str,
    ) -> Result<ProductPriceFacts, ShopifyError> {
        if let Some(cached) = self.inner.cache.get(handle).await {
            debug!("Cache hit for product pricing");
            return Ok(cached);
        }

        let data: ProductPricingData = self
            .execute(
                queries::PRODUCT_PRICING,
                serde_json::json!({ "handle": handle }),
            )
            .await?;

        let product = data
            .product
            .ok_or_else(|| ShopifyError::NotFound(handle.to_string()))?;
        let facts = product.price_facts()?;

        self.inner
            .cache
            .insert(handle.to_string(), facts.clone())
            .await;

        Ok(facts)
    }
}
