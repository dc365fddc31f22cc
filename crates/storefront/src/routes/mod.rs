//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Health check
//!
//! # Carrier service (not rate limited, every callback comes from Shopify)
//! POST /api/shipping/rates              - Shopify carrier-service callback
//!
//! # API (rate limited)
//! GET  /api/products/{handle}/sale      - Sale status and badges
//! ```

pub mod products;
pub mod shipping;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::api_rate_limiter;
use crate::state::AppState;

/// Create the carrier-service router.
///
/// Not rate limited: Shopify sends every checkout's callback from a small
/// pool of addresses.
pub fn carrier_routes() -> Router<AppState> {
    Router::new().route("/shipping/rates", post(shipping::rates))
}

/// Create the public JSON API router.
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/products/{handle}/sale", get(products::sale))
}

/// Health check endpoint.
pub async fn health() -> &'static str {
    "ok"
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest(
            "/api",
            carrier_routes().merge(api_routes().layer(api_rate_limiter())),
        )
}
