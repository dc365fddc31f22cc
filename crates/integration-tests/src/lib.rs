//! Integration tests for Indecisive Wear storefront services.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the storefront with real courier credentials
//! cargo run -p indecisive-wear-storefront
//!
//! # Run the ignored integration tests against it
//! cargo test -p indecisive-wear-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `shipping_rates` - Carrier-service callback against live couriers
//! - `sale_info` - Sale endpoint against the live Shopify store

/// Base URL for the storefront (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Build a Shopify carrier-service payload for one cart line.
#[must_use]
pub fn rate_request(country: &str, city: &str, postal_code: &str, grams: u32) -> serde_json::Value {
    serde_json::json!({
        "rate": {
            "origin": {
                "country": "BG",
                "postal_code": "1000",
                "city": "Sofia",
                "address1": "bul. Vitosha 1",
                "company_name": "Indecisive Wear"
            },
            "destination": {
                "country": country,
                "postal_code": postal_code,
                "city": city,
                "name": "Integration Test",
                "address1": "ul. Test 1",
                "phone": "+359888000000"
            },
            "items": [
                { "name": "Tee", "sku": "IT-TEE", "quantity": 1, "grams": grams, "price": 3500 }
            ],
            "currency": "BGN",
            "locale": "bg"
        }
    })
}
