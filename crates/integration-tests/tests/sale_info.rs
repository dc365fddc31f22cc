//! Integration tests for the product sale endpoint.
//!
//! These tests require:
//! - The storefront running (cargo run -p indecisive-wear-storefront)
//! - Valid Shopify Storefront credentials in environment
//! - `SALE_TEST_HANDLE` naming a product that exists in the store
//!
//! Run with: cargo test -p indecisive-wear-integration-tests -- --ignored

use indecisive_wear_integration_tests::storefront_base_url;
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
#[ignore = "Requires running storefront and Shopify credentials"]
async fn test_sale_info_for_known_product() {
    let handle = std::env::var("SALE_TEST_HANDLE").expect("SALE_TEST_HANDLE must be set");
    let resp = reqwest::get(format!(
        "{}/api/products/{handle}/sale?locale=bg",
        storefront_base_url()
    ))
    .await
    .expect("Failed to reach storefront");
    assert_eq!(resp.status(), StatusCode::OK);

    let json: Value = resp.json().await.expect("Response is not JSON");
    let on_sale = json["sale"]["is_on_sale"].as_bool().expect("is_on_sale");

    if on_sale {
        let percent = json["sale"]["discount_percentage"]
            .as_u64()
            .expect("discount_percentage when on sale");
        assert!(percent <= 100);
        assert_eq!(json["percentage_badge"], format!("-{percent}%"));
        assert!(json["badge"].as_str().is_some_and(|b| b.ends_with("лв")));
    } else {
        assert!(json["badge"].is_null());
        assert!(json["percentage_badge"].is_null());
    }
}

#[tokio::test]
#[ignore = "Requires running storefront and Shopify credentials"]
async fn test_sale_info_unknown_product_is_404() {
    let resp = reqwest::get(format!(
        "{}/api/products/this-handle-does-not-exist-42/sale",
        storefront_base_url()
    ))
    .await
    .expect("Failed to reach storefront");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
