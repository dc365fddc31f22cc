//! Indecisive Wear Core - Pricing and shipping domain library.
//!
//! This crate provides the domain logic shared by the storefront services:
//! - `storefront` - HTTP service (carrier-service callback, sale-info API)
//! - `integration-tests` - End-to-end checks against a running storefront
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Prices, currency codes, and delivery addresses
//! - [`sale`] - Sale detection from compare-at prices and discount tags

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod sale;
pub mod types;

pub use sale::{
    DEFAULT_SALE_DISCOUNT_PERCENT, DiscountRule, Locale, ProductPriceFacts, SaleInfo, SalePolicy,
    SalePolicyError, get_sale_info, sale_badge_text, sale_percentage_badge,
};
pub use types::*;
