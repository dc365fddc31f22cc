//! Indecisive Wear storefront services library.
//!
//! Courier rate aggregation, the Shopify carrier-service callback and the
//! product sale-info API, exposed as a library so they can be tested and
//! reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod delivery;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod shopify;
pub mod state;
