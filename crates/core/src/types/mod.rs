//! Core types for Indecisive Wear.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod address;
pub mod price;

pub use address::DeliveryAddress;
pub use price::{CurrencyCode, CurrencyError, Price};
