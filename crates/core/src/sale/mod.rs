//! Sale detection for products.
//!
//! A product is on sale when exactly one of these holds, checked in order:
//!
//! 1. Its compare-at price is above the current price.
//! 2. A numeric discount tag applies (`sale-30`, `discount-25`, `was-49.99`).
//! 3. It carries a generic sale tag (`sale`, `discount`, `clearance`), in which
//!    case the policy's default discount is assumed.
//!
//! The first rule that matches decides the result. Rules never stack.

mod badge;
mod rule;

pub use badge::{Locale, sale_badge_text, sale_percentage_badge};
pub use rule::DiscountRule;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::types::CurrencyCode;
use crate::types::price::round_half_up;

/// Discount assumed for products tagged with a generic sale marker.
pub const DEFAULT_SALE_DISCOUNT_PERCENT: u8 = 20;

/// Pricing facts about a product, as needed to decide whether it is on sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPriceFacts {
    /// Price customers pay now.
    pub current_price: Decimal,
    /// Merchant-set "was" price shown crossed out.
    pub compare_at_price: Option<Decimal>,
    pub currency_code: CurrencyCode,
    /// Discount rules parsed from the product's tags, in tag order.
    pub rules: Vec<DiscountRule>,
}

impl ProductPriceFacts {
    /// Build price facts, parsing discount rules out of raw product tags.
    pub fn from_tags<I, S>(
        current_price: Decimal,
        compare_at_price: Option<Decimal>,
        currency_code: CurrencyCode,
        tags: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            current_price,
            compare_at_price,
            currency_code,
            rules: DiscountRule::from_tags(tags),
        }
    }
}

/// Derived sale status for a product.
///
/// `original_price`, `discount_percentage` and `savings` are only present when
/// the product is on sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleInfo {
    pub is_on_sale: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<u8>,
    pub current_price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub savings: Option<Decimal>,
}

impl SaleInfo {
    /// A product selling at full price.
    #[must_use]
    pub const fn full_price(current_price: Decimal) -> Self {
        Self {
            is_on_sale: false,
            original_price: None,
            discount_percentage: None,
            current_price,
            savings: None,
        }
    }

    /// Sale derived from a known original price. The percentage is rounded to
    /// the nearest integer; price and savings keep full precision.
    fn from_original(original_price: Decimal, current_price: Decimal) -> Self {
        let savings = original_price - current_price;
        let percentage = round_half_up(savings * Decimal::ONE_HUNDRED / original_price, 0);

        Self {
            is_on_sale: true,
            original_price: Some(original_price),
            discount_percentage: Some(percentage.to_u8().map_or(0, |p| p.min(100))),
            current_price,
            savings: Some(savings),
        }
    }

    /// Sale derived from a percentage, reconstructing the original price.
    fn from_percentage(percent: u8, current_price: Decimal) -> Self {
        let remaining = Decimal::from(100 - u32::from(percent.min(99)));
        let original_price = current_price * Decimal::ONE_HUNDRED / remaining;

        Self {
            is_on_sale: true,
            original_price: Some(original_price),
            discount_percentage: Some(percent),
            current_price,
            savings: Some(original_price - current_price),
        }
    }
}

/// Errors building a [`SalePolicy`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SalePolicyError {
    #[error("default discount must be between 1 and 99 percent, got {0}")]
    InvalidDefaultDiscount(u8),
}

/// Store-wide sale settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalePolicy {
    default_discount_percent: u8,
}

impl Default for SalePolicy {
    fn default() -> Self {
        Self {
            default_discount_percent: DEFAULT_SALE_DISCOUNT_PERCENT,
        }
    }
}

impl SalePolicy {
    /// Create a policy with a custom default discount for generic sale tags.
    ///
    /// # Errors
    ///
    /// Returns `SalePolicyError::InvalidDefaultDiscount` unless the percentage
    /// is between 1 and 99.
    pub const fn new(default_discount_percent: u8) -> Result<Self, SalePolicyError> {
        if default_discount_percent == 0 || default_discount_percent > 99 {
            return Err(SalePolicyError::InvalidDefaultDiscount(
                default_discount_percent,
            ));
        }
        Ok(Self {
            default_discount_percent,
        })
    }

    /// Discount assumed for generic sale tags.
    #[must_use]
    pub const fn default_discount_percent(&self) -> u8 {
        self.default_discount_percent
    }

    /// Decide whether a product is on sale and by how much.
    #[must_use]
    pub fn resolve(&self, product: &ProductPriceFacts) -> SaleInfo {
        let current = product.current_price;

        if let Some(compare_at) = product.compare_at_price
            && compare_at > current
            && compare_at > Decimal::ZERO
        {
            return SaleInfo::from_original(compare_at, current);
        }

        let numeric = product.rules.iter().find_map(|rule| match *rule {
            DiscountRule::Percentage(percent) => Some(SaleInfo::from_percentage(percent, current)),
            DiscountRule::FixedOriginal(original) if original > current => {
                Some(SaleInfo::from_original(original, current))
            }
            DiscountRule::FixedOriginal(_) | DiscountRule::FlatDefault => None,
        });
        if let Some(info) = numeric {
            return info;
        }

        if product.rules.contains(&DiscountRule::FlatDefault) {
            return SaleInfo::from_percentage(self.default_discount_percent, current);
        }

        SaleInfo::full_price(current)
    }
}

/// Decide whether a product is on sale using the default [`SalePolicy`].
#[must_use]
pub fn get_sale_info(product: &ProductPriceFacts) -> SaleInfo {
    SalePolicy::default().resolve(product)
}
