//! Short price labels for sale badges on product cards.

use std::convert::Infallible;
use std::str::FromStr;

use super::{ProductPriceFacts, SalePolicy};
use crate::types::Price;

/// Storefront locale, as far as badge formatting cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    /// `bg`, `bg-BG`
    #[default]
    Bulgarian,
    /// `en`, `en-GB`, `en-US` (the English storefront prices in pounds)
    English,
    /// Anything else; falls back to the ISO currency code.
    Other,
}

impl FromStr for Locale {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let language = s
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        Ok(match language.as_str() {
            "bg" => Self::Bulgarian,
            "en" => Self::English,
            _ => Self::Other,
        })
    }
}

impl SalePolicy {
    /// Current price as a short badge label, or `None` when not on sale.
    #[must_use]
    pub fn badge_text(&self, product: &ProductPriceFacts, locale: Locale) -> Option<String> {
        if !self.resolve(product).is_on_sale {
            return None;
        }

        let price = Price::new(product.current_price, product.currency_code);
        let amount = price.whole_units().normalize();

        Some(match locale {
            Locale::Bulgarian => format!("{amount}лв"),
            Locale::English => format!("£{amount}"),
            Locale::Other => format!("{amount} {}", price.currency_code),
        })
    }

    /// Discount as `-N%`, or `None` when not on sale.
    #[must_use]
    pub fn percentage_badge(&self, product: &ProductPriceFacts) -> Option<String> {
        self.resolve(product)
            .discount_percentage
            .map(|percent| format!("-{percent}%"))
    }
}

/// Current price as a sale badge label using the default policy.
#[must_use]
pub fn sale_badge_text(product: &ProductPriceFacts, locale: Locale) -> Option<String> {
    SalePolicy::default().badge_text(product, locale)
}

/// Discount percentage badge (`-20%`) using the default policy.
#[must_use]
pub fn sale_percentage_badge(product: &ProductPriceFacts) -> Option<String> {
    SalePolicy::default().percentage_badge(product)
}
