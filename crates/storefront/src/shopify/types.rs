//! Domain types for Shopify Storefront API responses.
//!
//! Only the product fields that feed sale detection are modelled.

use std::str::FromStr;

use indecisive_wear_core::{CurrencyCode, ProductPriceFacts};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ShopifyError;

// =============================================================================
// Money Types
// =============================================================================

/// Monetary amount with currency code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    /// Decimal amount as string (preserves precision).
    pub amount: String,
    /// ISO 4217 currency code.
    pub currency_code: String,
}

impl Money {
    /// Parse the amount.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::InvalidData` if the amount is not a decimal.
    pub fn decimal(&self) -> Result<Decimal, ShopifyError> {
        Decimal::from_str(self.amount.trim())
            .map_err(|e| ShopifyError::InvalidData(format!("amount '{}': {e}", self.amount)))
    }

    /// Parse the currency code.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::InvalidData` for currencies the store does not use.
    pub fn currency(&self) -> Result<CurrencyCode, ShopifyError> {
        self.currency_code
            .parse()
            .map_err(|e: indecisive_wear_core::CurrencyError| {
                ShopifyError::InvalidData(e.to_string())
            })
    }
}

/// Price range for a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    /// Minimum price among all variants.
    pub min_variant_price: Money,
    /// Maximum price among all variants.
    pub max_variant_price: Money,
}

// =============================================================================
// Product Types
// =============================================================================

/// Pricing-relevant product fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPricing {
    /// URL handle.
    pub handle: String,
    /// Merchant tags (may encode discount rules).
    #[serde(default)]
    pub tags: Vec<String>,
    /// Selling price range.
    pub price_range: PriceRange,
    /// Compare-at price range (zero when no variant has one).
    pub compare_at_price_range: Option<PriceRange>,
}

impl ProductPricing {
    /// Convert into the facts sale detection works on.
    ///
    /// The current price is the cheapest variant; the compare-at price is the
    /// highest compare-at across variants. A zero compare-at means "none".
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::InvalidData` for unparseable amounts or
    /// unsupported currencies.
    pub fn price_facts(&self) -> Result<ProductPriceFacts, ShopifyError> {
        let current = &self.price_range.min_variant_price;

        let compare_at = self
            .compare_at_price_range
            .as_ref()
            .map(|range| range.max_variant_price.decimal())
            .transpose()?
            .filter(|amount| *amount > Decimal::ZERO);

        Ok(ProductPriceFacts::from_tags(
            current.decimal()?,
            compare_at,
            current.currency()?,
            &self.tags,
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use indecisive_wear_core::DiscountRule;

    use super::*;

    fn money(amount: &str) -> Money {
        Money {
            amount: amount.to_string(),
            currency_code: "BGN".to_string(),
        }
    }

    fn range(min: &str, max: &str) -> PriceRange {
        PriceRange {
            min_variant_price: money(min),
            max_variant_price: money(max),
        }
    }

    #[test]
    fn test_deserialize_storefront_product() {
        let json = serde_json::json!({
            "handle": "indecisive-tee",
            "tags": ["Summer", "sale-30"],
            "priceRange": {
                "minVariantPrice": {"amount": "35.0", "currencyCode": "BGN"},
                "maxVariantPrice": {"amount": "39.0", "currencyCode": "BGN"}
            },
            "compareAtPriceRange": {
                "minVariantPrice": {"amount": "0.0", "currencyCode": "BGN"},
                "maxVariantPrice": {"amount": "0.0", "currencyCode": "BGN"}
            }
        });

        let product: ProductPricing = serde_json::from_value(json).unwrap();
        let facts = product.price_facts().unwrap();

        assert_eq!(facts.current_price, Decimal::new(35, 0));
        assert_eq!(facts.compare_at_price, None);
        assert_eq!(facts.currency_code, CurrencyCode::BGN);
        assert_eq!(facts.rules, vec![DiscountRule::Percentage(30)]);
    }

    #[test]
    fn test_price_facts_uses_max_compare_at() {
        let product = ProductPricing {
            handle: "cargo-pants".to_string(),
            tags: vec![],
            price_range: range("80.00", "90.00"),
            compare_at_price_range: Some(range("95.00", "100.00")),
        };

        let facts = product.price_facts().unwrap();
        assert_eq!(facts.current_price, Decimal::new(80, 0));
        assert_eq!(facts.compare_at_price, Some(Decimal::new(100, 0)));
    }

    #[test]
    fn test_price_facts_rejects_bad_amount() {
        let product = ProductPricing {
            handle: "broken".to_string(),
            tags: vec![],
            price_range: range("N/A", "N/A"),
            compare_at_price_range: None,
        };

        assert!(matches!(
            product.price_facts(),
            Err(ShopifyError::InvalidData(_))
        ));
    }

    #[test]
    fn test_money_currency() {
        assert_eq!(money("1").currency().unwrap(), CurrencyCode::BGN);

        let yen = Money {
            amount: "100".to_string(),
            currency_code: "JPY".to_string(),
        };
        assert!(matches!(yen.currency(), Err(ShopifyError::InvalidData(_))));
    }
}
