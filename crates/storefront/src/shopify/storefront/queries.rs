//! GraphQL documents for the Shopify Storefront API.

/// Pricing fields for one product, looked up by handle.
pub const PRODUCT_PRICING: &str = r"
query ProductPricing($handle: String!) {
  product(handle: $handle) {
    handle
    tags
    priceRange {
      minVariantPrice { amount currencyCode }
      maxVariantPrice { amount currencyCode }
    }
    compareAtPriceRange {
      minVariantPrice { amount currencyCode }
      maxVariantPrice { amount currencyCode }
    }
  }
}
";
