//! Typed discount rules parsed from product tags.
//!
//! Merchandisers mark products on sale by tagging them in Shopify admin.
//! Tags are parsed once, when product data enters the system, so the
//! resolver only ever sees validated rules.
//!
//! | Tag | Rule |
//! |---|---|
//! | `sale-30`, `discount-25` | [`DiscountRule::Percentage`] |
//! | `was-49.99` | [`DiscountRule::FixedOriginal`] |
//! | `sale`, `discount`, `clearance` | [`DiscountRule::FlatDefault`] |

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A discount rule attached to a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DiscountRule {
    /// Percentage off the original price (1-99).
    Percentage(u8),
    /// The original price the product used to sell for.
    FixedOriginal(Decimal),
    /// Generic sale marker; the store's default discount applies.
    FlatDefault,
}

impl DiscountRule {
    /// Parse a single product tag. Returns `None` for tags that are not
    /// discount rules, including malformed ones like `sale-abc` or `was-1.999`.
    #[must_use]
    pub fn parse_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim().to_lowercase();

        if matches!(tag.as_str(), "sale" | "discount" | "clearance") {
            return Some(Self::FlatDefault);
        }

        if let Some(percent) = tag
            .strip_prefix("sale-")
            .or_else(|| tag.strip_prefix("discount-"))
        {
            return parse_percentage(percent).map(Self::Percentage);
        }

        tag.strip_prefix("was-")
            .and_then(parse_amount)
            .map(Self::FixedOriginal)
    }

    /// Parse every tag, keeping tag order and dropping non-rules.
    pub fn from_tags<I, S>(tags: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        tags.into_iter()
            .filter_map(|tag| Self::parse_tag(tag.as_ref()))
            .collect()
    }
}

/// `0` and `100` are rejected: neither describes a real markdown, and `100`
/// would make the original price undefined.
fn parse_percentage(s: &str) -> Option<u8> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<u8>().ok().filter(|n| (1..=99).contains(n))
}

/// Plain decimal with at most two fractional digits (`49`, `49.9`, `49.99`).
fn parse_amount(s: &str) -> Option<Decimal> {
    let (whole, fraction) = s.split_once('.').unwrap_or((s, ""));
    let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());

    if whole.is_empty() || !digits(whole) || !digits(fraction) || fraction.len() > 2 {
        return None;
    }
    if s.ends_with('.') {
        return None;
    }
    Decimal::from_str(s).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_percentage_tags() {
        assert_eq!(
            DiscountRule::parse_tag("sale-30"),
            Some(DiscountRule::Percentage(30))
        );
        assert_eq!(
            DiscountRule::parse_tag("Discount-25"),
            Some(DiscountRule::Percentage(25))
        );
        assert_eq!(
            DiscountRule::parse_tag("  SALE-5 "),
            Some(DiscountRule::Percentage(5))
        );
    }

    #[test]
    fn test_parse_percentage_rejects_out_of_range() {
        assert_eq!(DiscountRule::parse_tag("sale-0"), None);
        assert_eq!(DiscountRule::parse_tag("sale-100"), None);
        assert_eq!(DiscountRule::parse_tag("sale-300"), None);
        assert_eq!(DiscountRule::parse_tag("sale--5"), None);
        assert_eq!(DiscountRule::parse_tag("sale-abc"), None);
        assert_eq!(DiscountRule::parse_tag("sale-"), None);
    }

    #[test]
    fn test_parse_was_tags() {
        assert_eq!(
            DiscountRule::parse_tag("was-49.99"),
            Some(DiscountRule::FixedOriginal(Decimal::new(4999, 2)))
        );
        assert_eq!(
            DiscountRule::parse_tag("WAS-60"),
            Some(DiscountRule::FixedOriginal(Decimal::new(60, 0)))
        );
        assert_eq!(
            DiscountRule::parse_tag("was-12.5"),
            Some(DiscountRule::FixedOriginal(Decimal::new(125, 1)))
        );
    }

    #[test]
    fn test_parse_was_rejects_malformed_amounts() {
        assert_eq!(DiscountRule::parse_tag("was-1.999"), None);
        assert_eq!(DiscountRule::parse_tag("was-.99"), None);
        assert_eq!(DiscountRule::parse_tag("was-10."), None);
        assert_eq!(DiscountRule::parse_tag("was-ten"), None);
        assert_eq!(DiscountRule::parse_tag("was-1,50"), None);
    }

    #[test]
    fn test_parse_generic_tags() {
        for tag in ["sale", "Discount", "CLEARANCE"] {
            assert_eq!(DiscountRule::parse_tag(tag), Some(DiscountRule::FlatDefault));
        }
        // Only exact matches count
        assert_eq!(DiscountRule::parse_tag("on-sale"), None);
        assert_eq!(DiscountRule::parse_tag("salehoodie"), None);
    }

    #[test]
    fn test_from_tags_keeps_order() {
        let rules = DiscountRule::from_tags(["new", "sale", "was-80", "sale-10", "summer"]);
        assert_eq!(
            rules,
            vec![
                DiscountRule::FlatDefault,
                DiscountRule::FixedOriginal(Decimal::new(80, 0)),
                DiscountRule::Percentage(10),
            ]
        );
    }
}
