//! Delivery address used for both shipment origin and destination.

use serde::{Deserialize, Serialize};

/// A postal address a parcel is sent from or delivered to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryAddress {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address1: String,
    pub address2: Option<String>,
    pub city: String,
    /// Province or region.
    pub province: Option<String>,
    pub postal_code: String,
    /// Country display name (e.g., "Bulgaria").
    pub country: String,
    /// ISO 3166-1 alpha-2 code (e.g., "BG").
    pub country_code: String,
    pub company: Option<String>,
}

impl DeliveryAddress {
    /// Whether the address is in the given country (ISO alpha-2, case-insensitive).
    #[must_use]
    pub fn is_in_country(&self, country_code: &str) -> bool {
        self.country_code.trim().eq_ignore_ascii_case(country_code.trim())
    }

    /// Street lines joined with a comma, skipping an empty second line.
    #[must_use]
    pub fn street(&self) -> String {
        match self.address2.as_deref().map(str::trim) {
            Some(line2) if !line2.is_empty() => format!("{}, {line2}", self.address1),
            _ => self.address1.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sofia() -> DeliveryAddress {
        DeliveryAddress {
            name: "Maria Ivanova".to_string(),
            phone: "+359888123456".to_string(),
            email: "maria@example.bg".to_string(),
            address1: "bul. Vitosha 15".to_string(),
            address2: None,
            city: "Sofia".to_string(),
            province: Some("Sofia City".to_string()),
            postal_code: "1000".to_string(),
            country: "Bulgaria".to_string(),
            country_code: "BG".to_string(),
            company: None,
        }
    }

    #[test]
    fn test_is_in_country_ignores_case() {
        let address = sofia();
        assert!(address.is_in_country("bg"));
        assert!(address.is_in_country("BG"));
        assert!(!address.is_in_country("RO"));
    }

    #[test]
    fn test_street_joins_lines() {
        let mut address = sofia();
        assert_eq!(address.street(), "bul. Vitosha 15");

        address.address2 = Some("ap. 4".to_string());
        assert_eq!(address.street(), "bul. Vitosha 15, ap. 4");

        address.address2 = Some("  ".to_string());
        assert_eq!(address.street(), "bul. Vitosha 15");
    }
}
