//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPIFY_STORE` - Shopify store domain (e.g., indecisive-wear.myshopify.com)
//! - `SHOPIFY_STOREFRONT_PRIVATE_TOKEN` - Storefront API private access token
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `SHOPIFY_API_VERSION` - API version (default: 2026-01)
//! - `SHOPIFY_CARRIER_SECRET` - App secret used to sign carrier-service callbacks
//! - `SALE_DEFAULT_DISCOUNT_PERCENT` - Discount assumed for generic sale tags (default: 20)
//! - `DELIVERY_SUPPORTED_COUNTRIES` - Comma-separated ISO codes (default: BG)
//! - `DELIVERY_MIN_WEIGHT_KG` - Billable weight floor (default: 0.1)
//! - `DELIVERY_OFFICE_DISCOUNT_PERCENT` - Office pickup discount (default: 20)
//! - `CARRIER_TIMEOUT_SECS` - Per-request carrier timeout (default: 15)
//! - `ECONT_USERNAME` / `ECONT_PASSWORD` / `ECONT_BASE_URL` / `ECONT_TRANSIT_DAYS`
//! - `SPEEDY_USERNAME` / `SPEEDY_PASSWORD` / `SPEEDY_BASE_URL`
//! - `SHIP_FROM_NAME`, `SHIP_FROM_PHONE`, `SHIP_FROM_EMAIL`, `SHIP_FROM_ADDRESS`,
//!   `SHIP_FROM_CITY`, `SHIP_FROM_POSTCODE`, `SHIP_FROM_COUNTRY`, `SHIP_FROM_COUNTRY_CODE`
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//!
//! A carrier is enabled only when its username is set.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use indecisive_wear_core::{DeliveryAddress, SalePolicy};
use rust_decimal::Decimal;
use secrecy::SecretString;
use thiserror::Error;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

const DEFAULT_ECONT_BASE_URL: &str = "https://ee.econt.com/services";
const DEFAULT_SPEEDY_BASE_URL: &str = "https://api.speedy.bg/v1";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Shopify Storefront API configuration
    pub shopify: ShopifyStorefrontConfig,
    /// Carrier and shipping-rate configuration
    pub delivery: DeliveryConfig,
    /// Sale detection settings
    pub sale_policy: SalePolicy,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., production, staging)
    pub sentry_environment: Option<String>,
}

/// Shopify Storefront API configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct ShopifyStorefrontConfig {
    /// Shopify store domain (e.g., indecisive-wear.myshopify.com)
    pub store: String,
    /// Shopify API version (e.g., 2026-01)
    pub api_version: String,
    /// Storefront API private access token (server-side only)
    pub storefront_private_token: SecretString,
    /// App secret for verifying carrier-service callback signatures
    pub carrier_secret: Option<SecretString>,
}

impl std::fmt::Debug for ShopifyStorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyStorefrontConfig")
            .field("store", &self.store)
            .field("api_version", &self.api_version)
            .field("storefront_private_token", &"[REDACTED]")
            .field(
                "carrier_secret",
                &self.carrier_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Shipping-rate aggregation settings.
#[derive(Debug, Clone)]
pub struct DeliveryConfig {
    /// Destination countries we quote for (ISO alpha-2, upper case)
    pub supported_countries: Vec<String>,
    /// Minimum billable weight in kilograms
    pub min_weight_kg: Decimal,
    /// Discount applied to office pickup relative to home delivery
    pub office_discount_percent: u8,
    /// Per-request carrier timeout in seconds
    pub timeout_secs: u64,
    /// Warehouse address parcels ship from
    pub origin: DeliveryAddress,
    /// Econt Express credentials (disabled when `None`)
    pub econt: Option<CarrierCredentials>,
    /// Speedy credentials (disabled when `None`)
    pub speedy: Option<CarrierCredentials>,
}

/// Credentials and endpoint for one carrier API.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct CarrierCredentials {
    pub base_url: String,
    pub username: String,
    pub password: SecretString,
    /// Transit estimate used when the carrier does not report one
    pub transit_days: u32,
}

impl std::fmt::Debug for CarrierCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CarrierCredentials")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("transit_days", &self.transit_days)
            .finish()
    }
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            supported_countries: vec!["BG".to_string()],
            min_weight_kg: Decimal::new(1, 1),
            office_discount_percent: 20,
            timeout_secs: 15,
            origin: default_origin(),
            econt: None,
            speedy: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env_or_default::<IpAddr>("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env_or_default::<u16>("STOREFRONT_PORT", "3000")?;

        let shopify = ShopifyStorefrontConfig::from_env()?;
        let delivery = DeliveryConfig::from_env()?;

        let default_discount = parse_env_or_default::<u8>("SALE_DEFAULT_DISCOUNT_PERCENT", "20")?;
        let sale_policy = SalePolicy::new(default_discount).map_err(|e| {
            ConfigError::InvalidEnvVar("SALE_DEFAULT_DISCOUNT_PERCENT".to_string(), e.to_string())
        })?;

        Ok(Self {
            host,
            port,
            shopify,
            delivery,
            sale_policy,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl ShopifyStorefrontConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let carrier_secret = get_optional_env("SHOPIFY_CARRIER_SECRET")
            .map(|value| {
                validate_secret_strength(&value, "SHOPIFY_CARRIER_SECRET")?;
                Ok::<_, ConfigError>(SecretString::from(value))
            })
            .transpose()?;

        Ok(Self {
            store: get_required_env("SHOPIFY_STORE")?,
            api_version: get_env_or_default("SHOPIFY_API_VERSION", "2026-01"),
            storefront_private_token: get_validated_secret("SHOPIFY_STOREFRONT_PRIVATE_TOKEN")?,
            carrier_secret,
        })
    }
}

impl DeliveryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let supported_countries =
            parse_country_list(&get_env_or_default("DELIVERY_SUPPORTED_COUNTRIES", "BG"));
        if supported_countries.is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "DELIVERY_SUPPORTED_COUNTRIES".to_string(),
                "at least one country code is required".to_string(),
            ));
        }

        let min_weight_kg = parse_env_or_default::<Decimal>("DELIVERY_MIN_WEIGHT_KG", "0.1")?;
        if min_weight_kg <= Decimal::ZERO {
            return Err(ConfigError::InvalidEnvVar(
                "DELIVERY_MIN_WEIGHT_KG".to_string(),
                "must be positive".to_string(),
            ));
        }

        let office_discount_percent =
            parse_env_or_default::<u8>("DELIVERY_OFFICE_DISCOUNT_PERCENT", "20")?;
        if office_discount_percent >= 100 {
            return Err(ConfigError::InvalidEnvVar(
                "DELIVERY_OFFICE_DISCOUNT_PERCENT".to_string(),
                "must be below 100".to_string(),
            ));
        }

        let econt = carrier_from_env("ECONT", DEFAULT_ECONT_BASE_URL, "2")?;
        let speedy = carrier_from_env("SPEEDY", DEFAULT_SPEEDY_BASE_URL, "1")?;

        Ok(Self {
            supported_countries,
            min_weight_kg,
            office_discount_percent,
            timeout_secs: validate_timeout(parse_env_or_default::<u64>(
                "CARRIER_TIMEOUT_SECS",
                "15",
            )?)?,
            origin: origin_from(|key| std::env::var(key).ok()),
            econt,
            speedy,
        })
    }
}

/// Load a carrier's credentials; `None` when `{PREFIX}_USERNAME` is unset.
fn carrier_from_env(
    prefix: &str,
    default_base_url: &str,
    default_transit_days: &str,
) -> Result<Option<CarrierCredentials>, ConfigError> {
    let Some(username) = get_optional_env(&format!("{prefix}_USERNAME")) else {
        return Ok(None);
    };

    let base_url_key = format!("{prefix}_BASE_URL");
    let base_url = get_env_or_default(&base_url_key, default_base_url);
    validate_base_url(&base_url, &base_url_key)?;

    Ok(Some(CarrierCredentials {
        base_url,
        username,
        password: get_required_secret(&format!("{prefix}_PASSWORD"))?,
        transit_days: parse_env_or_default::<u32>(
            &format!("{prefix}_TRANSIT_DAYS"),
            default_transit_days,
        )?,
    }))
}

/// Carrier endpoints must be absolute http(s) URLs.
fn validate_base_url(value: &str, var_name: &str) -> Result<(), ConfigError> {
    let url = url::Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(())
}

/// A zero timeout would fail every courier request before it is sent.
fn validate_timeout(secs: u64) -> Result<u64, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::InvalidEnvVar(
            "CARRIER_TIMEOUT_SECS".to_string(),
            "must be positive".to_string(),
        ));
    }
    Ok(secs)
}

/// Build the sender address from `SHIP_FROM_*` values found by `lookup`.
///
/// The sender name is also the company name on courier labels.
fn origin_from(lookup: impl Fn(&str) -> Option<String>) -> DeliveryAddress {
    let defaults = default_origin();
    let value = |key: &str, default: String| lookup(key).unwrap_or(default);

    let name = value("SHIP_FROM_NAME", defaults.name);
    DeliveryAddress {
        phone: value("SHIP_FROM_PHONE", defaults.phone),
        email: value("SHIP_FROM_EMAIL", defaults.email),
        address1: value("SHIP_FROM_ADDRESS", defaults.address1),
        address2: None,
        city: value("SHIP_FROM_CITY", defaults.city),
        province: defaults.province,
        postal_code: value("SHIP_FROM_POSTCODE", defaults.postal_code),
        country: value("SHIP_FROM_COUNTRY", defaults.country),
        country_code: value("SHIP_FROM_COUNTRY_CODE", defaults.country_code),
        company: Some(name.clone()),
        name,
    }
}

fn default_origin() -> DeliveryAddress {
    DeliveryAddress {
        name: "Indecisive Wear".to_string(),
        phone: "+359888000000".to_string(),
        email: "orders@indecisive-wear.com".to_string(),
        address1: "ul. Tsar Simeon 1".to_string(),
        address2: None,
        city: "Sofia".to_string(),
        province: Some("Sofia City".to_string()),
        postal_code: "1000".to_string(),
        country: "Bulgaria".to_string(),
        country_code: "BG".to_string(),
        company: Some("Indecisive Wear".to_string()),
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Split `"bg, RO ,"` into `["BG", "RO"]`.
fn parse_country_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_ascii_uppercase)
        .collect()
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Real API tokens are random
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        // "ab" has entropy of 1 bit per char (50% a, 50% b)
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-carrier-secret", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_base_url() {
        assert!(validate_base_url("https://ee.econt.com/services", "ECONT_BASE_URL").is_ok());
        assert!(validate_base_url("http://127.0.0.1:8080", "SPEEDY_BASE_URL").is_ok());
        assert!(validate_base_url("ftp://api.speedy.bg", "SPEEDY_BASE_URL").is_err());
        assert!(validate_base_url("not a url", "ECONT_BASE_URL").is_err());
    }

    #[test]
    fn test_validate_timeout() {
        assert_eq!(validate_timeout(15).unwrap(), 15);
        assert!(matches!(
            validate_timeout(0),
            Err(ConfigError::InvalidEnvVar(ref key, _)) if key == "CARRIER_TIMEOUT_SECS"
        ));
    }

    #[test]
    fn test_origin_defaults() {
        assert_eq!(origin_from(|_| None), default_origin());
    }

    #[test]
    fn test_origin_name_is_company() {
        let origin = origin_from(|key| match key {
            "SHIP_FROM_NAME" => Some("Nerešitelni OOD".to_string()),
            "SHIP_FROM_CITY" => Some("Varna".to_string()),
            _ => None,
        });

        assert_eq!(origin.name, "Nerešitelni OOD");
        assert_eq!(origin.company.as_deref(), Some("Nerešitelni OOD"));
        assert_eq!(origin.city, "Varna");
        assert_eq!(origin.postal_code, "1000");
    }

    #[test]
    fn test_parse_country_list() {
        assert_eq!(parse_country_list("bg, RO ,"), vec!["BG", "RO"]);
        assert!(parse_country_list(" , ").is_empty());
    }

    #[test]
    fn test_delivery_defaults() {
        let config = DeliveryConfig::default();
        assert_eq!(config.supported_countries, vec!["BG"]);
        assert_eq!(config.min_weight_kg, Decimal::new(1, 1));
        assert_eq!(config.office_discount_percent, 20);
        assert!(config.econt.is_none());
        assert!(config.speedy.is_none());
    }

    #[test]
    fn test_carrier_credentials_debug_redacts_password() {
        let credentials = CarrierCredentials {
            base_url: "https://api.speedy.bg/v1".to_string(),
            username: "speedy_user".to_string(),
            password: SecretString::from("hunter2-but-longer"),
            transit_days: 1,
        };

        let debug_output = format!("{credentials:?}");
        assert!(debug_output.contains("speedy_user"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("hunter2-but-longer"));
    }

    #[test]
    fn test_shopify_config_debug_redacts_secrets() {
        let config = ShopifyStorefrontConfig {
            store: "indecisive-wear.myshopify.com".to_string(),
            api_version: "2026-01".to_string(),
            storefront_private_token: SecretString::from("super_secret_private_token"),
            carrier_secret: Some(SecretString::from("super_secret_carrier_secret")),
        };

        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("indecisive-wear.myshopify.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_private_token"));
        assert!(!debug_output.contains("super_secret_carrier_secret"));
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            shopify: ShopifyStorefrontConfig {
                store: "test.myshopify.com".to_string(),
                api_version: "2026-01".to_string(),
                storefront_private_token: SecretString::from("private"),
                carrier_secret: None,
            },
            delivery: DeliveryConfig::default(),
            sale_policy: SalePolicy::default(),
            sentry_dsn: None,
            sentry_environment: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }
}
