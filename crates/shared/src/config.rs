//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
    /// KYC webhook configuration.
    pub kyc: KycConfig,
    /// Gold price feed configuration.
    #[serde(default)]
    pub pricing: PricingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Seconds to wait when establishing a connection.
    #[serde(default = "default_db_timeout")]
    pub connect_timeout_secs: u64,
    /// Seconds to wait when acquiring a connection from the pool.
    #[serde(default = "default_db_timeout")]
    pub acquire_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_db_timeout() -> u64 {
    10
}

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for signing session tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
    /// Refresh token expiration in seconds.
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    900 // 15 minutes
}

fn default_refresh_token_expiry() -> u64 {
    604_800 // 7 days
}

/// KYC webhook configuration.
///
/// The verification provider signs callback payloads with this shared
/// secret; unverifiable payloads are rejected at the API edge.
#[derive(Debug, Clone, Deserialize)]
pub struct KycConfig {
    /// Shared secret for verifying provider callbacks.
    pub webhook_secret: String,
}

/// Gold price feed configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PricingConfig {
    /// Spot price endpoint. When unset, the fixed development price is used.
    #[serde(default)]
    pub feed_url: Option<String>,
    /// Seconds to wait for a price feed response.
    #[serde(default = "default_feed_timeout")]
    pub request_timeout_secs: u64,
    /// Deterministic price per troy ounce used when no feed is configured.
    #[serde(default = "default_fixed_price")]
    pub fixed_price: Decimal,
}

fn default_feed_timeout() -> u64 {
    5
}

fn default_fixed_price() -> Decimal {
    Decimal::new(200_000, 2) // 2000.00 per troy ounce
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            feed_url: None,
            request_timeout_secs: default_feed_timeout(),
            fixed_price: default_fixed_price(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("AURUM").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                (
                    "AURUM__DATABASE__URL",
                    Some("postgres://localhost/aurum_test"),
                ),
                ("AURUM__JWT__SECRET", Some("test-secret")),
                ("AURUM__KYC__WEBHOOK_SECRET", Some("webhook-secret")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "postgres://localhost/aurum_test");
                assert_eq!(config.jwt.secret, "test-secret");
                assert_eq!(config.kyc.webhook_secret, "webhook-secret");

                // Defaults apply when not set
                assert_eq!(config.server.port, 8080);
                assert_eq!(config.database.max_connections, 10);
                assert_eq!(config.jwt.access_token_expiry_secs, 900);
                assert!(config.pricing.feed_url.is_none());
                assert_eq!(config.pricing.fixed_price, dec!(2000.00));
            },
        );
    }

    #[test]
    fn test_load_missing_required_fails() {
        temp_env::with_vars_unset(
            ["AURUM__DATABASE__URL", "AURUM__JWT__SECRET"],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }

    #[test]
    fn test_pricing_overrides() {
        temp_env::with_vars(
            [
                ("AURUM__DATABASE__URL", Some("postgres://localhost/aurum")),
                ("AURUM__JWT__SECRET", Some("s")),
                ("AURUM__KYC__WEBHOOK_SECRET", Some("w")),
                ("AURUM__PRICING__FEED_URL", Some("https://feed.example/spot")),
                ("AURUM__PRICING__REQUEST_TIMEOUT_SECS", Some("3")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(
                    config.pricing.feed_url.as_deref(),
                    Some("https://feed.example/spot")
                );
                assert_eq!(config.pricing.request_timeout_secs, 3);
            },
        );
    }
}
