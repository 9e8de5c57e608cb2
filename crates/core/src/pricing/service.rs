//! Price sources for the gold spot price.
//!
//! The transaction engine treats pricing as an untrusted, volatile external
//! input: every trade re-fetches the price exactly once and pins it into the
//! transaction record. Nothing here caches or assumes monotonicity.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use super::error::PricingError;

/// The asset a price quote refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// Gold, priced in cash units per troy ounce.
    Gold,
}

/// A spot price quote at a point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuote {
    /// The asset quoted.
    pub asset: AssetKind,
    /// Price in cash units per unit of asset. Always positive.
    pub price: Decimal,
    /// When the quote was obtained.
    pub as_of: DateTime<Utc>,
}

/// A source of spot prices.
#[async_trait::async_trait]
pub trait PriceSource: Send + Sync {
    /// Returns the current spot price for the asset.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::Unavailable` if no usable quote can be
    /// produced right now.
    async fn spot_price(&self, asset: AssetKind) -> Result<PriceQuote, PricingError>;
}

/// A deterministic price source for development, seeding, and tests.
#[derive(Debug, Clone)]
pub struct FixedPriceFeed {
    price: Decimal,
}

impl FixedPriceFeed {
    /// Creates a feed that always quotes the given price.
    #[must_use]
    pub const fn new(price: Decimal) -> Self {
        Self { price }
    }
}

#[async_trait::async_trait]
impl PriceSource for FixedPriceFeed {
    async fn spot_price(&self, asset: AssetKind) -> Result<PriceQuote, PricingError> {
        if self.price <= Decimal::ZERO {
            return Err(PricingError::Unavailable(format!(
                "fixed price is not positive: {}",
                self.price
            )));
        }

        Ok(PriceQuote {
            asset,
            price: self.price,
            as_of: Utc::now(),
        })
    }
}

/// Response shape of the upstream spot price endpoint.
#[derive(Debug, Deserialize)]
struct SpotPriceResponse {
    price: Decimal,
}

/// A price source backed by an HTTP spot price endpoint.
///
/// Expects a JSON body of the form `{ "price": "2412.37" }`. Any transport
/// failure, timeout, non-success status, or unusable price maps to
/// [`PricingError::Unavailable`].
#[derive(Debug, Clone)]
pub struct HttpPriceFeed {
    client: reqwest::Client,
    url: String,
}

impl HttpPriceFeed {
    /// Creates a feed that fetches quotes from the given URL with a
    /// bounded per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::Unavailable` if the HTTP client cannot be
    /// constructed.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, PricingError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| PricingError::Unavailable(err.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait::async_trait]
impl PriceSource for HttpPriceFeed {
    async fn spot_price(&self, asset: AssetKind) -> Result<PriceQuote, PricingError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|err| PricingError::Unavailable(err.to_string()))?;

        if !response.status().is_success() {
            return Err(PricingError::Unavailable(format!(
                "spot price endpoint returned {}",
                response.status()
            )));
        }

        let body: SpotPriceResponse = response
            .json()
            .await
            .map_err(|err| PricingError::Unavailable(err.to_string()))?;

        if body.price <= Decimal::ZERO {
            return Err(PricingError::Unavailable(format!(
                "spot price endpoint returned a non-positive price: {}",
                body.price
            )));
        }

        Ok(PriceQuote {
            asset,
            price: body.price,
            as_of: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_fixed_feed_quotes_configured_price() {
        let feed = FixedPriceFeed::new(dec!(2000.00));

        let quote = feed.spot_price(AssetKind::Gold).await.unwrap();

        assert_eq!(quote.asset, AssetKind::Gold);
        assert_eq!(quote.price, dec!(2000.00));
    }

    #[tokio::test]
    async fn test_fixed_feed_rejects_non_positive_price() {
        let feed = FixedPriceFeed::new(Decimal::ZERO);

        let result = feed.spot_price(AssetKind::Gold).await;

        assert!(matches!(result, Err(PricingError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_http_feed_unreachable_host_is_unavailable() {
        let feed =
            HttpPriceFeed::new("http://127.0.0.1:9/spot", Duration::from_millis(250)).unwrap();

        let result = feed.spot_price(AssetKind::Gold).await;

        assert!(matches!(result, Err(PricingError::Unavailable(_))));
    }

    #[test]
    fn test_spot_price_response_parses_string_price() {
        let body: SpotPriceResponse = serde_json::from_str(r#"{"price": "2412.37"}"#).unwrap();
        assert_eq!(body.price, dec!(2412.37));
    }
}
