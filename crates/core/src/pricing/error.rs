//! Pricing error types.

use thiserror::Error;

/// Errors produced by price sources.
#[derive(Debug, Error)]
pub enum PricingError {
    /// The source could not supply a usable quote.
    ///
    /// Covers transport failures, timeouts, malformed responses, and
    /// non-positive prices. Safe to retry; no wallet was touched.
    #[error("price unavailable: {0}")]
    Unavailable(String),
}
