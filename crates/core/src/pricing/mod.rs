//! Gold spot price sources.
//!
//! This module defines the pricing oracle boundary:
//! - A `PriceSource` trait the transaction engine depends on
//! - An HTTP adapter for a real spot price endpoint
//! - A fixed adapter for development and tests

pub mod error;
pub mod service;

pub use error::PricingError;
pub use service::{AssetKind, FixedPriceFeed, HttpPriceFeed, PriceQuote, PriceSource};
