//! Shared types and configuration for Aurum.
//!
//! This crate provides common types used across all other crates:
//! - Wallet kinds and amount validation with decimal precision
//! - Cursor pagination types for history endpoints
//! - JWT claims and token services
//! - Configuration management

pub mod auth;
pub mod config;
pub mod jwt;
pub mod types;

pub use auth::Claims;
pub use config::AppConfig;
pub use jwt::{JwtConfig, JwtError, JwtService};
