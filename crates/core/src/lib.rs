//! Core business logic for Aurum.
//!
//! This crate contains domain logic with no database or web framework
//! dependencies. All domain types, validation rules, and calculations live
//! here; the one outward-facing piece is the HTTP gold price feed adapter.
//!
//! # Modules
//!
//! - `ledger` - Wallet operations, KYC gating, and transaction planning
//! - `pricing` - Gold spot price sources
//! - `auth` - Password hashing

pub mod auth;
pub mod ledger;
pub mod pricing;
