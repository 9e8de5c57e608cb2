//! Wallet ledger logic.
//!
//! This module implements the core ledger functionality:
//! - Domain types for wallets, operations, and transaction records
//! - Amount validation and operation planning
//! - KYC gate policy for money movement
//! - Error types for ledger operations

pub mod error;
pub mod policy;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::LedgerError;
pub use policy::{AccountState, permits, validate_gate};
pub use service::LedgerService;
pub use types::{KycStatus, OperationPlan, TransactionKind, TransactionStatus, WalletKind};
