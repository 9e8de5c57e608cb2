//! Ledger domain types for wallet operations.
//!
//! This module defines the core types used for validating and planning
//! money movement between a customer's cash and gold wallets.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use aurum_shared::types::WalletKind;

/// Customer verification status as decided by the KYC provider.
///
/// Only `Approved` accounts may move money; every other status (and any
/// status added later) fails closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KycStatus {
    /// Account has never submitted verification documents.
    Unverified,
    /// Verification is in progress at the provider.
    Pending,
    /// Verification passed; money movement is allowed.
    Approved,
    /// Verification failed; money movement stays blocked.
    Rejected,
}

impl KycStatus {
    /// Returns true if this status permits money movement.
    #[must_use]
    pub const fn is_approved(self) -> bool {
        matches!(self, Self::Approved)
    }
}

impl std::fmt::Display for KycStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unverified => write!(f, "unverified"),
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for KycStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unverified" => Ok(Self::Unverified),
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(format!("unknown kyc status: {other}")),
        }
    }
}

/// The kind of wallet operation being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Cash in from an external payment.
    Deposit,
    /// Cash out to an external destination.
    Withdraw,
    /// Exchange cash for gold at the pinned spot price.
    Buy,
    /// Exchange gold for cash at the pinned spot price.
    Sell,
}

impl TransactionKind {
    /// Returns true for operations that exchange between both wallets
    /// and therefore pin a unit price.
    #[must_use]
    pub const fn is_trade(self) -> bool {
        matches!(self, Self::Buy | Self::Sell)
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Deposit => write!(f, "deposit"),
            Self::Withdraw => write!(f, "withdraw"),
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

/// Outcome recorded for a ledger transaction.
///
/// The engine only ever records `Completed` rows; rejected operations
/// record nothing. `Failed` exists for capture failures reported by the
/// external payment processor and is ignored by balance replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Balances were updated; the record explains the change.
    Completed,
    /// The operation did not change any balance.
    Failed,
}

impl TransactionStatus {
    /// Returns true if this record contributes to balance replay.
    #[must_use]
    pub const fn counts_for_replay(self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// A validated, ready-to-apply wallet operation.
///
/// Deltas are signed: positive credits the wallet, negative debits it.
/// A delta of zero means the wallet is untouched. Trades carry the unit
/// price that was pinned when the plan was made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationPlan {
    /// The operation this plan realizes.
    pub kind: TransactionKind,
    /// Signed change to the cash wallet, scaled to 2 decimal places.
    pub cash_delta: Decimal,
    /// Signed change to the gold wallet, scaled to 8 decimal places.
    pub gold_delta: Decimal,
    /// Spot price per troy ounce pinned at planning time, trades only.
    pub unit_price: Option<Decimal>,
}

impl OperationPlan {
    /// Returns the non-zero wallet deltas of this plan.
    #[must_use]
    pub fn deltas(&self) -> Vec<(WalletKind, Decimal)> {
        let mut deltas = Vec::with_capacity(2);
        if !self.cash_delta.is_zero() {
            deltas.push((WalletKind::Cash, self.cash_delta));
        }
        if !self.gold_delta.is_zero() {
            deltas.push((WalletKind::Gold, self.gold_delta));
        }
        deltas
    }

    /// Returns the wallets this plan debits (negative delta) with the
    /// magnitude debited.
    #[must_use]
    pub fn debits(&self) -> Vec<(WalletKind, Decimal)> {
        self.deltas()
            .into_iter()
            .filter(|(_, delta)| delta.is_sign_negative())
            .map(|(kind, delta)| (kind, -delta))
            .collect()
    }
}
