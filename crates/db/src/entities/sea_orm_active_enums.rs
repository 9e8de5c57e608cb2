//! `SeaORM` active enums mapped to Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use aurum_core::ledger;
use aurum_shared::types;

/// Postgres `kyc_status` enum.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "kyc_status")]
#[serde(rename_all = "lowercase")]
pub enum KycStatus {
    #[sea_orm(string_value = "unverified")]
    Unverified,
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

/// Postgres `wallet_kind` enum.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "wallet_kind")]
#[serde(rename_all = "lowercase")]
pub enum WalletKind {
    #[sea_orm(string_value = "cash")]
    Cash,
    #[sea_orm(string_value = "gold")]
    Gold,
}

/// Postgres `transaction_kind` enum.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_kind")]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    #[sea_orm(string_value = "deposit")]
    Deposit,
    #[sea_orm(string_value = "withdraw")]
    Withdraw,
    #[sea_orm(string_value = "buy")]
    Buy,
    #[sea_orm(string_value = "sell")]
    Sell,
}

/// Postgres `transaction_status` enum.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_status")]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "failed")]
    Failed,
}

impl From<ledger::KycStatus> for KycStatus {
    fn from(value: ledger::KycStatus) -> Self {
        match value {
            ledger::KycStatus::Unverified => Self::Unverified,
            ledger::KycStatus::Pending => Self::Pending,
            ledger::KycStatus::Approved => Self::Approved,
            ledger::KycStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<KycStatus> for ledger::KycStatus {
    fn from(value: KycStatus) -> Self {
        match value {
            KycStatus::Unverified => Self::Unverified,
            KycStatus::Pending => Self::Pending,
            KycStatus::Approved => Self::Approved,
            KycStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<types::WalletKind> for WalletKind {
    fn from(value: types::WalletKind) -> Self {
        match value {
            types::WalletKind::Cash => Self::Cash,
            types::WalletKind::Gold => Self::Gold,
        }
    }
}

impl From<WalletKind> for types::WalletKind {
    fn from(value: WalletKind) -> Self {
        match value {
            WalletKind::Cash => Self::Cash,
            WalletKind::Gold => Self::Gold,
        }
    }
}

impl From<ledger::TransactionKind> for TransactionKind {
    fn from(value: ledger::TransactionKind) -> Self {
        match value {
            ledger::TransactionKind::Deposit => Self::Deposit,
            ledger::TransactionKind::Withdraw => Self::Withdraw,
            ledger::TransactionKind::Buy => Self::Buy,
            ledger::TransactionKind::Sell => Self::Sell,
        }
    }
}

impl From<TransactionKind> for ledger::TransactionKind {
    fn from(value: TransactionKind) -> Self {
        match value {
            TransactionKind::Deposit => Self::Deposit,
            TransactionKind::Withdraw => Self::Withdraw,
            TransactionKind::Buy => Self::Buy,
            TransactionKind::Sell => Self::Sell,
        }
    }
}

impl From<ledger::TransactionStatus> for TransactionStatus {
    fn from(value: ledger::TransactionStatus) -> Self {
        match value {
            ledger::TransactionStatus::Completed => Self::Completed,
            ledger::TransactionStatus::Failed => Self::Failed,
        }
    }
}

impl From<TransactionStatus> for ledger::TransactionStatus {
    fn from(value: TransactionStatus) -> Self {
        match value {
            TransactionStatus::Completed => Self::Completed,
            TransactionStatus::Failed => Self::Failed,
        }
    }
}
