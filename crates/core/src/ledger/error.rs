//! Ledger error types for validation and state errors.
//!
//! This module defines all errors that can occur during wallet operations,
//! including amount validation errors, account errors, verification errors,
//! balance errors, and infrastructure errors.

use thiserror::Error;
use uuid::Uuid;

use crate::pricing::PricingError;

use super::types::{KycStatus, WalletKind};

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Operation amount must be greater than zero.
    #[error("Amount must be greater than zero")]
    AmountNotPositive,

    /// Operation amount carries more decimal places than the wallet supports.
    #[error("Amount exceeds {max_scale} decimal places for the {kind} wallet")]
    AmountTooPrecise {
        /// The wallet kind whose scale was exceeded.
        kind: WalletKind,
        /// Maximum decimal places the wallet supports.
        max_scale: u32,
    },

    /// The trade's cash value rounds below the minimum cash unit.
    #[error("Trade value rounds below the minimum cash unit")]
    TradeTooSmall,

    /// History pagination cursor is malformed or was not issued by this service.
    #[error("Invalid history cursor")]
    InvalidCursor,

    // ========== Account Errors ==========
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Account is deactivated and cannot transact.
    #[error("Account {0} is inactive")]
    AccountInactive(Uuid),

    /// Account verification status does not permit money movement.
    #[error("Account is not verified for money movement (current status: {status})")]
    NotVerified {
        /// The account's current verification status.
        status: KycStatus,
    },

    // ========== Balance Errors ==========
    /// The wallet balance cannot cover the requested debit.
    #[error("Insufficient {kind} balance for this operation")]
    InsufficientFunds {
        /// The wallet kind that could not cover the debit.
        kind: WalletKind,
    },

    // ========== Infrastructure Errors ==========
    /// The price source could not supply a quote.
    #[error("Price unavailable: {0}")]
    PriceUnavailable(String),

    /// The ledger store timed out or is unreachable.
    #[error("Ledger store unavailable: {0}")]
    StoreUnavailable(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<PricingError> for LedgerError {
    fn from(err: PricingError) -> Self {
        match err {
            PricingError::Unavailable(reason) => Self::PriceUnavailable(reason),
        }
    }
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::AmountNotPositive => "AMOUNT_NOT_POSITIVE",
            Self::AmountTooPrecise { .. } => "AMOUNT_TOO_PRECISE",
            Self::TradeTooSmall => "TRADE_TOO_SMALL",
            Self::InvalidCursor => "INVALID_CURSOR",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
            Self::NotVerified { .. } => "NOT_VERIFIED",
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            Self::PriceUnavailable(_) => "PRICE_UNAVAILABLE",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::AmountNotPositive
            | Self::AmountTooPrecise { .. }
            | Self::TradeTooSmall
            | Self::InvalidCursor => 400,

            // 403 Forbidden - gating errors
            Self::AccountInactive(_) | Self::NotVerified { .. } => 403,

            // 404 Not Found
            Self::AccountNotFound(_) => 404,

            // 422 Unprocessable Entity - expected business outcome
            Self::InsufficientFunds { .. } => 422,

            // 503 Service Unavailable - retryable infrastructure faults
            Self::PriceUnavailable(_) | Self::StoreUnavailable(_) => 503,

            // 500 Internal Server Error
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns true if the caller may retry the operation with backoff.
    ///
    /// Retryable errors guarantee that no wallet mutation occurred.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::PriceUnavailable(_) | Self::StoreUnavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(LedgerError::AmountNotPositive.error_code(), "AMOUNT_NOT_POSITIVE");
        assert_eq!(
            LedgerError::AmountTooPrecise {
                kind: WalletKind::Cash,
                max_scale: 2,
            }
            .error_code(),
            "AMOUNT_TOO_PRECISE"
        );
        assert_eq!(
            LedgerError::NotVerified {
                status: KycStatus::Pending,
            }
            .error_code(),
            "NOT_VERIFIED"
        );
        assert_eq!(
            LedgerError::InsufficientFunds {
                kind: WalletKind::Gold,
            }
            .error_code(),
            "INSUFFICIENT_FUNDS"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(LedgerError::AmountNotPositive.http_status_code(), 400);
        assert_eq!(LedgerError::InvalidCursor.http_status_code(), 400);
        assert_eq!(
            LedgerError::NotVerified {
                status: KycStatus::Unverified,
            }
            .http_status_code(),
            403
        );
        assert_eq!(
            LedgerError::AccountNotFound(Uuid::nil()).http_status_code(),
            404
        );
        assert_eq!(
            LedgerError::InsufficientFunds {
                kind: WalletKind::Cash,
            }
            .http_status_code(),
            422
        );
        assert_eq!(
            LedgerError::PriceUnavailable("feed timeout".to_string()).http_status_code(),
            503
        );
        assert_eq!(
            LedgerError::Database("test".to_string()).http_status_code(),
            500
        );
    }

    #[test]
    fn test_retryable_errors() {
        assert!(LedgerError::PriceUnavailable("timeout".to_string()).is_retryable());
        assert!(LedgerError::StoreUnavailable("pool exhausted".to_string()).is_retryable());
        assert!(!LedgerError::AmountNotPositive.is_retryable());
        assert!(!LedgerError::InsufficientFunds {
            kind: WalletKind::Cash,
        }
        .is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = LedgerError::AmountTooPrecise {
            kind: WalletKind::Gold,
            max_scale: 8,
        };
        assert_eq!(
            err.to_string(),
            "Amount exceeds 8 decimal places for the gold wallet"
        );

        let err = LedgerError::NotVerified {
            status: KycStatus::Rejected,
        };
        assert_eq!(
            err.to_string(),
            "Account is not verified for money movement (current status: rejected)"
        );
    }
}
