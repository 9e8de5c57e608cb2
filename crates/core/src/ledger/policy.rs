//! KYC gate policy for money-movement operations.
//!
//! Every deposit, withdrawal, buy, and sell is forced through this single
//! decision point before any wallet is touched. Reading balances or history
//! needs no verification and never consults the gate.

use uuid::Uuid;

use super::error::LedgerError;
use super::types::{KycStatus, TransactionKind};

/// Account state consulted by the gate.
///
/// Resolved from storage by the caller; the gate itself performs no lookups.
#[derive(Debug, Clone)]
pub struct AccountState {
    /// The account ID.
    pub id: Uuid,
    /// Whether the account is active. Deactivated accounts keep their data
    /// and history but cannot transact.
    pub is_active: bool,
    /// The account's current verification status.
    pub kyc_status: KycStatus,
}

/// Returns true if the verification status permits the operation.
///
/// This is an explicit allow-list: every money-movement operation requires
/// an approved status, and any other status denies, including statuses
/// introduced later.
#[must_use]
pub const fn permits(operation: TransactionKind, status: KycStatus) -> bool {
    match operation {
        TransactionKind::Deposit
        | TransactionKind::Withdraw
        | TransactionKind::Buy
        | TransactionKind::Sell => status.is_approved(),
    }
}

/// Validates that an account may perform a money-movement operation.
///
/// # Errors
///
/// * `LedgerError::AccountInactive` if the account is deactivated
/// * `LedgerError::NotVerified` if the verification status denies the
///   operation; carries the current status so the caller can route the
///   customer to verification
pub fn validate_gate(
    account: &AccountState,
    operation: TransactionKind,
) -> Result<(), LedgerError> {
    if !account.is_active {
        return Err(LedgerError::AccountInactive(account.id));
    }

    if !permits(operation, account.kyc_status) {
        return Err(LedgerError::NotVerified {
            status: account.kyc_status,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn kyc_status_strategy() -> impl Strategy<Value = KycStatus> {
        prop_oneof![
            Just(KycStatus::Unverified),
            Just(KycStatus::Pending),
            Just(KycStatus::Approved),
            Just(KycStatus::Rejected),
        ]
    }

    fn operation_strategy() -> impl Strategy<Value = TransactionKind> {
        prop_oneof![
            Just(TransactionKind::Deposit),
            Just(TransactionKind::Withdraw),
            Just(TransactionKind::Buy),
            Just(TransactionKind::Sell),
        ]
    }

    fn account(is_active: bool, kyc_status: KycStatus) -> AccountState {
        AccountState {
            id: Uuid::new_v4(),
            is_active,
            kyc_status,
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// An approved, active account passes the gate for every operation.
        #[test]
        fn prop_approved_active_account_passes(operation in operation_strategy()) {
            let account = account(true, KycStatus::Approved);
            prop_assert!(validate_gate(&account, operation).is_ok());
        }

        /// Every non-approved status is denied for every operation.
        #[test]
        fn prop_non_approved_status_denied(
            operation in operation_strategy(),
            status in kyc_status_strategy(),
        ) {
            prop_assume!(status != KycStatus::Approved);
            let account = account(true, status);
            let result = validate_gate(&account, operation);
            prop_assert!(
                matches!(result, Err(LedgerError::NotVerified { .. })),
                "status {status} should deny {operation}"
            );
        }

        /// A deactivated account is rejected regardless of verification status.
        #[test]
        fn prop_inactive_account_rejected(
            operation in operation_strategy(),
            status in kyc_status_strategy(),
        ) {
            let account = account(false, status);
            let result = validate_gate(&account, operation);
            prop_assert!(matches!(result, Err(LedgerError::AccountInactive(_))));
        }

        /// The permits allow-list agrees with the status helper.
        #[test]
        fn prop_permits_matches_approved(
            operation in operation_strategy(),
            status in kyc_status_strategy(),
        ) {
            prop_assert_eq!(permits(operation, status), status.is_approved());
        }
    }

    #[test]
    fn test_fresh_unverified_account_denied() {
        let account = account(true, KycStatus::Unverified);
        let result = validate_gate(&account, TransactionKind::Deposit);
        assert!(matches!(
            result,
            Err(LedgerError::NotVerified {
                status: KycStatus::Unverified,
            })
        ));
    }

    #[test]
    fn test_rejected_account_denied() {
        let account = account(true, KycStatus::Rejected);
        let result = validate_gate(&account, TransactionKind::Withdraw);
        assert!(matches!(
            result,
            Err(LedgerError::NotVerified {
                status: KycStatus::Rejected,
            })
        ));
    }

    #[test]
    fn test_error_carries_current_status() {
        let account = account(true, KycStatus::Pending);
        match validate_gate(&account, TransactionKind::Buy) {
            Err(LedgerError::NotVerified { status }) => assert_eq!(status, KycStatus::Pending),
            other => panic!("expected NotVerified, got {other:?}"),
        }
    }

    #[test]
    fn test_inactive_checked_before_verification() {
        // A deactivated but approved account fails on the account, not the
        // verification status.
        let account = account(false, KycStatus::Approved);
        assert!(matches!(
            validate_gate(&account, TransactionKind::Sell),
            Err(LedgerError::AccountInactive(_))
        ));
    }
}
