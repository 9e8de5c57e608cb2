//! Transaction engine: executes wallet operations atomically.
//!
//! The engine composes the pure planning logic from `aurum-core` with the
//! guarded wallet updates and the append-only transaction log. One call is
//! one database transaction: either the balances move and exactly one record
//! lands, or nothing changes at all.

use std::sync::Arc;

use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, DbErr, TransactionTrait};
use tracing::warn;
use uuid::Uuid;

use aurum_core::ledger::{
    AccountState, LedgerError, LedgerService, OperationPlan, TransactionKind, validate_gate,
};
use aurum_core::pricing::{AssetKind, PriceQuote, PriceSource};

use crate::entities::{accounts, transactions};
use crate::repositories::{
    AccountRepository, TransactionLogError, TransactionPage, TransactionRepository,
    WalletBalances, WalletError, WalletRepository,
};

/// Outcome of a completed wallet operation.
#[derive(Debug, Clone)]
pub struct OperationReceipt {
    /// The immutable record appended to the transaction log.
    pub record: transactions::Model,
    /// Balances as of the commit that included this operation.
    pub balances: WalletBalances,
}

/// Result of replaying an account's transaction log against its balances.
#[derive(Debug, Clone, Copy)]
pub struct ReplayReport {
    /// Net deltas summed from the completed records.
    pub replayed: WalletBalances,
    /// Balances currently held by the wallets.
    pub balances: WalletBalances,
}

impl ReplayReport {
    /// True when the log and the wallets agree exactly.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.replayed == self.balances
    }
}

/// Executes wallet operations atomically against the ledger store.
#[derive(Clone)]
pub struct TransactionEngine {
    db: DatabaseConnection,
    prices: Arc<dyn PriceSource>,
    accounts: AccountRepository,
    wallets: WalletRepository,
    log: TransactionRepository,
}

impl TransactionEngine {
    /// Creates a new transaction engine.
    #[must_use]
    pub fn new(db: DatabaseConnection, prices: Arc<dyn PriceSource>) -> Self {
        Self {
            accounts: AccountRepository::new(db.clone()),
            wallets: WalletRepository::new(db.clone()),
            log: TransactionRepository::new(db.clone()),
            db,
            prices,
        }
    }

    /// Deposits cash into an account's cash wallet.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if the account cannot transact, the amount is
    /// invalid, or the store fails.
    pub async fn deposit(
        &self,
        account_id: Uuid,
        amount: Decimal,
    ) -> Result<OperationReceipt, LedgerError> {
        self.gated_account(account_id, TransactionKind::Deposit)
            .await?;
        let plan = LedgerService::plan_deposit(amount)?;
        self.apply(account_id, plan).await
    }

    /// Withdraws cash from an account's cash wallet.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InsufficientFunds` when the cash balance cannot
    /// cover the amount; no record is written in that case.
    pub async fn withdraw(
        &self,
        account_id: Uuid,
        amount: Decimal,
    ) -> Result<OperationReceipt, LedgerError> {
        self.gated_account(account_id, TransactionKind::Withdraw)
            .await?;
        let plan = LedgerService::plan_withdraw(amount)?;
        self.apply(account_id, plan).await
    }

    /// Buys gold with cash at the current spot price.
    ///
    /// The price is fetched once and pinned into the plan, so the recorded
    /// transaction carries exactly the price the customer traded at.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::PriceUnavailable` when no quote can be obtained
    /// and `LedgerError::InsufficientFunds` when cash cannot cover the cost.
    pub async fn buy(
        &self,
        account_id: Uuid,
        gold_amount: Decimal,
    ) -> Result<OperationReceipt, LedgerError> {
        self.gated_account(account_id, TransactionKind::Buy).await?;
        let quote = self.spot_quote().await?;
        let plan = LedgerService::plan_buy(gold_amount, quote.price)?;
        self.apply(account_id, plan).await
    }

    /// Sells gold for cash at the current spot price.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::PriceUnavailable` when no quote can be obtained
    /// and `LedgerError::InsufficientFunds` when gold cannot cover the sale.
    pub async fn sell(
        &self,
        account_id: Uuid,
        gold_amount: Decimal,
    ) -> Result<OperationReceipt, LedgerError> {
        self.gated_account(account_id, TransactionKind::Sell).await?;
        let quote = self.spot_quote().await?;
        let plan = LedgerService::plan_sell(gold_amount, quote.price)?;
        self.apply(account_id, plan).await
    }

    /// Reads both wallet balances for an account.
    ///
    /// Readable regardless of verification status; only money movement is
    /// gated on KYC.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::AccountNotFound` for an unknown account.
    pub async fn balances(&self, account_id: Uuid) -> Result<WalletBalances, LedgerError> {
        self.find_account(account_id).await?;
        self.wallets
            .balances(account_id)
            .await
            .map_err(store_error)
    }

    /// Fetches one page of an account's transaction history, newest first.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidCursor` for a cursor this service did
    /// not issue and `LedgerError::AccountNotFound` for an unknown account.
    pub async fn history(
        &self,
        account_id: Uuid,
        cursor: Option<&str>,
        limit: u64,
    ) -> Result<TransactionPage, LedgerError> {
        self.find_account(account_id).await?;
        self.log
            .history(account_id, cursor, limit)
            .await
            .map_err(|err| match err {
                TransactionLogError::InvalidCursor => LedgerError::InvalidCursor,
                TransactionLogError::Database(err) => store_error(err),
            })
    }

    /// Replays the account's transaction log and compares it against the
    /// wallet balances.
    ///
    /// A mismatch means a balance change escaped the log (or a record was
    /// tampered with) and is logged as a warning.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::AccountNotFound` for an unknown account.
    pub async fn verify(&self, account_id: Uuid) -> Result<ReplayReport, LedgerError> {
        self.find_account(account_id).await?;

        let replayed = self.log.replay(account_id).await.map_err(store_error)?;
        let balances = self
            .wallets
            .balances(account_id)
            .await
            .map_err(store_error)?;

        let report = ReplayReport { replayed, balances };
        if !report.is_consistent() {
            warn!(
                %account_id,
                replayed_cash = %report.replayed.cash,
                wallet_cash = %report.balances.cash,
                replayed_gold = %report.replayed.gold,
                wallet_gold = %report.balances.gold,
                "transaction log replay does not match wallet balances"
            );
        }

        Ok(report)
    }

    /// Applies a validated plan in one database transaction.
    ///
    /// Wallet rows are created lazily, deltas are applied through the
    /// non-negative guard, and the log record is inserted before commit.
    /// Any failure rolls the whole operation back with nothing recorded.
    async fn apply(
        &self,
        account_id: Uuid,
        plan: OperationPlan,
    ) -> Result<OperationReceipt, LedgerError> {
        let txn = self.db.begin().await.map_err(store_error)?;

        self.wallets
            .ensure(&txn, account_id)
            .await
            .map_err(store_error)?;

        // Deltas always arrive in kind order, so concurrent trades touch
        // wallet rows in the same order and cannot deadlock each other.
        for (kind, delta) in plan.deltas() {
            self.wallets
                .apply_delta(&txn, account_id, kind, delta)
                .await
                .map_err(|err| match err {
                    WalletError::InsufficientFunds { kind } => {
                        LedgerError::InsufficientFunds { kind }
                    }
                    WalletError::NotFound { account_id, kind } => LedgerError::Internal(format!(
                        "wallet row missing after ensure: account {account_id}, {kind}"
                    )),
                    WalletError::Database(err) => store_error(err),
                })?;
        }

        let record = self
            .log
            .insert_completed(&txn, account_id, &plan)
            .await
            .map_err(store_error)?;
        let balances = self
            .wallets
            .balances_in(&txn, account_id)
            .await
            .map_err(store_error)?;

        txn.commit().await.map_err(store_error)?;

        Ok(OperationReceipt { record, balances })
    }

    /// Loads the account and checks it may perform the operation.
    async fn gated_account(
        &self,
        account_id: Uuid,
        kind: TransactionKind,
    ) -> Result<accounts::Model, LedgerError> {
        let account = self.find_account(account_id).await?;
        validate_gate(&AccountState::from(&account), kind)?;
        Ok(account)
    }

    async fn find_account(&self, account_id: Uuid) -> Result<accounts::Model, LedgerError> {
        self.accounts
            .find_by_id(account_id)
            .await
            .map_err(store_error)?
            .ok_or(LedgerError::AccountNotFound(account_id))
    }

    /// Fetches the gold spot quote for trade planning.
    async fn spot_quote(&self) -> Result<PriceQuote, LedgerError> {
        Ok(self.prices.spot_price(AssetKind::Gold).await?)
    }
}

/// Maps a database error onto the ledger error taxonomy.
///
/// Connection-level failures surface as retryable `StoreUnavailable`; any
/// other failure is a non-retryable `Database` error.
fn store_error(err: DbErr) -> LedgerError {
    match err {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => {
            LedgerError::StoreUnavailable(err.to_string())
        }
        _ => LedgerError::Database(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_replay_report_consistency() {
        let balances = WalletBalances {
            cash: dec!(105.00),
            gold: dec!(0.00000000),
        };
        let report = ReplayReport {
            replayed: balances,
            balances,
        };
        assert!(report.is_consistent());

        let drifted = ReplayReport {
            replayed: WalletBalances {
                cash: dec!(104.99),
                gold: dec!(0),
            },
            balances,
        };
        assert!(!drifted.is_consistent());
    }

    #[test]
    fn test_replay_report_ignores_scale() {
        // NUMERIC sums come back with whatever scale the database used;
        // equality is by value, not representation.
        let report = ReplayReport {
            replayed: WalletBalances {
                cash: dec!(100.00),
                gold: dec!(0.05),
            },
            balances: WalletBalances {
                cash: dec!(100),
                gold: dec!(0.05000000),
            },
        };
        assert!(report.is_consistent());
    }

    #[test]
    fn test_store_error_classification() {
        let err = store_error(DbErr::Custom("boom".to_string()));
        assert!(matches!(err, LedgerError::Database(_)));
        assert!(!err.is_retryable());
    }
}
