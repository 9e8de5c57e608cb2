//! Wallet repository for balance reads and guarded balance mutation.
//!
//! All balance changes go through [`WalletRepository::apply_delta`], whose
//! UPDATE carries the non-negative guard in its WHERE clause. Overdrafts are
//! impossible at the storage level no matter how many writers race.

use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, ExprTrait, OnConflict};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, Set,
};
use serde::Serialize;
use uuid::Uuid;

use aurum_core::ledger::WalletKind;

use crate::entities::{sea_orm_active_enums, wallets};

/// Error types for wallet operations.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    /// No wallet row exists for the account and kind.
    #[error("Wallet not found for account {account_id} ({kind})")]
    NotFound {
        /// Owning account.
        account_id: Uuid,
        /// Wallet kind that was missing.
        kind: WalletKind,
    },

    /// The balance guard rejected a debit that would overdraw the wallet.
    #[error("Insufficient {kind} balance")]
    InsufficientFunds {
        /// Wallet kind that could not cover the debit.
        kind: WalletKind,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Cash and gold balances for one account.
///
/// Missing wallet rows read as zero, so freshly registered accounts report
/// empty balances without any wallet rows existing yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WalletBalances {
    /// Cash balance in account currency.
    pub cash: Decimal,
    /// Gold balance in troy ounces.
    pub gold: Decimal,
}

impl WalletBalances {
    /// Both balances at zero.
    pub const ZERO: Self = Self {
        cash: Decimal::ZERO,
        gold: Decimal::ZERO,
    };
}

/// Wallet repository for balance storage.
#[derive(Debug, Clone)]
pub struct WalletRepository {
    db: DatabaseConnection,
}

impl WalletRepository {
    /// Creates a new wallet repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates the cash and gold wallet rows for an account if missing.
    ///
    /// Idempotent: concurrent callers race on the `(account_id, kind)` unique
    /// constraint and the losers insert nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn ensure<C: ConnectionTrait>(
        &self,
        conn: &C,
        account_id: Uuid,
    ) -> Result<(), DbErr> {
        let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();
        let rows = [
            sea_orm_active_enums::WalletKind::Cash,
            sea_orm_active_enums::WalletKind::Gold,
        ]
        .map(|kind| wallets::ActiveModel {
            id: Set(Uuid::new_v4()),
            account_id: Set(account_id),
            kind: Set(kind),
            balance: Set(Decimal::ZERO),
            created_at: Set(now),
            updated_at: Set(now),
        });

        wallets::Entity::insert_many(rows)
            .on_conflict(
                OnConflict::columns([wallets::Column::AccountId, wallets::Column::Kind])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(conn)
            .await?;

        Ok(())
    }

    /// Reads both balances for an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn balances(&self, account_id: Uuid) -> Result<WalletBalances, DbErr> {
        Self::read_balances(&self.db, account_id).await
    }

    /// Reads both balances inside an open transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn balances_in(
        &self,
        txn: &DatabaseTransaction,
        account_id: Uuid,
    ) -> Result<WalletBalances, DbErr> {
        Self::read_balances(txn, account_id).await
    }

    async fn read_balances<C: ConnectionTrait>(
        conn: &C,
        account_id: Uuid,
    ) -> Result<WalletBalances, DbErr> {
        let rows = wallets::Entity::find()
            .filter(wallets::Column::AccountId.eq(account_id))
            .all(conn)
            .await?;

        let mut balances = WalletBalances::ZERO;
        for row in rows {
            match row.kind {
                sea_orm_active_enums::WalletKind::Cash => balances.cash = row.balance,
                sea_orm_active_enums::WalletKind::Gold => balances.gold = row.balance,
            }
        }

        Ok(balances)
    }

    /// Applies a signed delta to one wallet balance and returns the new balance.
    ///
    /// The UPDATE only matches while `balance + delta >= 0`, so of two racing
    /// debits against the same funds exactly one succeeds; the other matches
    /// no row and fails with [`WalletError::InsufficientFunds`]. The row lock
    /// taken by the UPDATE serializes followers until this transaction ends.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::InsufficientFunds`] when the guard rejects the
    /// delta, [`WalletError::NotFound`] when no wallet row exists, or a
    /// database error.
    pub async fn apply_delta(
        &self,
        txn: &DatabaseTransaction,
        account_id: Uuid,
        kind: WalletKind,
        delta: Decimal,
    ) -> Result<Decimal, WalletError> {
        let db_kind = sea_orm_active_enums::WalletKind::from(kind);

        let result = wallets::Entity::update_many()
            .col_expr(
                wallets::Column::Balance,
                Expr::col(wallets::Column::Balance).add(delta),
            )
            .col_expr(
                wallets::Column::UpdatedAt,
                Expr::value(chrono::Utc::now()),
            )
            .filter(wallets::Column::AccountId.eq(account_id))
            .filter(wallets::Column::Kind.eq(db_kind.clone()))
            .filter(Expr::col(wallets::Column::Balance).add(delta).gte(Decimal::ZERO))
            .exec(txn)
            .await?;

        if result.rows_affected == 0 {
            // Distinguish a missing wallet from a rejected debit.
            let wallet = self.find_wallet(txn, account_id, db_kind).await?;
            return Err(match wallet {
                Some(_) => WalletError::InsufficientFunds { kind },
                None => WalletError::NotFound { account_id, kind },
            });
        }

        let wallet = self
            .find_wallet(txn, account_id, sea_orm_active_enums::WalletKind::from(kind))
            .await?
            .ok_or(WalletError::NotFound { account_id, kind })?;

        Ok(wallet.balance)
    }

    async fn find_wallet(
        &self,
        txn: &DatabaseTransaction,
        account_id: Uuid,
        kind: sea_orm_active_enums::WalletKind,
    ) -> Result<Option<wallets::Model>, DbErr> {
        wallets::Entity::find()
            .filter(wallets::Column::AccountId.eq(account_id))
            .filter(wallets::Column::Kind.eq(kind))
            .one(txn)
            .await
    }
}
