//! Transaction log repository: the append-only record of balance changes.
//!
//! Every committed balance change carries exactly one record here, inserted
//! on the same database transaction that moved the balances. Records are
//! never updated or deleted.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use aurum_core::ledger::OperationPlan;

use crate::entities::{sea_orm_active_enums::TransactionStatus, transactions};
use crate::repositories::wallet::WalletBalances;

/// Upper bound on requested page size.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Error types for transaction log operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionLogError {
    /// Pagination cursor is malformed.
    #[error("Invalid pagination cursor")]
    InvalidCursor,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// One page of transaction history, newest first.
#[derive(Debug, Clone)]
pub struct TransactionPage {
    /// Records in reverse chronological order.
    pub items: Vec<transactions::Model>,
    /// Cursor for the next (older) page, when one exists.
    pub next_cursor: Option<String>,
}

/// Transaction log repository.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction log repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Appends the completed record for an executed operation.
    ///
    /// Must run on the same transaction that moved the balances, so the
    /// record and the balance change commit or roll back together.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn insert_completed(
        &self,
        txn: &DatabaseTransaction,
        account_id: Uuid,
        plan: &OperationPlan,
    ) -> Result<transactions::Model, DbErr> {
        let record = transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            account_id: Set(account_id),
            kind: Set(plan.kind.into()),
            cash_delta: Set(plan.cash_delta),
            gold_delta: Set(plan.gold_delta),
            unit_price: Set(plan.unit_price),
            status: Set(TransactionStatus::Completed),
            created_at: Set(chrono::Utc::now().into()),
        };

        record.insert(txn).await
    }

    /// Fetches one page of an account's history, newest first.
    ///
    /// Ordering is `(created_at DESC, id DESC)`. The cursor pins the position
    /// of the last record already seen, so pages stay stable while new
    /// records are appended: nothing is skipped and nothing repeats.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionLogError::InvalidCursor`] when the cursor cannot
    /// be decoded, or a database error.
    pub async fn history(
        &self,
        account_id: Uuid,
        cursor: Option<&str>,
        limit: u64,
    ) -> Result<TransactionPage, TransactionLogError> {
        let limit = limit.clamp(1, MAX_PAGE_SIZE);

        let mut query =
            transactions::Entity::find().filter(transactions::Column::AccountId.eq(account_id));

        if let Some(cursor) = cursor {
            let (created_at, id) =
                decode_cursor(cursor).ok_or(TransactionLogError::InvalidCursor)?;
            query = query.filter(
                Condition::any()
                    .add(transactions::Column::CreatedAt.lt(created_at))
                    .add(
                        Condition::all()
                            .add(transactions::Column::CreatedAt.eq(created_at))
                            .add(transactions::Column::Id.lt(id)),
                    ),
            );
        }

        // Fetch one extra row to learn whether an older page exists.
        let mut items = query
            .order_by_desc(transactions::Column::CreatedAt)
            .order_by_desc(transactions::Column::Id)
            .limit(limit + 1)
            .all(&self.db)
            .await?;

        let next_cursor = if items.len() as u64 > limit {
            items.truncate(limit as usize);
            items
                .last()
                .map(|record| encode_cursor(record.created_at.into(), record.id))
        } else {
            None
        };

        Ok(TransactionPage { items, next_cursor })
    }

    /// Replays an account's completed records into net balance sums.
    ///
    /// Because every balance change commits together with exactly one
    /// completed record, the sums must equal the wallet balances exactly.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn replay(&self, account_id: Uuid) -> Result<WalletBalances, DbErr> {
        let sums: Option<(Option<Decimal>, Option<Decimal>)> = transactions::Entity::find()
            .select_only()
            .column_as(transactions::Column::CashDelta.sum(), "cash")
            .column_as(transactions::Column::GoldDelta.sum(), "gold")
            .filter(transactions::Column::AccountId.eq(account_id))
            .filter(transactions::Column::Status.eq(TransactionStatus::Completed))
            .into_tuple()
            .one(&self.db)
            .await?;

        let (cash, gold) = sums.unwrap_or((None, None));
        Ok(WalletBalances {
            cash: cash.unwrap_or_default(),
            gold: gold.unwrap_or_default(),
        })
    }
}

// ============================================================
// Cursor encoding
// ============================================================

/// Encodes a history cursor from the ordering key of the last record seen.
#[must_use]
pub fn encode_cursor(created_at: DateTime<Utc>, id: Uuid) -> String {
    base64_url::encode(&format!("{}:{}", created_at.timestamp_micros(), id))
}

/// Decodes a history cursor back into its ordering key.
///
/// Returns `None` for anything this service did not issue.
#[must_use]
pub fn decode_cursor(cursor: &str) -> Option<(DateTime<Utc>, Uuid)> {
    let raw = base64_url::decode(cursor).ok()?;
    let text = String::from_utf8(raw).ok()?;
    let (micros, id) = text.split_once(':')?;
    let created_at = DateTime::from_timestamp_micros(micros.parse().ok()?)?;
    let id = Uuid::parse_str(id).ok()?;
    Some((created_at, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for timestamps representable in cursor micros, up to year 2100.
    fn timestamp_micros() -> impl Strategy<Value = i64> {
        0i64..=4_102_444_800_000_000
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_cursor_round_trips(micros in timestamp_micros(), bytes in any::<[u8; 16]>()) {
            let created_at = DateTime::from_timestamp_micros(micros).expect("timestamp in range");
            let id = Uuid::from_bytes(bytes);

            let decoded = decode_cursor(&encode_cursor(created_at, id));
            prop_assert_eq!(decoded, Some((created_at, id)));
        }
    }

    #[test]
    fn test_cursor_round_trip() {
        let created_at = DateTime::from_timestamp_micros(1_755_600_000_123_456).unwrap();
        let id = Uuid::new_v4();

        let cursor = encode_cursor(created_at, id);
        let (decoded_at, decoded_id) = decode_cursor(&cursor).expect("cursor should decode");

        assert_eq!(decoded_at, created_at);
        assert_eq!(decoded_id, id);
    }

    #[test]
    fn test_cursor_is_url_safe() {
        let created_at = DateTime::from_timestamp_micros(1_755_600_000_123_456).unwrap();
        let cursor = encode_cursor(created_at, Uuid::new_v4());

        assert!(!cursor.contains('+'));
        assert!(!cursor.contains('/'));
        assert!(!cursor.contains('='));
    }

    #[test]
    fn test_cursor_rejects_garbage() {
        assert!(decode_cursor("").is_none());
        assert!(decode_cursor("not base64 !!!").is_none());
        assert!(decode_cursor(&base64_url::encode("no-colon")).is_none());
        assert!(decode_cursor(&base64_url::encode("abc:def")).is_none());
        assert!(decode_cursor(&base64_url::encode("123:not-a-uuid")).is_none());
    }

    #[test]
    fn test_cursor_accepts_pre_epoch_timestamps() {
        let created_at = DateTime::from_timestamp_micros(-1).unwrap();
        let id = Uuid::new_v4();

        let cursor = encode_cursor(created_at, id);
        let (decoded_at, _) = decode_cursor(&cursor).expect("cursor should decode");

        assert_eq!(decoded_at, created_at);
    }
}
