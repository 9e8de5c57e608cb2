//! Wallet routes: balances, history, and money movement.
//!
//! Every money-movement response carries the committed transaction record
//! plus the resulting balances, so clients never have to re-read after an
//! operation. Errors map straight off the ledger error taxonomy.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use aurum_core::ledger::LedgerError;
use aurum_db::entities::sea_orm_active_enums::{TransactionKind, TransactionStatus};
use aurum_db::entities::transactions;
use aurum_db::{OperationReceipt, WalletBalances};
use aurum_shared::types::{CursorPage, CursorRequest};

/// Creates the wallet routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/wallet/balances", get(balances))
        .route("/wallet/history", get(history))
        .route("/wallet/deposit", post(deposit))
        .route("/wallet/withdraw", post(withdraw))
        .route("/wallet/buy", post(buy))
        .route("/wallet/sell", post(sell))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for cash deposits and withdrawals.
#[derive(Debug, Deserialize)]
pub struct CashAmountRequest {
    /// Cash amount as a decimal string.
    pub amount: String,
}

/// Request body for gold trades.
#[derive(Debug, Deserialize)]
pub struct GoldAmountRequest {
    /// Gold amount in troy ounces as a decimal string.
    pub gold_amount: String,
}

/// A transaction record as returned by the API.
#[derive(Debug, Serialize)]
pub struct TransactionRecord {
    /// Transaction ID.
    pub id: Uuid,
    /// Transaction kind.
    pub kind: String,
    /// Signed cash delta.
    pub cash_delta: String,
    /// Signed gold delta in troy ounces.
    pub gold_delta: String,
    /// Pinned unit price, present for trades only.
    pub unit_price: Option<String>,
    /// Transaction status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: String,
}

/// Both wallet balances as decimal strings.
#[derive(Debug, Serialize)]
pub struct BalancesPayload {
    /// Cash balance.
    pub cash: String,
    /// Gold balance in troy ounces.
    pub gold: String,
}

/// Response for a committed money-movement operation.
#[derive(Debug, Serialize)]
pub struct OperationResponse {
    /// The transaction record appended by this operation.
    pub transaction: TransactionRecord,
    /// Balances after the operation committed.
    pub balances: BalancesPayload,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /wallet/balances - Read both wallet balances.
async fn balances(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    match state.engine.balances(auth.account_id()).await {
        Ok(b) => (StatusCode::OK, Json(balances_payload(&b))).into_response(),
        Err(e) => ledger_error_response(&e),
    }
}

/// GET /wallet/history - One page of transaction history, newest first.
async fn history(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<CursorRequest>,
) -> impl IntoResponse {
    match state
        .engine
        .history(
            auth.account_id(),
            query.cursor.as_deref(),
            query.clamped_limit(),
        )
        .await
    {
        Ok(page) => {
            let records: Vec<TransactionRecord> =
                page.items.iter().map(transaction_record).collect();
            (
                StatusCode::OK,
                Json(CursorPage::new(records, page.next_cursor)),
            )
                .into_response()
        }
        Err(e) => ledger_error_response(&e),
    }
}

/// POST /wallet/deposit - Credit cash to the account.
async fn deposit(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CashAmountRequest>,
) -> impl IntoResponse {
    let Some(amount) = parse_amount(&payload.amount) else {
        return invalid_amount_response();
    };

    match state.engine.deposit(auth.account_id(), amount).await {
        Ok(receipt) => {
            info!(
                account_id = %auth.account_id(),
                transaction_id = %receipt.record.id,
                amount = %amount,
                "Deposit completed"
            );
            operation_response(&receipt)
        }
        Err(e) => ledger_error_response(&e),
    }
}

/// POST /wallet/withdraw - Debit cash from the account.
async fn withdraw(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CashAmountRequest>,
) -> impl IntoResponse {
    let Some(amount) = parse_amount(&payload.amount) else {
        return invalid_amount_response();
    };

    match state.engine.withdraw(auth.account_id(), amount).await {
        Ok(receipt) => {
            info!(
                account_id = %auth.account_id(),
                transaction_id = %receipt.record.id,
                amount = %amount,
                "Withdrawal completed"
            );
            operation_response(&receipt)
        }
        Err(e) => ledger_error_response(&e),
    }
}

/// POST /wallet/buy - Buy gold with cash at the current spot price.
async fn buy(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<GoldAmountRequest>,
) -> impl IntoResponse {
    let Some(gold_amount) = parse_amount(&payload.gold_amount) else {
        return invalid_amount_response();
    };

    match state.engine.buy(auth.account_id(), gold_amount).await {
        Ok(receipt) => {
            info!(
                account_id = %auth.account_id(),
                transaction_id = %receipt.record.id,
                gold_amount = %gold_amount,
                "Gold purchase completed"
            );
            operation_response(&receipt)
        }
        Err(e) => ledger_error_response(&e),
    }
}

/// POST /wallet/sell - Sell gold for cash at the current spot price.
async fn sell(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<GoldAmountRequest>,
) -> impl IntoResponse {
    let Some(gold_amount) = parse_amount(&payload.gold_amount) else {
        return invalid_amount_response();
    };

    match state.engine.sell(auth.account_id(), gold_amount).await {
        Ok(receipt) => {
            info!(
                account_id = %auth.account_id(),
                transaction_id = %receipt.record.id,
                gold_amount = %gold_amount,
                "Gold sale completed"
            );
            operation_response(&receipt)
        }
        Err(e) => ledger_error_response(&e),
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Parses a client-supplied decimal string. Scale and sign checks are the
/// engine's job; this only rejects strings that are not decimals at all.
fn parse_amount(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw.trim()).ok()
}

fn invalid_amount_response() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": "INVALID_AMOUNT",
            "message": "Amount must be a decimal string"
        })),
    )
        .into_response()
}

/// Builds the 201 response for a committed operation.
fn operation_response(receipt: &OperationReceipt) -> Response {
    (
        StatusCode::CREATED,
        Json(OperationResponse {
            transaction: transaction_record(&receipt.record),
            balances: balances_payload(&receipt.balances),
        }),
    )
        .into_response()
}

/// Maps a ledger error onto its HTTP status and error body.
fn ledger_error_response(err: &LedgerError) -> Response {
    let status = StatusCode::from_u16(err.http_status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    // Validation and business rejections are normal outcomes; only
    // infrastructure faults are incidents worth logging
    if status.is_server_error() {
        error!(error = %err, code = err.error_code(), "Wallet operation failed");
    }

    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": err.to_string(),
            "retryable": err.is_retryable()
        })),
    )
        .into_response()
}

fn transaction_record(record: &transactions::Model) -> TransactionRecord {
    TransactionRecord {
        id: record.id,
        kind: kind_to_string(&record.kind),
        cash_delta: record.cash_delta.to_string(),
        gold_delta: record.gold_delta.to_string(),
        unit_price: record.unit_price.map(|p| p.to_string()),
        status: status_to_string(&record.status),
        created_at: record.created_at.to_rfc3339(),
    }
}

fn balances_payload(balances: &WalletBalances) -> BalancesPayload {
    BalancesPayload {
        cash: balances.cash.to_string(),
        gold: balances.gold.to_string(),
    }
}

/// Converts the `TransactionKind` enum to its API string.
fn kind_to_string(kind: &TransactionKind) -> String {
    match kind {
        TransactionKind::Deposit => "deposit".to_string(),
        TransactionKind::Withdraw => "withdraw".to_string(),
        TransactionKind::Buy => "buy".to_string(),
        TransactionKind::Sell => "sell".to_string(),
    }
}

/// Converts the `TransactionStatus` enum to its API string.
fn status_to_string(status: &TransactionStatus) -> String {
    match status {
        TransactionStatus::Completed => "completed".to_string(),
        TransactionStatus::Failed => "failed".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aurum_core::ledger::{KycStatus, WalletKind};
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("100.00"), Some(dec!(100.00)));
        assert_eq!(parse_amount("  0.05  "), Some(dec!(0.05)));
        assert_eq!(parse_amount("-3.50"), Some(dec!(-3.50)));
        assert_eq!(parse_amount("1e2"), None);
        assert_eq!(parse_amount("ten dollars"), None);
        assert_eq!(parse_amount(""), None);
    }

    #[test]
    fn test_ledger_errors_map_to_status_codes() {
        let resp = ledger_error_response(&LedgerError::InsufficientFunds {
            kind: WalletKind::Cash,
        });
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let resp = ledger_error_response(&LedgerError::NotVerified {
            status: KycStatus::Pending,
        });
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = ledger_error_response(&LedgerError::AccountNotFound(Uuid::nil()));
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = ledger_error_response(&LedgerError::InvalidCursor);
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp =
            ledger_error_response(&LedgerError::PriceUnavailable("feed offline".to_string()));
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_kind_and_status_strings() {
        assert_eq!(kind_to_string(&TransactionKind::Deposit), "deposit");
        assert_eq!(kind_to_string(&TransactionKind::Sell), "sell");
        assert_eq!(status_to_string(&TransactionStatus::Completed), "completed");
    }
}
