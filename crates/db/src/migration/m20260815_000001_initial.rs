//! Initial database migration.
//!
//! Creates the ledger enums and core tables: accounts, wallets, and the
//! append-only transactions log.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: ACCOUNTS
        // ============================================================
        db.execute_unprepared(ACCOUNTS_SQL).await?;

        // ============================================================
        // PART 3: WALLETS
        // ============================================================
        db.execute_unprepared(WALLETS_SQL).await?;

        // ============================================================
        // PART 4: TRANSACTIONS
        // ============================================================
        db.execute_unprepared(TRANSACTIONS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- KYC verification status
CREATE TYPE kyc_status AS ENUM (
    'unverified',
    'pending',
    'approved',
    'rejected'
);

-- Wallet kinds
CREATE TYPE wallet_kind AS ENUM ('cash', 'gold');

-- Transaction kinds
CREATE TYPE transaction_kind AS ENUM (
    'deposit',
    'withdraw',
    'buy',
    'sell'
);

-- Transaction outcome
CREATE TYPE transaction_status AS ENUM ('completed', 'failed');
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    email VARCHAR(255) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    full_name VARCHAR(255) NOT NULL,
    kyc_status kyc_status NOT NULL DEFAULT 'unverified',
    kyc_updated_at TIMESTAMPTZ,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_accounts_email ON accounts(email) WHERE is_active = true;
";

const WALLETS_SQL: &str = r"
CREATE TABLE wallets (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    account_id UUID NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    kind wallet_kind NOT NULL,
    balance NUMERIC(19, 8) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    -- Balances are never observable negative, even mid-operation
    CONSTRAINT chk_balance_non_negative CHECK (balance >= 0),

    -- Exactly one wallet per (account, kind)
    UNIQUE (account_id, kind)
);

CREATE INDEX idx_wallets_account ON wallets(account_id);
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    account_id UUID NOT NULL REFERENCES accounts(id),
    kind transaction_kind NOT NULL,
    cash_delta NUMERIC(19, 2) NOT NULL DEFAULT 0,
    gold_delta NUMERIC(19, 8) NOT NULL DEFAULT 0,
    unit_price NUMERIC(19, 2),
    status transaction_status NOT NULL DEFAULT 'completed',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    -- Trades pin the price they executed at; nothing else carries one
    CONSTRAINT chk_trade_has_price CHECK (
        (kind IN ('buy', 'sell')) = (unit_price IS NOT NULL)
    ),
    CONSTRAINT chk_price_positive CHECK (unit_price IS NULL OR unit_price > 0),

    -- Each kind moves the wallets in one fixed direction
    CONSTRAINT chk_kind_deltas CHECK (
        (kind = 'deposit' AND cash_delta > 0 AND gold_delta = 0)
        OR (kind = 'withdraw' AND cash_delta < 0 AND gold_delta = 0)
        OR (kind = 'buy' AND cash_delta < 0 AND gold_delta > 0)
        OR (kind = 'sell' AND cash_delta > 0 AND gold_delta < 0)
    )
);

-- History is read newest-first with a keyset cursor on (created_at, id)
CREATE INDEX idx_transactions_account_created ON transactions(account_id, created_at DESC, id DESC);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS transactions CASCADE;
DROP TABLE IF EXISTS wallets CASCADE;
DROP TABLE IF EXISTS accounts CASCADE;
DROP TYPE IF EXISTS transaction_status;
DROP TYPE IF EXISTS transaction_kind;
DROP TYPE IF EXISTS wallet_kind;
DROP TYPE IF EXISTS kyc_status;
";
