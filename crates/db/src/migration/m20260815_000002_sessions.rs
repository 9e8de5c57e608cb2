//! Sessions table for refresh-token authentication.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(SESSIONS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_SESSIONS_SQL).await?;
        Ok(())
    }
}

const SESSIONS_SQL: &str = r"
CREATE TABLE sessions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    account_id UUID NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,

    -- SHA-256 hex digest of the refresh token; the raw token is never stored
    refresh_token_hash VARCHAR(64) NOT NULL,

    user_agent VARCHAR(512),
    ip_address VARCHAR(45),

    expires_at TIMESTAMPTZ NOT NULL,
    revoked_at TIMESTAMPTZ,

    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_sessions_expiry CHECK (expires_at > created_at)
);

-- Token lookup only ever targets live sessions
CREATE UNIQUE INDEX idx_sessions_token_hash ON sessions(refresh_token_hash)
    WHERE revoked_at IS NULL;

CREATE INDEX idx_sessions_account ON sessions(account_id)
    WHERE revoked_at IS NULL;

CREATE INDEX idx_sessions_expires ON sessions(expires_at)
    WHERE revoked_at IS NULL;
";

const DROP_SESSIONS_SQL: &str = r"
DROP TABLE IF EXISTS sessions CASCADE;
";
