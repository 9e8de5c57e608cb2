//! Database layer with `SeaORM` entities, repositories, and the transaction engine.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access
//! - The atomic transaction engine for wallet operations
//! - Database migrations

pub mod engine;
pub mod entities;
pub mod migration;
pub mod repositories;

pub use engine::{OperationReceipt, ReplayReport, TransactionEngine};
pub use repositories::{
    AccountRepository, SessionRepository, TransactionRepository, WalletBalances, WalletRepository,
};

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

use aurum_shared::config::DatabaseConfig;

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Establishes a connection with pool sizing and timeouts from configuration.
///
/// The acquire timeout bounds how long an operation waits for a pooled
/// connection before failing with a retryable store error.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect_with(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs));

    Database::connect(options).await
}
