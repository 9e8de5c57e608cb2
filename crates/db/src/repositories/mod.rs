//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod account;
pub mod session;
pub mod transaction;
pub mod wallet;

pub use account::AccountRepository;
pub use session::SessionRepository;
pub use transaction::{TransactionLogError, TransactionPage, TransactionRepository};
pub use wallet::{WalletBalances, WalletError, WalletRepository};
