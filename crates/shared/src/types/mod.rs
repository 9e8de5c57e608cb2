//! Common types used across the application.

pub mod amount;
pub mod pagination;

pub use amount::{AmountError, WalletKind, validate_amount};
pub use pagination::{CursorPage, CursorRequest, MAX_PAGE_LIMIT};
