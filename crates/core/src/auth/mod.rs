//! Authentication primitives.
//!
//! This module provides password hashing and verification with Argon2id.
//! Session tokens live in `aurum-shared`; KYC gating lives in `ledger`.

mod password;

pub use password::{PasswordError, hash_password, verify_password};
