//! `SeaORM` entity definitions.

pub mod accounts;
pub mod sea_orm_active_enums;
pub mod sessions;
pub mod transactions;
pub mod wallets;
