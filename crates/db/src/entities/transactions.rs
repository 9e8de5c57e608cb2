//! `SeaORM` Entity for transactions table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{TransactionKind, TransactionStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub account_id: Uuid,
    pub kind: TransactionKind,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub cash_delta: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 8)))")]
    pub gold_delta: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))", nullable)]
    pub unit_price: Option<Decimal>,
    pub status: TransactionStatus,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id"
    )]
    Accounts,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
