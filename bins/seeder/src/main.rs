//! Database seeder for Aurum development and testing.
//!
//! Seeds a demo account with approved verification, both wallets, and a
//! short trading history for local development.
//!
//! Usage: cargo run --bin seeder

use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect, Set,
};
use uuid::Uuid;

use aurum_core::auth::hash_password;
use aurum_core::pricing::FixedPriceFeed;
use aurum_db::entities::{accounts, sea_orm_active_enums::KycStatus, transactions};
use aurum_db::{TransactionEngine, WalletRepository};

/// Demo account ID (consistent for all seeds)
const DEMO_ACCOUNT_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Demo account password, usable for local logins.
const DEMO_PASSWORD: &str = "password123";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = aurum_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding demo account...");
    seed_demo_account(&db).await;

    println!("Seeding demo trading history...");
    seed_demo_activity(&db).await;

    println!("Seeding complete!");
}

fn demo_account_id() -> Uuid {
    Uuid::parse_str(DEMO_ACCOUNT_ID).unwrap()
}

/// Seeds an approved demo account with empty wallets.
async fn seed_demo_account(db: &DatabaseConnection) {
    // Check if the account already exists
    if accounts::Entity::find_by_id(demo_account_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Demo account already exists, skipping...");
        return;
    }

    let password_hash = hash_password(DEMO_PASSWORD).expect("Failed to hash demo password");

    let account = accounts::ActiveModel {
        id: Set(demo_account_id()),
        email: Set("demo@aurum.dev".to_string()),
        password_hash: Set(password_hash),
        full_name: Set("Demo Account".to_string()),
        kyc_status: Set(KycStatus::Approved),
        kyc_updated_at: Set(Some(Utc::now().into())),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    };

    if let Err(e) = account.insert(db).await {
        eprintln!("Failed to insert demo account: {e}");
        return;
    }
    println!("  Created demo account: demo@aurum.dev (password: {DEMO_PASSWORD})");

    let wallets = WalletRepository::new(db.clone());
    if let Err(e) = wallets.ensure(db, demo_account_id()).await {
        eprintln!("Failed to create demo wallets: {e}");
    } else {
        println!("  Created cash and gold wallets");
    }
}

/// Seeds a short trading history through the transaction engine.
async fn seed_demo_activity(db: &DatabaseConnection) {
    let has_history = transactions::Entity::find()
        .filter(transactions::Column::AccountId.eq(demo_account_id()))
        .limit(1)
        .all(db)
        .await
        .ok()
        .is_some_and(|rows| !rows.is_empty());

    if has_history {
        println!("  Demo account already has history, skipping...");
        return;
    }

    // Trades pin whatever the feed quotes at execution; two feeds make the
    // seeded history show a price move between the buy and the sell
    let buy_price = Decimal::from_str("2000.00").unwrap();
    let sell_price = Decimal::from_str("2031.50").unwrap();
    let buy_engine = TransactionEngine::new(db.clone(), Arc::new(FixedPriceFeed::new(buy_price)));
    let sell_engine = TransactionEngine::new(db.clone(), Arc::new(FixedPriceFeed::new(sell_price)));

    let account_id = demo_account_id();

    if let Err(e) = buy_engine
        .deposit(account_id, Decimal::from_str("10000.00").unwrap())
        .await
    {
        eprintln!("Failed to seed deposit: {e}");
        return;
    }
    println!("  Deposited 10000.00 cash");

    if let Err(e) = buy_engine
        .buy(account_id, Decimal::from_str("1.25").unwrap())
        .await
    {
        eprintln!("Failed to seed gold purchase: {e}");
        return;
    }
    println!("  Bought 1.25 oz gold at {buy_price}");

    if let Err(e) = sell_engine
        .sell(account_id, Decimal::from_str("0.50").unwrap())
        .await
    {
        eprintln!("Failed to seed gold sale: {e}");
        return;
    }
    println!("  Sold 0.50 oz gold at {sell_price}");

    if let Err(e) = sell_engine
        .withdraw(account_id, Decimal::from_str("250.00").unwrap())
        .await
    {
        eprintln!("Failed to seed withdrawal: {e}");
        return;
    }
    println!("  Withdrew 250.00 cash");
}
