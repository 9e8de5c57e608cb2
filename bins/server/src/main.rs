//! Aurum API Server
//!
//! Main entry point for the Aurum backend service.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aurum_api::{AppState, create_router};
use aurum_core::pricing::{FixedPriceFeed, HttpPriceFeed, PriceSource};
use aurum_db::{TransactionEngine, connect_with};
use aurum_shared::{AppConfig, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aurum=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Connect to database
    let db = connect_with(&config.database).await?;
    info!("Connected to database");

    // Create JWT service
    let jwt_config = JwtConfig {
        secret: config.jwt.secret.clone(),
        #[allow(clippy::cast_possible_wrap)]
        access_token_expires_minutes: (config.jwt.access_token_expiry_secs / 60) as i64,
        #[allow(clippy::cast_possible_wrap)]
        refresh_token_expires_days: (config.jwt.refresh_token_expiry_secs / 86400) as i64,
    };
    let jwt_service = JwtService::new(jwt_config);

    // Pick the gold price source: live feed when configured, fixed dev
    // price otherwise
    let prices: Arc<dyn PriceSource> = match &config.pricing.feed_url {
        Some(url) => {
            info!(feed_url = %url, "Using HTTP gold price feed");
            Arc::new(HttpPriceFeed::new(
                url.clone(),
                Duration::from_secs(config.pricing.request_timeout_secs),
            )?)
        }
        None => {
            info!(fixed_price = %config.pricing.fixed_price, "Using fixed gold price feed");
            Arc::new(FixedPriceFeed::new(config.pricing.fixed_price))
        }
    };

    // Create the transaction engine
    let engine = TransactionEngine::new(db.clone(), prices);

    // Create application state
    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt_service),
        engine,
        kyc_webhook_secret: Arc::new(config.kyc.webhook_secret.clone()),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
