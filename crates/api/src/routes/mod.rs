//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod auth;
pub mod health;
pub mod kyc;
pub mod wallet;

/// Creates the API router with public and protected routes.
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(auth::session_routes())
        .merge(wallet::routes())
        .layer(middleware::from_fn_with_state(state, auth_middleware));

    // Combine public and protected routes
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(kyc::routes())
        .merge(protected_routes)
}
