//! Authentication routes for registration, login, token refresh, and logout.

use std::net::SocketAddr;

use axum::{
    Json, Router,
    extract::{ConnectInfo, State},
    http::{StatusCode, header::USER_AGENT},
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{Duration, Utc};
use serde_json::json;
use tracing::{error, info};

use crate::{AppState, middleware::AuthUser};
use aurum_core::auth::{hash_password, verify_password};
use aurum_db::entities::sea_orm_active_enums::KycStatus;
use aurum_db::{AccountRepository, SessionRepository, WalletRepository};
use aurum_shared::auth::{
    AccountInfo, LoginRequest, LoginResponse, LogoutRequest, RefreshRequest, RegisterRequest,
};

/// Creates the public auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
}

/// Creates the auth routes that require an authenticated session.
pub fn session_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(me))
}

/// POST /auth/register - Create a new account with empty wallets.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> impl IntoResponse {
    let account_repo = AccountRepository::new((*state.db).clone());

    // Check if email already exists
    match account_repo.email_exists(&payload.email).await {
        Ok(true) => {
            return (
                StatusCode::CONFLICT,
                Json(json!({
                    "error": "email_exists",
                    "message": "An account with this email already exists"
                })),
            )
                .into_response();
        }
        Ok(false) => {}
        Err(e) => {
            error!(error = %e, "Database error checking email");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred during registration"
                })),
            )
                .into_response();
        }
    }

    // Hash password
    let password_hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "Failed to hash password");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred during registration"
                })),
            )
                .into_response();
        }
    };

    // Create account; it starts unverified and cannot move money yet
    let account = match account_repo
        .create(&payload.email, &password_hash, &payload.full_name)
        .await
    {
        Ok(a) => a,
        Err(e) => {
            error!(error = %e, "Failed to create account");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred during registration"
                })),
            )
                .into_response();
        }
    };

    // Both wallets exist from signup onward; the engine would also create
    // them lazily on the first operation
    let wallet_repo = WalletRepository::new((*state.db).clone());
    if let Err(e) = wallet_repo.ensure(&*state.db, account.id).await {
        error!(error = %e, account_id = %account.id, "Failed to create wallets");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "internal_error",
                "message": "An error occurred during registration"
            })),
        )
            .into_response();
    }

    info!(account_id = %account.id, email = %account.email, "New account registered");

    (
        StatusCode::CREATED,
        Json(json!({
            "account": {
                "id": account.id,
                "email": account.email,
                "full_name": account.full_name,
                "kyc_status": kyc_status_to_string(&account.kyc_status)
            },
            "message": "Registration successful. Complete identity verification to start trading."
        })),
    )
        .into_response()
}

/// POST /auth/login - Authenticate an account and return tokens.
async fn login(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: axum::http::HeaderMap,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let account_repo = AccountRepository::new((*state.db).clone());

    // Find account by email
    let account = match account_repo.find_by_email(&payload.email).await {
        Ok(Some(a)) => a,
        Ok(None) => {
            info!(email = %payload.email, "Login attempt for non-existent account");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "invalid_credentials",
                    "message": "Invalid email or password"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Database error during login");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred during login"
                })),
            )
                .into_response();
        }
    };

    // Check if account is active
    if !account.is_active {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "account_disabled",
                "message": "This account has been disabled"
            })),
        )
            .into_response();
    }

    // Verify password
    match verify_password(&payload.password, &account.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(account_id = %account.id, "Failed login attempt - invalid password");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "invalid_credentials",
                    "message": "Invalid email or password"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred during login"
                })),
            )
                .into_response();
        }
    }

    // Generate tokens
    let access_token = match state.jwt_service.generate_access_token(account.id) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate access token");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred during login"
                })),
            )
                .into_response();
        }
    };

    let refresh_token = match state.jwt_service.generate_refresh_token(account.id) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate refresh token");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred during login"
                })),
            )
                .into_response();
        }
    };

    // Store the session so refresh tokens can be revoked server-side
    let session_repo = SessionRepository::new((*state.db).clone());
    let expires_at = Utc::now() + Duration::days(state.jwt_service.refresh_token_expires_days());
    let user_agent = headers.get(USER_AGENT).and_then(|v| v.to_str().ok());
    if let Err(e) = session_repo
        .create(
            account.id,
            &refresh_token,
            expires_at,
            user_agent,
            Some(&addr.ip().to_string()),
        )
        .await
    {
        error!(error = %e, account_id = %account.id, "Failed to create session");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "internal_error",
                "message": "An error occurred during login"
            })),
        )
            .into_response();
    }

    info!(account_id = %account.id, "Account logged in successfully");

    let response = LoginResponse {
        account: AccountInfo {
            id: account.id,
            email: account.email,
            full_name: account.full_name,
            kyc_status: kyc_status_to_string(&account.kyc_status),
        },
        access_token,
        refresh_token,
        expires_in: state.jwt_service.access_token_expires_in(),
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// POST /auth/refresh - Issue a new access token from a live refresh token.
async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> impl IntoResponse {
    // Validate refresh token signature and expiry
    let claims = match state.jwt_service.validate_token(&payload.refresh_token) {
        Ok(c) => c,
        Err(e) => {
            let (error, message) = match e {
                aurum_shared::JwtError::Expired => ("token_expired", "Refresh token has expired"),
                _ => ("invalid_token", "Invalid refresh token"),
            };
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": error, "message": message })),
            )
                .into_response();
        }
    };

    // The token must still map to a live, unrevoked session
    let session_repo = SessionRepository::new((*state.db).clone());
    let session = match session_repo.find_by_token(&payload.refresh_token).await {
        Ok(Some(s)) => s,
        Ok(None) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "session_revoked",
                    "message": "Session has been revoked, please log in again"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Database error during token refresh");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred during token refresh"
                })),
            )
                .into_response();
        }
    };

    if session.expires_at < Utc::now() {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "session_expired",
                "message": "Session has expired, please log in again"
            })),
        )
            .into_response();
    }

    // Generate new access token
    let access_token = match state.jwt_service.generate_access_token(claims.account_id()) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate access token");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred during token refresh"
                })),
            )
                .into_response();
        }
    };

    (
        StatusCode::OK,
        Json(json!({
            "access_token": access_token,
            "expires_in": state.jwt_service.access_token_expires_in()
        })),
    )
        .into_response()
}

/// POST /auth/logout - Revoke the session behind a refresh token.
async fn logout(
    State(state): State<AppState>,
    Json(payload): Json<LogoutRequest>,
) -> impl IntoResponse {
    let session_repo = SessionRepository::new((*state.db).clone());

    match session_repo.revoke_by_token(&payload.refresh_token).await {
        // Revoking an unknown or already-revoked token is a no-op
        Ok(_) => (
            StatusCode::OK,
            Json(json!({ "message": "Logged out successfully" })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Database error during logout");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred during logout"
                })),
            )
                .into_response()
        }
    }
}

/// GET /auth/me - Return the authenticated account's profile.
async fn me(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let account_repo = AccountRepository::new((*state.db).clone());

    match account_repo.find_by_id(auth.account_id()).await {
        Ok(Some(account)) => (
            StatusCode::OK,
            Json(json!({
                "id": account.id,
                "email": account.email,
                "full_name": account.full_name,
                "kyc_status": kyc_status_to_string(&account.kyc_status),
                "is_active": account.is_active,
                "created_at": account.created_at.to_rfc3339()
            })),
        )
            .into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "account_not_found",
                "message": "Account not found"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Database error loading account profile");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred"
                })),
            )
                .into_response()
        }
    }
}

/// Converts the `KycStatus` enum to its API string.
fn kyc_status_to_string(status: &KycStatus) -> String {
    match status {
        KycStatus::Unverified => "unverified".to_string(),
        KycStatus::Pending => "pending".to_string(),
        KycStatus::Approved => "approved".to_string(),
        KycStatus::Rejected => "rejected".to_string(),
    }
}
