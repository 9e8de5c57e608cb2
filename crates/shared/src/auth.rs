//! Authentication types for JWT and tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims for session tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account ID).
    pub sub: Uuid,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for an account.
    #[must_use]
    pub fn new(account_id: Uuid, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: account_id,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the account ID from claims.
    #[must_use]
    pub const fn account_id(&self) -> Uuid {
        self.sub
    }
}

/// Claims carried in a KYC provider callback token.
///
/// The provider signs these with the shared webhook secret; the API
/// verifies the signature before any status transition is applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KycCallbackClaims {
    /// Subject (account ID the decision applies to).
    pub sub: Uuid,
    /// Decided verification status (`approved`, `rejected`, `pending`).
    pub status: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// Registration request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
    /// Account holder's full name.
    pub full_name: String,
}

/// Login response payload.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Authenticated account info.
    pub account: AccountInfo,
    /// Access token.
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
    /// Token expiration in seconds.
    pub expires_in: i64,
}

/// Account info returned in auth responses.
#[derive(Debug, Clone, Serialize)]
pub struct AccountInfo {
    /// Account ID.
    pub id: Uuid,
    /// Account email.
    pub email: String,
    /// Account holder's full name.
    pub full_name: String,
    /// Current verification status.
    pub kyc_status: String,
}

/// Refresh token request.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    /// The refresh token.
    pub refresh_token: String,
}

/// Logout request.
#[derive(Debug, Clone, Deserialize)]
pub struct LogoutRequest {
    /// The refresh token to invalidate.
    pub refresh_token: String,
}
