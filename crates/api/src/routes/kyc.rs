//! KYC verification callback route.
//!
//! The verification provider reports decisions by POSTing a compact JWS
//! signed with the shared webhook secret. Only payloads that verify are
//! ever applied; everything else is rejected with 401 and the account's
//! status stays untouched.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde_json::json;
use tracing::{error, info, warn};

use crate::AppState;
use aurum_db::AccountRepository;
use aurum_db::entities::sea_orm_active_enums::KycStatus;
use aurum_shared::auth::KycCallbackClaims;

/// Creates the KYC callback routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/kyc/callback", post(callback))
}

/// POST /kyc/callback - Apply a signed verification decision.
async fn callback(State(state): State<AppState>, body: String) -> impl IntoResponse {
    // Reject anything the webhook secret did not sign
    let claims = match decode_callback_token(body.trim(), state.kyc_webhook_secret.as_bytes()) {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "Rejected KYC callback with unverifiable signature");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "invalid_signature",
                    "message": "Callback signature could not be verified"
                })),
            )
                .into_response();
        }
    };

    let Some(status) = parse_status(&claims.status) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_status",
                "message": format!("Unknown verification status: {}", claims.status)
            })),
        )
            .into_response();
    };

    let account_repo = AccountRepository::new((*state.db).clone());
    match account_repo.update_kyc_status(claims.sub, status).await {
        Ok(Some(account)) => {
            info!(
                account_id = %account.id,
                kyc_status = %claims.status,
                "Verification status updated"
            );
            (
                StatusCode::OK,
                Json(json!({
                    "account_id": account.id,
                    "kyc_status": claims.status
                })),
            )
                .into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "account_not_found",
                "message": "Account not found"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, account_id = %claims.sub, "Failed to update verification status");
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

/// Verifies and decodes a callback token against the webhook secret.
fn decode_callback_token(
    token: &str,
    secret: &[u8],
) -> Result<KycCallbackClaims, jsonwebtoken::errors::Error> {
    decode::<KycCallbackClaims>(
        token,
        &DecodingKey::from_secret(secret),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

/// Parses a provider decision into a status the ledger understands.
///
/// Providers only ever report decisions; `unverified` is the pre-submission
/// state and is not accepted from the callback.
fn parse_status(s: &str) -> Option<KycStatus> {
    match s {
        "pending" => Some(KycStatus::Pending),
        "approved" => Some(KycStatus::Approved),
        "rejected" => Some(KycStatus::Rejected),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header, encode};
    use uuid::Uuid;

    const SECRET: &[u8] = b"webhook-test-secret";

    fn sign_callback(claims: &KycCallbackClaims, secret: &[u8]) -> String {
        encode(&Header::default(), claims, &EncodingKey::from_secret(secret)).unwrap()
    }

    fn test_claims(status: &str) -> KycCallbackClaims {
        let now = Utc::now();
        KycCallbackClaims {
            sub: Uuid::new_v4(),
            status: status.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(5)).timestamp(),
        }
    }

    #[test]
    fn test_valid_callback_token_decodes() {
        let claims = test_claims("approved");
        let token = sign_callback(&claims, SECRET);

        let decoded = decode_callback_token(&token, SECRET).unwrap();
        assert_eq!(decoded.sub, claims.sub);
        assert_eq!(decoded.status, "approved");
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = sign_callback(&test_claims("approved"), b"some-other-secret");
        assert!(decode_callback_token(&token, SECRET).is_err());
    }

    #[test]
    fn test_expired_callback_is_rejected() {
        let now = Utc::now();
        let claims = KycCallbackClaims {
            sub: Uuid::new_v4(),
            status: "approved".to_string(),
            iat: (now - Duration::hours(2)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
        };
        let token = sign_callback(&claims, SECRET);

        assert!(decode_callback_token(&token, SECRET).is_err());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(decode_callback_token("not-a-jws", SECRET).is_err());
        assert!(decode_callback_token("", SECRET).is_err());
    }

    #[test]
    fn test_parse_status_accepts_decisions_only() {
        assert_eq!(parse_status("pending"), Some(KycStatus::Pending));
        assert_eq!(parse_status("approved"), Some(KycStatus::Approved));
        assert_eq!(parse_status("rejected"), Some(KycStatus::Rejected));
        assert_eq!(parse_status("unverified"), None);
        assert_eq!(parse_status("APPROVED"), None);
        assert_eq!(parse_status(""), None);
    }
}
