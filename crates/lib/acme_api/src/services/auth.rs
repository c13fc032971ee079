//! Authentication service: sign-in and session flows delegating to `acme_core::auth`.

use acme_core::auth::{UserStore, authorize, jwt};
use serde_json::Value;
use tracing::info;

use crate::config::ApiConfig;
use crate::error::{AppError, AppResult};
use crate::models::SessionResponse;

pub use acme_core::auth::jwt::verify_session_token;
pub use acme_core::models::auth::SessionClaims;

/// A freshly issued session: the signed token plus its client view.
#[derive(Debug, Clone)]
pub struct SignedSession {
    pub token: String,
    pub session: SessionResponse,
}

/// Authorize a credentials payload and issue a session token.
///
/// Every rejection collapses into the same `Unauthorized("Invalid credentials")`.
/// A failed user lookup is surfaced as its own error.
pub async fn sign_in(
    users: &dyn UserStore,
    payload: &Value,
    config: &ApiConfig,
) -> AppResult<SignedSession> {
    let user = authorize(users, payload)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    let (token, claims) = jwt::issue_session_token(
        &user,
        config.auth_secret.as_bytes(),
        config.session_max_age_secs,
    )?;

    info!(user_id = %user.id, "signed in");
    Ok(SignedSession {
        token,
        session: SessionResponse::from_user(&user, &claims),
    })
}

/// Resolve the session carried by a token, if it is valid and unexpired.
pub fn current_session(token: Option<&str>, config: &ApiConfig) -> Option<SessionClaims> {
    token.and_then(|t| verify_session_token(t, config.auth_secret.as_bytes()))
}
