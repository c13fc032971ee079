//! Dashboard session tokens.
//!
//! After a successful sign-in the user's public fields are signed into an
//! HS256 JWT that travels in the session cookie. There is no server-side
//! session table.

use std::path::{Path, PathBuf};

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use tracing::{debug, info};

use super::AuthError;
use crate::models::auth::{SessionClaims, User};

/// Default session lifetime: 30 days.
pub const DEFAULT_SESSION_MAX_AGE_SECS: i64 = 30 * 24 * 60 * 60;

/// Seconds of clock skew tolerated when checking `exp`.
const EXPIRY_LEEWAY_SECS: u64 = 60;

/// Sign the session cookie value for a user `authorize` accepted.
///
/// The claims carry only what the dashboard displays (id, name, email); the
/// stored password hash never leaves the database row.
pub fn issue_session_token(
    user: &User,
    secret: &[u8],
    max_age_secs: i64,
) -> Result<(String, SessionClaims), AuthError> {
    let issued_at = Utc::now();
    let expires_at = issued_at + Duration::seconds(max_age_secs);
    let claims = SessionClaims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        name: user.name.clone(),
        iat: issued_at.timestamp(),
        exp: expires_at.timestamp(),
    };

    let header = Header::new(Algorithm::HS256);
    match encode(&header, &claims, &EncodingKey::from_secret(secret)) {
        Ok(token) => Ok((token, claims)),
        Err(e) => Err(AuthError::TokenError(format!("signing session token: {e}"))),
    }
}

/// Read back a session cookie value.
///
/// `None` covers every reason a cookie does not count as a session: bad
/// signature, another secret, expiry, or a token without a subject.
pub fn verify_session_token(token: &str, secret: &[u8]) -> Option<SessionClaims> {
    let mut rules = Validation::new(Algorithm::HS256);
    rules.leeway = EXPIRY_LEEWAY_SECS;
    rules.set_required_spec_claims(&["exp", "sub"]);

    match decode::<SessionClaims>(token, &DecodingKey::from_secret(secret), &rules) {
        Ok(data) => Some(data.claims),
        Err(e) => {
            debug!("session token rejected: {e}");
            None
        }
    }
}

/// Resolve the signing secret: env var `AUTH_SECRET` → `JWT_SECRET` → persisted file.
pub fn resolve_auth_secret() -> String {
    for var in ["AUTH_SECRET", "JWT_SECRET"] {
        if let Ok(secret) = std::env::var(var)
            && !secret.is_empty()
        {
            return secret;
        }
    }
    load_or_generate_secret(&auth_secret_path())
}

/// Read the secret stored at `path`, generating and persisting one if absent.
pub fn load_or_generate_secret(path: &Path) -> String {
    if let Ok(existing) = std::fs::read_to_string(path) {
        let trimmed = existing.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    let secret: String = rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect();
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let _ = std::fs::write(path, &secret);
    info!(path = %path.display(), "generated new auth secret");
    secret
}

/// Path to the persisted auth secret file.
fn auth_secret_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("acme")
        .join("auth-secret")
}
