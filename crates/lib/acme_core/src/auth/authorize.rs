//! The credentials `authorize` step.

use serde_json::Value;
use tracing::{debug, info, warn};

use super::password::verify_password_blocking;
use super::{AuthError, UserStore, parse_credentials};
use crate::models::auth::User;

/// Authorize an untyped credentials payload.
///
/// Returns `Ok(Some(user))` when the payload is well formed, the email exists
/// and the password matches the stored bcrypt hash. Every other outcome is
/// `Ok(None)` with the same log line, so callers cannot tell a malformed
/// payload from an unknown user or a wrong password. Only a failed lookup is
/// an `Err`.
pub async fn authorize(store: &dyn UserStore, payload: &Value) -> Result<Option<User>, AuthError> {
    let parsed = parse_credentials(payload);
    if let Err(err) = &parsed {
        debug!(issues = %err, "credentials payload failed validation");
    }

    if let Ok(credentials) = parsed
        && let Some(user) = store.find_by_email(&credentials.email).await?
        && password_matches(credentials.password, &user).await
    {
        return Ok(Some(user));
    }

    info!("Invalid credentials");
    Ok(None)
}

/// bcrypt comparison; an unusable stored hash counts as a mismatch.
async fn password_matches(password: String, user: &User) -> bool {
    match verify_password_blocking(password, user.password.clone()).await {
        Ok(matches) => matches,
        Err(e) => {
            warn!(user_id = %user.id, "stored password hash unusable: {e}");
            false
        }
    }
}
