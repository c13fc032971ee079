//! Authentication request handlers.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Extension, State};
use axum_extra::extract::cookie::CookieJar;
use serde_json::Value;

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{SessionResponse, SignOutResponse};
use crate::services::{auth, cookies};

/// `POST /api/auth/callback/credentials`: sign in with email + password.
///
/// The body is read raw: a body that is not JSON is validated as `null` and
/// rejected like any other malformed payload.
pub async fn sign_in_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Bytes,
) -> AppResult<(CookieJar, Json<SessionResponse>)> {
    let payload: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    let signed = auth::sign_in(state.users.as_ref(), &payload, &state.config).await?;

    let cookie = cookies::session_cookie(
        &signed.token,
        state.config.session_max_age_secs,
        state.config.secure_cookies,
    );
    Ok((jar.add(cookie), Json(signed.session)))
}

/// `POST /api/auth/signout`: clear the session cookie.
pub async fn sign_out_handler(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<SignOutResponse>) {
    let jar = jar.add(cookies::clear_session_cookie(state.config.secure_cookies));
    (jar, Json(SignOutResponse { success: true }))
}

/// `GET /api/auth/session`: the current session, or `null`.
pub async fn session_handler(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Json<Option<SessionResponse>> {
    let claims = auth::current_session(cookies::session_token(&jar), &state.config);
    Json(claims.map(SessionResponse::from))
}

/// `GET /api/auth/me`: the signed-in user. Requires authentication.
pub async fn me_handler(
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
) -> Json<SessionResponse> {
    Json(SessionResponse::from(claims))
}
