//! Request/response bodies of the HTTP API (camelCase on the wire).

use acme_core::models::auth::{SessionClaims, User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Error body returned for every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// The signed-in user as exposed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// An active session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user: SessionUser,
    pub expires: DateTime<Utc>,
}

impl SessionResponse {
    pub fn from_user(user: &User, claims: &SessionClaims) -> Self {
        Self {
            user: SessionUser {
                id: user.id.to_string(),
                name: user.name.clone(),
                email: user.email.clone(),
            },
            expires: expiry(claims),
        }
    }
}

impl From<SessionClaims> for SessionResponse {
    fn from(claims: SessionClaims) -> Self {
        let expires = expiry(&claims);
        Self {
            user: SessionUser {
                id: claims.sub,
                name: claims.name,
                email: claims.email,
            },
            expires,
        }
    }
}

fn expiry(claims: &SessionClaims) -> DateTime<Utc> {
    DateTime::from_timestamp(claims.exp, 0).unwrap_or_default()
}

/// Result of `POST /api/auth/signout`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignOutResponse {
    pub success: bool,
}

/// Result of `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub db_connected: bool,
}
