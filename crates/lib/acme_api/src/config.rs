//! API server configuration.

use acme_core::auth::jwt::{DEFAULT_SESSION_MAX_AGE_SECS, resolve_auth_secret};

/// Configuration for the API server.
#[derive(Clone)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:3100").
    pub bind_addr: String,
    /// Session token signing secret.
    pub auth_secret: String,
    /// Session lifetime in seconds (token expiry and cookie max-age).
    pub session_max_age_secs: i64,
    /// Mark the session cookie `Secure`.
    pub secure_cookies: bool,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("bind_addr", &self.bind_addr)
            .field("auth_secret", &"<redacted>")
            .field("session_max_age_secs", &self.session_max_age_secs)
            .field("secure_cookies", &self.secure_cookies)
            .finish()
    }
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable               | Default                              |
    /// |------------------------|--------------------------------------|
    /// | `BIND_ADDR`            | `127.0.0.1:3100`                     |
    /// | `AUTH_SECRET` / `JWT_SECRET` | generated & persisted to file  |
    /// | `SESSION_MAX_AGE_SECS` | `2592000` (30 days)                  |
    /// | `SECURE_COOKIES`       | `false`                              |
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3100".into()),
            auth_secret: resolve_auth_secret(),
            session_max_age_secs: std::env::var("SESSION_MAX_AGE_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_SESSION_MAX_AGE_SECS),
            secure_cookies: std::env::var("SECURE_COOKIES")
                .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        }
    }

    /// Fixed configuration for tests.
    pub fn for_tests(auth_secret: &str) -> Self {
        Self {
            bind_addr: "127.0.0.1:0".into(),
            auth_secret: auth_secret.into(),
            session_max_age_secs: DEFAULT_SESSION_MAX_AGE_SECS,
            secure_cookies: false,
        }
    }
}
