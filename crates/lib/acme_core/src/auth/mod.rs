//! Credentials authentication.
//!
//! Schema validation of the submitted payload, user lookup by email, bcrypt
//! comparison and session token issuance. Shared by `acme_api` and the server
//! binary.

pub mod authorize;
pub mod credentials;
pub mod jwt;
pub mod password;
pub mod queries;
pub mod store;

use thiserror::Error;

pub use authorize::authorize;
pub use credentials::{Credentials, CredentialsError, parse_credentials};
pub use store::{InMemoryUserStore, PgUserStore, UserStore};

/// Authentication errors.
///
/// A rejected sign-in is not an error: `authorize` reports it as `Ok(None)`.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Failed to fetch user.")]
    Fetch(#[source] sqlx::Error),

    #[error("Token error: {0}")]
    TokenError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
