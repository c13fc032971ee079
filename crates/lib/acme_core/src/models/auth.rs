//! Authentication domain models.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A row of the `users` table.
///
/// `password` is the stored bcrypt hash. It is skipped when the user is
/// serialized and redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password: String,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Claims embedded in the signed session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user ID).
    pub sub: String,
    pub email: String,
    pub name: String,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiry (unix timestamp).
    pub exp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> User {
        User {
            id: Uuid::nil(),
            name: "User".into(),
            email: "user@nextmail.com".into(),
            password: "$2b$10$hash".into(),
        }
    }

    #[test]
    fn serialized_user_omits_password_hash() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["email"], "user@nextmail.com");
        assert!(json.get("password").is_none());
    }

    #[test]
    fn debug_output_redacts_password_hash() {
        let out = format!("{:?}", sample());
        assert!(!out.contains("$2b$10$hash"));
        assert!(out.contains("<redacted>"));
    }
}
