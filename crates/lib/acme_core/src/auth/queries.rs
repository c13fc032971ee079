//! Auth-related database queries.

use sqlx::PgPool;
use tracing::error;

use super::AuthError;
use crate::models::auth::User;

/// Fetch a user by exact email match.
///
/// A query failure is logged and surfaced as [`AuthError::Fetch`].
pub async fn get_user(pool: &PgPool, email: &str) -> Result<Option<User>, AuthError> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            error!("Failed to fetch user: {e}");
            AuthError::Fetch(e)
        })
}

/// Round-trip a trivial query to check connectivity.
pub async fn ping(pool: &PgPool) -> bool {
    sqlx::query("SELECT 1").execute(pool).await.is_ok()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use sqlx::postgres::PgPoolOptions;

    use super::*;

    /// Pool pointed at a port nothing listens on.
    fn unreachable_pool() -> PgPool {
        PgPoolOptions::new()
            .acquire_timeout(Duration::from_secs(2))
            .connect_lazy("postgres://acme@127.0.0.1:1/acme")
            .expect("lazy pool")
    }

    #[tokio::test]
    async fn unreachable_database_is_a_fetch_error() {
        let pool = unreachable_pool();
        let err = get_user(&pool, "user@nextmail.com").await.unwrap_err();
        assert!(matches!(err, AuthError::Fetch(_)));
        assert_eq!(err.to_string(), "Failed to fetch user.");
    }

    #[tokio::test]
    async fn ping_reports_unreachable_database() {
        assert!(!ping(&unreachable_pool()).await);
    }
}
