//! Sign-in password comparison.
//!
//! Stored hashes in `users.password` are bcrypt strings written by whoever
//! provisions accounts; this crate only ever compares against them.

use super::AuthError;

/// Compare a submitted password with a user's stored bcrypt hash.
///
/// `Ok(false)` is a mismatch. `Err` means the stored value is not a usable
/// bcrypt hash at all.
pub fn verify_password(submitted: &str, stored_hash: &str) -> Result<bool, AuthError> {
    bcrypt::verify(submitted, stored_hash)
        .map_err(|e| AuthError::Internal(format!("unusable stored password hash: {e}")))
}

/// [`verify_password`] on tokio's blocking pool; bcrypt at production cost
/// takes tens of milliseconds per call.
pub async fn verify_password_blocking(
    submitted: String,
    stored_hash: String,
) -> Result<bool, AuthError> {
    let comparison =
        tokio::task::spawn_blocking(move || verify_password(&submitted, &stored_hash));
    match comparison.await {
        Ok(outcome) => outcome,
        Err(join) => Err(AuthError::Internal(format!(
            "password comparison task failed: {join}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(password: &str) -> String {
        bcrypt::hash(password, 4).unwrap()
    }

    #[test]
    fn submitted_password_is_compared_to_stored_hash() {
        let hash = stored("123456");
        assert!(verify_password("123456", &hash).unwrap());
        assert!(!verify_password("654321", &hash).unwrap());
        assert!(!verify_password("", &hash).unwrap());
    }

    #[test]
    fn plaintext_in_hash_column_is_an_error() {
        assert!(matches!(
            verify_password("123456", "123456"),
            Err(AuthError::Internal(_))
        ));
    }

    #[tokio::test]
    async fn blocking_pool_gives_same_answer() {
        let hash = stored("123456");
        assert!(
            verify_password_blocking("123456".into(), hash.clone())
                .await
                .unwrap()
        );
        assert!(!verify_password_blocking("1234567".into(), hash).await.unwrap());
    }
}
