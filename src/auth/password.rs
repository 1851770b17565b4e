//! Password hashing via bcrypt.

use std::sync::LazyLock;

use super::AuthError;

/// bcrypt cost factor.
#[cfg(not(test))]
const BCRYPT_COST: u32 = bcrypt::DEFAULT_COST;

// Lowest cost bcrypt accepts. Keeps the test suite fast; the digest format is identical.
#[cfg(test)]
const BCRYPT_COST: u32 = 4;

/// Digest checked against when no account matches, so an unknown email
/// costs as much bcrypt work as a wrong password.
static DUMMY_DIGEST: LazyLock<Option<String>> =
    LazyLock::new(|| bcrypt::hash("cartrack-no-such-account", BCRYPT_COST).ok());

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    bcrypt::hash(password, BCRYPT_COST)
        .map_err(|e| AuthError::Internal(format!("bcrypt hash: {e}")))
}

/// Verify a password against a stored bcrypt digest.
///
/// A mismatch is `Ok(false)`. A digest that cannot be parsed is an error,
/// since it means the stored credential record is corrupt.
pub fn verify_password(password: &str, digest: &str) -> Result<bool, AuthError> {
    bcrypt::verify(password, digest).map_err(|e| AuthError::Internal(format!("bcrypt verify: {e}")))
}

/// Check a presented password against a stored digest.
///
/// A mismatch is `AuthError::InvalidCredentials`.
pub fn check_password(password: &str, digest: &str) -> Result<(), AuthError> {
    if verify_password(password, digest)? {
        Ok(())
    } else {
        Err(AuthError::InvalidCredentials)
    }
}

/// Spend one bcrypt verification on a password that has no account.
///
/// Always fails with `AuthError::InvalidCredentials`.
pub fn reject_unknown_account(password: &str) -> AuthError {
    if let Some(digest) = DUMMY_DIGEST.as_deref() {
        let _ = bcrypt::verify(password, digest);
    }
    AuthError::InvalidCredentials
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_accepts_the_hashed_password() {
        let digest = hash_password("secret1").unwrap();
        assert!(verify_password("secret1", &digest).unwrap());
    }

    #[test]
    fn verify_rejects_a_different_password() {
        let digest = hash_password("secret1").unwrap();
        assert!(!verify_password("secret2", &digest).unwrap());
        assert!(!verify_password("", &digest).unwrap());
    }

    #[test]
    fn same_password_hashes_differently() {
        let a = hash_password("secret1").unwrap();
        let b = hash_password("secret1").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("secret1", &a).unwrap());
        assert!(verify_password("secret1", &b).unwrap());
    }

    #[test]
    fn check_reports_mismatch_as_invalid_credentials() {
        let digest = hash_password("secret1").unwrap();
        assert!(check_password("secret1", &digest).is_ok());
        assert!(matches!(
            check_password("secret2", &digest),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn unknown_account_runs_a_real_verification() {
        // The dummy digest must parse, or the unknown-email path does no work.
        let digest = DUMMY_DIGEST.as_deref().unwrap();
        assert!(verify_password("anything", digest).is_ok());
        assert!(matches!(
            reject_unknown_account("anything"),
            AuthError::InvalidCredentials
        ));
    }

    #[test]
    fn corrupt_digest_is_an_error_not_a_mismatch() {
        let err = verify_password("secret1", "not-a-bcrypt-digest").unwrap_err();
        assert!(matches!(err, AuthError::Internal(_)));
    }
}
