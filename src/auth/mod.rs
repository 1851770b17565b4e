//! Authentication and authorization core.
//!
//! Everything that decides *who* is calling and *whether* they may proceed
//! lives here:
//! - `password`: bcrypt hashing and verification of user passwords
//! - `token`: HS256 access/refresh token issuance and validation
//! - `api_key`: device API key generation and authentication
//! - `role`: role canonicalization and the route allow-list check
//!
//! None of these components hold mutable state. Persistence is reached only
//! through the repository traits.

pub mod api_key;
pub mod password;
pub mod role;
pub mod token;

/// Authentication and authorization failures.
///
/// Token problems are deliberately collapsed into a single `InvalidToken`
/// so callers cannot tell a bad signature from an expired token.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Unknown email, wrong password, or wrong old password on change.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid or expired token")]
    InvalidToken,

    /// API key unknown or deactivated. Both cases look identical.
    #[error("Invalid API key")]
    InvalidKey,

    /// Authenticated, but the role is not on the route's allow-list.
    #[error("You are not permitted to access this resource")]
    Forbidden,

    /// No usable credential was presented at all.
    #[error("Authentication required")]
    Unauthenticated,

    /// Persistence failure other than "not found".
    #[error("Store error: {0}")]
    Store(#[from] sqlx::Error),

    /// Hashing, signing or randomness failure.
    #[error("Internal error: {0}")]
    Internal(String),
}
