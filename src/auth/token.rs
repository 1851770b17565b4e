//! Access and refresh token issuance and validation.
//!
//! Tokens are compact HS256 JWTs. They are stateless: nothing is persisted
//! and a token stays valid until its `exp` passes. Access and refresh tokens
//! carry the same claims and differ only in lifetime.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use super::AuthError;

/// Value of the `iss` claim on every token this service issues.
pub const ISSUER: &str = "cartrack-backend";

/// Access token lifetime: 1 hour.
pub const ACCESS_TOKEN_TTL_HOURS: i64 = 1;

/// Refresh token lifetime: 7 days.
pub const REFRESH_TOKEN_TTL_HOURS: i64 = 168;

/// Claims carried by every token.
///
/// # Wire Format
///
/// ```json
/// {
///   "user_id": 7,
///   "email": "a@x.com",
///   "username": "Alice",
///   "role": "user",
///   "exp": 1735693200,
///   "iat": 1735689600,
///   "nbf": 1735689600,
///   "iss": "cartrack-backend",
///   "sub": "7"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub email: String,
    /// Display name of the user at issuance time
    pub username: String,
    /// Role string as stored on the user record (not canonicalized)
    pub role: String,
    pub exp: i64,
    pub iat: i64,
    pub nbf: i64,
    pub iss: String,
    /// `user_id` rendered as a string
    pub sub: String,
}

/// An access token together with the refresh token minted alongside it.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Signs and verifies tokens with a single process-wide HMAC secret.
///
/// Built once at startup from configuration and shared read-only.
#[derive(Clone)]
pub struct TokenManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager").finish_non_exhaustive()
    }
}

impl TokenManager {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Only the HMAC family is ever accepted, whatever the header claims.
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        // Time windows are checked in `validate_at` with no leeway.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.set_issuer(&[ISSUER]);
        validation.set_required_spec_claims(&["exp", "nbf", "iss", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// A manager whose signing key cannot produce HS256 signatures.
    #[cfg(test)]
    pub(crate) fn unable_to_sign() -> Self {
        Self {
            encoding_key: EncodingKey::from_ed_der(&[]),
            ..Self::new(b"test-secret")
        }
    }

    /// Issue a 1 hour access token.
    pub fn issue_access_token(
        &self,
        user_id: i64,
        email: &str,
        username: &str,
        role: &str,
    ) -> Result<String, AuthError> {
        self.issue_at(user_id, email, username, role, ACCESS_TOKEN_TTL_HOURS, Utc::now())
    }

    /// Issue a 168 hour refresh token.
    pub fn issue_refresh_token(
        &self,
        user_id: i64,
        email: &str,
        username: &str,
        role: &str,
    ) -> Result<String, AuthError> {
        self.issue_at(user_id, email, username, role, REFRESH_TOKEN_TTL_HOURS, Utc::now())
    }

    /// Issue an access and a refresh token for the same identity.
    ///
    /// Either both tokens are returned or neither is.
    pub fn issue_token_pair(
        &self,
        user_id: i64,
        email: &str,
        username: &str,
        role: &str,
    ) -> Result<TokenPair, AuthError> {
        let access_token = self.issue_access_token(user_id, email, username, role)?;
        let refresh_token = self.issue_refresh_token(user_id, email, username, role)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Verify signature, algorithm, issuer, claim shape and time window.
    ///
    /// Every failure is reported as `AuthError::InvalidToken`.
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        self.validate_at(token, Utc::now())
    }

    /// Mint a new access token from a valid refresh token.
    ///
    /// The refresh token itself is neither extended nor invalidated.
    pub fn refresh_access_token(&self, refresh_token: &str) -> Result<String, AuthError> {
        self.refresh_access_token_at(refresh_token, Utc::now())
    }

    /// Read `user_id` from a token WITHOUT checking its signature.
    ///
    /// For log fields only. Never use the result to grant access.
    pub fn unverified_user_id(&self, token: &str) -> Result<i64, AuthError> {
        Ok(unverified_claims(token)?.user_id)
    }

    /// Read the expiry of a token WITHOUT checking its signature.
    ///
    /// For log fields only. Never use the result to grant access.
    pub fn unverified_expiry(&self, token: &str) -> Result<DateTime<Utc>, AuthError> {
        let exp = unverified_claims(token)?.exp;
        DateTime::from_timestamp(exp, 0).ok_or(AuthError::InvalidToken)
    }

    fn issue_at(
        &self,
        user_id: i64,
        email: &str,
        username: &str,
        role: &str,
        ttl_hours: i64,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let claims = Claims {
            user_id,
            email: email.to_string(),
            username: username.to_string(),
            role: role.to_string(),
            exp: (now + Duration::hours(ttl_hours)).timestamp(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            iss: ISSUER.to_string(),
            sub: user_id.to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("jwt encode: {e}")))
    }

    fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!(reason = %e, "token failed verification");
                AuthError::InvalidToken
            })?
            .claims;

        // A token is dead at exactly `exp`.
        let now = now.timestamp();
        if now >= claims.exp || now < claims.nbf {
            tracing::debug!(user_id = claims.user_id, "token outside its validity window");
            return Err(AuthError::InvalidToken);
        }

        Ok(claims)
    }

    fn refresh_access_token_at(
        &self,
        refresh_token: &str,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let claims = self.validate_at(refresh_token, now)?;

        // Token class is carried by lifetime alone; access tokens cannot refresh.
        if claims.exp - claims.iat != Duration::hours(REFRESH_TOKEN_TTL_HOURS).num_seconds() {
            tracing::info!(user_id = claims.user_id, "refresh attempted with a non-refresh token");
            return Err(AuthError::InvalidToken);
        }

        self.issue_at(
            claims.user_id,
            &claims.email,
            &claims.username,
            &claims.role,
            ACCESS_TOKEN_TTL_HOURS,
            now,
        )
    }
}

fn unverified_claims(token: &str) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|_| AuthError::InvalidToken)
}
