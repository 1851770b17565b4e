//! Bearer token authentication and role-based authorization.
//!
//! Private routes are wrapped twice:
//! 1. `require_auth` resolves the caller from `Authorization: Bearer <token>`
//! 2. `require_roles` checks the caller's role against the route's allow-list
//!
//! A request with no usable credential is rejected by step 1 as
//! unauthenticated and never reaches the role check.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

use crate::auth::AuthError;
use crate::auth::role::{Role, authorize};
use crate::auth::token::{Claims, TokenManager};
use crate::error::AppError;
use crate::state::AppState;

/// Authentication context attached to authenticated requests.
///
/// Inserted into the request's extensions by `require_auth` and extracted
/// by handlers with `Extension<AuthContext>`.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: i64,
    /// Role string exactly as carried in the token
    pub role: String,
}

impl From<Claims> for AuthContext {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            role: claims.role,
        }
    }
}

/// Resolve an identity from a raw `Authorization` header value.
///
/// - no header, a non-Bearer scheme, or an empty token → `Unauthenticated`
/// - a token that fails validation → `InvalidToken`
pub fn authenticate_bearer(
    tokens: &TokenManager,
    header: Option<&str>,
) -> Result<AuthContext, AuthError> {
    let token = header
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::Unauthenticated)?;

    let claims = tokens.validate(token).inspect_err(|_| {
        // Unverified read, for the log line only.
        let claimed_user_id = tokens.unverified_user_id(token).ok();
        tracing::info!(?claimed_user_id, "bearer token rejected");
    })?;

    Ok(claims.into())
}

fn authorization_header(headers: &HeaderMap) -> Option<&str> {
    // A header that is not valid UTF-8 counts as absent.
    headers.get(AUTHORIZATION).and_then(|h| h.to_str().ok())
}

/// Bearer token authentication middleware.
///
/// # Flow
///
/// 1. Extract `Authorization: Bearer <token>` from the request
/// 2. Validate the token (signature, algorithm, issuer, expiry)
/// 3. Inject `AuthContext` into the request and call the next handler
///
/// # Returns
///
/// - `Err(AppError::Unauthenticated)` if no bearer token was presented (401)
/// - `Err(AppError::InvalidToken)` if the token is not valid (401)
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_context = authenticate_bearer(&state.tokens, authorization_header(request.headers()))?;

    request.extensions_mut().insert(auth_context);

    Ok(next.run(request).await)
}

/// Role gate middleware.
///
/// The state is the route group's static allow-list, e.g. `ADMIN_ONLY`.
/// Must be layered inside `require_auth`.
///
/// # Returns
///
/// - `Err(AppError::Unauthenticated)` if no `AuthContext` was resolved (401)
/// - `Err(AppError::Forbidden)` if the role is not allowed (403)
pub async fn require_roles(
    State(allowed): State<&'static [Role]>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth = request
        .extensions()
        .get::<AuthContext>()
        .ok_or(AppError::Unauthenticated)?;

    if let Err(e) = authorize(&auth.role, allowed) {
        tracing::info!(user_id = auth.user_id, role = %auth.role, path = %request.uri().path(), "role not permitted");
        return Err(e.into());
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_malformed_header_is_unauthenticated() {
        let tokens = TokenManager::new(b"test-secret");

        for header in [None, Some(""), Some("Bearer "), Some("Bearer    "), Some("Basic abc")] {
            assert!(
                matches!(
                    authenticate_bearer(&tokens, header),
                    Err(AuthError::Unauthenticated)
                ),
                "{header:?}"
            );
        }
    }

    #[test]
    fn bad_token_is_invalid_not_unauthenticated() {
        let tokens = TokenManager::new(b"test-secret");
        let foreign = TokenManager::new(b"other")
            .issue_access_token(1, "a@x.com", "Alice", "user")
            .unwrap();

        assert!(matches!(
            authenticate_bearer(&tokens, Some("Bearer not.a.token")),
            Err(AuthError::InvalidToken)
        ));
        assert!(matches!(
            authenticate_bearer(&tokens, Some(&format!("Bearer {foreign}"))),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn valid_token_resolves_identity() {
        let tokens = TokenManager::new(b"test-secret");
        let token = tokens.issue_access_token(5, "a@x.com", "Alice", "admin").unwrap();

        let ctx = authenticate_bearer(&tokens, Some(&format!("Bearer {token}"))).unwrap();

        assert_eq!(ctx.user_id, 5);
        assert_eq!(ctx.role, "admin");
    }
}
