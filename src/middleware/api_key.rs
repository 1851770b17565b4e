//! API key authentication middleware for tracking devices.
//!
//! This middleware intercepts every device request to:
//! 1. Extract the API key from the Authorization header
//! 2. Hash it and verify an active key with that hash exists
//! 3. Inject the owning user's identity into the request
//! 4. Reject unauthorized requests with HTTP 401
//!
//! The key itself is never logged; only its 8 character prefix is.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::auth::api_key::{authenticate, extract_presented_key};
use crate::error::AppError;
use crate::state::AppState;

/// API key authentication middleware function.
///
/// # Headers
///
/// Any of these forms is accepted:
/// ```text
/// Authorization: Bearer <64 hex chars>
/// Authorization: ApiKey <64 hex chars>
/// Authorization: <64 hex chars>
/// ```
///
/// # Returns
///
/// - `Ok(Response)` if authenticated; a `DeviceIdentity` extension is available to handlers
/// - `Err(AppError::Unauthenticated)` if no key was presented (401)
/// - `Err(AppError::InvalidApiKey)` if the key is unknown or inactive (401)
pub async fn require_api_key(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let presented = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(extract_presented_key)
        .ok_or(AppError::Unauthenticated)?;

    let identity = authenticate(state.api_keys.as_ref(), presented).await?;

    // Every device handler scopes its queries to `identity.user_id`.
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}
