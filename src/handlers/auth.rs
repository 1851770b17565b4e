//! Authentication HTTP handlers.
//!
//! - POST /api/v1/auth/register - Create a user account
//! - POST /api/v1/auth/login - Exchange email/password for tokens
//! - POST /api/v1/auth/refresh - Exchange a refresh token for a new access token

use axum::{Json, extract::State, http::StatusCode};

use crate::{
    auth::token::ACCESS_TOKEN_TTL_HOURS,
    error::AppError,
    models::user::{
        LoginRequest, LoginResponse, RefreshTokenRequest, RefreshTokenResponse, RegisterRequest,
        UserResponse,
    },
    services::user_service,
    state::AppState,
};

/// `expires_in` advertised in login responses (one day).
const LOGIN_EXPIRES_IN_SECS: i64 = 24 * 3600;

/// Register a new user.
///
/// # Endpoint
///
/// `POST /api/v1/auth/register`
///
/// # Response
///
/// - **Success (201 Created)**: the new user (role `user`)
/// - **Error (400)**: validation failed
/// - **Error (409)**: email already registered
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = user_service::register(state.users.as_ref(), request).await?;

    Ok((
        StatusCode::CREATED,
        Json(UserResponse::new(user, state.display_offset)),
    ))
}

/// Log in with email and password.
///
/// # Endpoint
///
/// `POST /api/v1/auth/login`
///
/// # Response
///
/// - **Success (200 OK)**: user plus access/refresh token pair
/// - **Error (401)**: invalid email or password (same message for both)
///
/// ```json
/// {
///   "user": { "id": 1, "name": "Alice", "email": "a@x.com", "role": "user", ... },
///   "access_token": "eyJ...",
///   "refresh_token": "eyJ...",
///   "token_type": "Bearer",
///   "expires_in": 86400
/// }
/// ```
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let (user, pair) = user_service::login(state.users.as_ref(), &state.tokens, request).await?;

    Ok(Json(LoginResponse {
        user: UserResponse::new(user, state.display_offset),
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        token_type: "Bearer",
        expires_in: LOGIN_EXPIRES_IN_SECS,
    }))
}

/// Mint a new access token.
///
/// # Endpoint
///
/// `POST /api/v1/auth/refresh`
///
/// The refresh token is not rotated; it stays usable until it expires.
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshTokenRequest>,
) -> Result<Json<RefreshTokenResponse>, AppError> {
    let access_token = user_service::refresh(&state.tokens, &request.refresh_token)?;

    Ok(Json(RefreshTokenResponse {
        access_token,
        token_type: "Bearer",
        expires_in: ACCESS_TOKEN_TTL_HOURS * 3600,
    }))
}
