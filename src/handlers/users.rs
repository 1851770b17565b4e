//! Profile HTTP handlers for the signed-in user.
//!
//! Reachable by both `admin` and `user` roles.

use axum::{Extension, Json, extract::State};
use serde_json::{Value, json};

use crate::{
    error::AppError,
    middleware::auth::AuthContext,
    models::user::{ChangePasswordRequest, UpdateProfileRequest, UserResponse},
    services::user_service,
    state::AppState,
};

/// `GET /api/v1/user/profile`
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<UserResponse>, AppError> {
    let user = user_service::get_profile(state.users.as_ref(), auth.user_id).await?;

    Ok(Json(UserResponse::new(user, state.display_offset)))
}

/// `PUT /api/v1/user/profile`
///
/// Tokens already issued keep the old display name until they expire.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let user = user_service::update_profile(state.users.as_ref(), auth.user_id, request).await?;

    Ok(Json(UserResponse::new(user, state.display_offset)))
}

/// `POST /api/v1/user/change-password`
///
/// # Response
///
/// - **Success (200 OK)**: `{"message": "Password changed successfully"}`
/// - **Error (401)**: old password is wrong
pub async fn change_password(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<Value>, AppError> {
    user_service::change_password(state.users.as_ref(), auth.user_id, request).await?;

    Ok(Json(json!({ "message": "Password changed successfully" })))
}
