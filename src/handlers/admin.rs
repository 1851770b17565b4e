//! Admin-only user management handlers.
//!
//! - GET /api/v1/admin/users - List users
//! - GET /api/v1/admin/users/{id} - Get a user
//! - DELETE /api/v1/admin/users/{id} - Soft-delete a user

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::{
    error::AppError, models::user::UserResponse, services::user_service, state::AppState,
};

const DEFAULT_LIMIT: i64 = 10;
const MAX_LIMIT: i64 = 100;

/// Query parameters for listing users.
#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `GET /api/v1/admin/users?limit=10&offset=0`
///
/// `limit` is clamped to 1..=100 and defaults to 10.
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = query.offset.unwrap_or(0).max(0);

    let users = user_service::list_users(state.users.as_ref(), limit, offset).await?;

    Ok(Json(
        users
            .into_iter()
            .map(|u| UserResponse::new(u, state.display_offset))
            .collect(),
    ))
}

/// `GET /api/v1/admin/users/{id}`
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<UserResponse>, AppError> {
    let user = user_service::get_profile(state.users.as_ref(), user_id).await?;

    Ok(Json(UserResponse::new(user, state.display_offset)))
}

/// `DELETE /api/v1/admin/users/{id}`
///
/// Returns 204 No Content.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    user_service::delete_user(state.users.as_ref(), user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
