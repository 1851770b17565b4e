//! API key management HTTP handlers.
//!
//! This module implements the key endpoints for the signed-in user:
//! - POST /api/v1/api-keys - Create a key (plaintext returned once)
//! - GET /api/v1/api-keys - List the caller's keys
//! - GET /api/v1/api-keys/{id} - Get one of the caller's keys
//! - PUT /api/v1/api-keys/{id} - Rename, describe, (de)activate
//! - DELETE /api/v1/api-keys/{id} - Delete
//!
//! # Security Note
//!
//! Every operation is scoped to `AuthContext::user_id`. A key id owned by
//! another user returns 404, exactly like a key that does not exist.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    error::AppError,
    middleware::auth::AuthContext,
    models::api_key::{
        ApiKeyResponse, CreateApiKeyRequest, CreatedApiKeyResponse, UpdateApiKeyRequest,
    },
    services::api_key_service,
    state::AppState,
};

/// Create a new API key.
///
/// # Request Body
///
/// ```json
/// {
///   "name": "Truck B 1234 tracker",
///   "description": "optional"
/// }
/// ```
///
/// # Response
///
/// - **Success (201 Created)**: the key record plus `key`, the 64 hex character secret
/// - **Error (400)**: invalid name
pub async fn create_api_key(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<CreateApiKeyRequest>,
) -> Result<(StatusCode, Json<CreatedApiKeyResponse>), AppError> {
    let (record, key) =
        api_key_service::create_api_key(state.api_keys.as_ref(), auth.user_id, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedApiKeyResponse {
            api_key: ApiKeyResponse::new(record, state.display_offset),
            key,
        }),
    ))
}

/// List the caller's API keys, newest first.
pub async fn list_api_keys(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<ApiKeyResponse>>, AppError> {
    let keys = api_key_service::list_api_keys(state.api_keys.as_ref(), auth.user_id).await?;

    Ok(Json(
        keys.into_iter()
            .map(|k| ApiKeyResponse::new(k, state.display_offset))
            .collect(),
    ))
}

pub async fn get_api_key(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(key_id): Path<i64>,
) -> Result<Json<ApiKeyResponse>, AppError> {
    let key = api_key_service::get_api_key(state.api_keys.as_ref(), auth.user_id, key_id).await?;

    Ok(Json(ApiKeyResponse::new(key, state.display_offset)))
}

/// Update a key. Setting `is_active` to false stops it authenticating immediately.
pub async fn update_api_key(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(key_id): Path<i64>,
    Json(request): Json<UpdateApiKeyRequest>,
) -> Result<Json<ApiKeyResponse>, AppError> {
    let key = api_key_service::update_api_key(
        state.api_keys.as_ref(),
        auth.user_id,
        key_id,
        request,
    )
    .await?;

    Ok(Json(ApiKeyResponse::new(key, state.display_offset)))
}

/// Returns 204 No Content.
pub async fn delete_api_key(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(key_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    api_key_service::delete_api_key(state.api_keys.as_ref(), auth.user_id, key_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
