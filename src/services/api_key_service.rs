//! API key service - owner-scoped key management.
//!
//! Every operation takes the owner's user id and passes it down to the
//! repository, so a key id belonging to another user is simply "not found".

use crate::auth::api_key::{generate_api_key, hash_api_key, key_prefix};
use crate::error::AppError;
use crate::models::api_key::{ApiKey, CreateApiKeyRequest, NewApiKey, UpdateApiKeyRequest};
use crate::repository::ApiKeyRepository;

/// Create a new API key for `owner_id`.
///
/// # Process
///
/// 1. Generate 32 random bytes (64 hex chars)
/// 2. Store its SHA-256 hash and an 8 character prefix
/// 3. Return the record together with the plaintext key
///
/// The plaintext is not stored and cannot be retrieved later.
pub async fn create_api_key(
    keys: &dyn ApiKeyRepository,
    owner_id: i64,
    request: CreateApiKeyRequest,
) -> Result<(ApiKey, String), AppError> {
    request.validate().map_err(AppError::InvalidRequest)?;

    let key = generate_api_key()?;

    let record = keys
        .create(NewApiKey {
            user_id: owner_id,
            key_hash: hash_api_key(&key),
            key_prefix: key_prefix(&key),
            name: request.name.trim().to_string(),
            description: request.description,
        })
        .await?;

    tracing::info!(api_key_id = record.id, user_id = owner_id, key_prefix = %record.key_prefix, "API key created");

    Ok((record, key))
}

pub async fn list_api_keys(
    keys: &dyn ApiKeyRepository,
    owner_id: i64,
) -> Result<Vec<ApiKey>, AppError> {
    Ok(keys.list_for_owner(owner_id).await?)
}

pub async fn get_api_key(
    keys: &dyn ApiKeyRepository,
    owner_id: i64,
    id: i64,
) -> Result<ApiKey, AppError> {
    keys.find_for_owner(owner_id, id)
        .await?
        .ok_or(AppError::ApiKeyNotFound)
}

/// Rename, describe, activate or deactivate a key.
pub async fn update_api_key(
    keys: &dyn ApiKeyRepository,
    owner_id: i64,
    id: i64,
    request: UpdateApiKeyRequest,
) -> Result<ApiKey, AppError> {
    request.validate().map_err(AppError::InvalidRequest)?;

    let record = keys
        .update_for_owner(owner_id, id, &request)
        .await?
        .ok_or(AppError::ApiKeyNotFound)?;

    if let Some(is_active) = request.is_active {
        tracing::info!(api_key_id = id, user_id = owner_id, is_active, "API key state changed");
    }

    Ok(record)
}

pub async fn delete_api_key(
    keys: &dyn ApiKeyRepository,
    owner_id: i64,
    id: i64,
) -> Result<(), AppError> {
    if !keys.delete_for_owner(owner_id, id).await? {
        return Err(AppError::ApiKeyNotFound);
    }

    tracing::info!(api_key_id = id, user_id = owner_id, "API key deleted");

    Ok(())
}
