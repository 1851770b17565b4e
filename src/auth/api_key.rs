//! Device API key generation and authentication.
//!
//! A key is 32 random bytes from the OS, hex-encoded (64 characters). Only
//! its SHA-256 hash is stored, so authentication hashes the presented value
//! and looks the hash up.

use rand::TryRngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

use super::AuthError;
use crate::models::api_key::DeviceIdentity;
use crate::repository::ApiKeyRepository;

/// Number of random bytes in a key.
pub const API_KEY_BYTES: usize = 32;

/// Length of the non-secret prefix kept for display and logs.
pub const KEY_PREFIX_LEN: usize = 8;

/// Generate a new API key.
///
/// Fails if the OS random source is unavailable; there is no fallback.
pub fn generate_api_key() -> Result<String, AuthError> {
    let mut bytes = [0u8; API_KEY_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| AuthError::Internal(format!("os rng: {e}")))?;
    Ok(hex::encode(bytes))
}

/// SHA-256 hash of a key, hex-encoded, as stored in `api_keys.key_hash`.
pub fn hash_api_key(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())
}

/// The first characters of a key, safe to show and log.
pub fn key_prefix(key: &str) -> String {
    key.chars().take(KEY_PREFIX_LEN).collect()
}

/// Extract the key from an `Authorization` header value.
///
/// Accepts `Bearer <key>`, `ApiKey <key>` or the bare key. Any other value
/// is taken literally. Returns `None` when nothing usable remains, including
/// a scheme with no key after it.
pub fn extract_presented_key(header: &str) -> Option<&str> {
    let header = header.trim();
    let key = match header.split_once(char::is_whitespace) {
        Some(("Bearer" | "ApiKey", rest)) => rest.trim(),
        None if header == "Bearer" || header == "ApiKey" => "",
        _ => header,
    };

    (!key.is_empty()).then_some(key)
}

/// Authenticate a presented API key.
///
/// # Flow
///
/// 1. Hash the presented key
/// 2. Look up an active key with that hash
/// 3. Record the use (best effort)
/// 4. Return the owning user and key id
///
/// Unknown and deactivated keys both fail with `AuthError::InvalidKey`.
pub async fn authenticate(
    repo: &dyn ApiKeyRepository,
    presented_key: &str,
) -> Result<DeviceIdentity, AuthError> {
    let key_hash = hash_api_key(presented_key);

    let Some(record) = repo.find_active_by_hash(&key_hash).await? else {
        tracing::info!(key_prefix = %key_prefix(presented_key), "rejected unknown or inactive API key");
        return Err(AuthError::InvalidKey);
    };

    if !record.is_active {
        tracing::info!(api_key_id = record.id, "rejected inactive API key");
        return Err(AuthError::InvalidKey);
    }

    record_last_use(repo, record.id).await;

    tracing::debug!(api_key_id = record.id, user_id = record.user_id, "API key authenticated");

    Ok(DeviceIdentity {
        user_id: record.user_id,
        api_key_id: record.id,
    })
}

/// Fire-and-forget: failures are logged and never reach the caller.
async fn record_last_use(repo: &dyn ApiKeyRepository, api_key_id: i64) {
    if let Err(e) = repo.touch_last_used(api_key_id).await {
        tracing::warn!(api_key_id, error = %e, "failed to record API key last use");
    }
}
