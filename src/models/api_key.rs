//! API key model for device authentication.
//!
//! Tracking devices authenticate with a long-lived API key owned by a user.
//! Keys are stored as SHA-256 hashes; the plaintext is shown exactly once,
//! when the key is created.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use super::localize;

/// Represents an API key record from the database.
///
/// # Database Table
///
/// Maps to the `api_keys` table with columns:
/// - `id`: Unique identifier
/// - `user_id`: Owning user
/// - `key_hash`: SHA-256 hash of the actual API key
/// - `key_prefix`: First 8 characters of the key, for display and logs
/// - `name` / `description`: Human-readable labels
/// - `is_active`: Whether the key is currently accepted
/// - `last_used_at`: Last successful authentication (best effort)
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ApiKey {
    pub id: i64,

    /// User on whose behalf the device acts
    pub user_id: i64,

    /// SHA-256 hash of the actual API key (64 hex characters)
    ///
    /// When a request comes in with "ApiKey abc123", we:
    /// 1. Hash "abc123" with SHA-256
    /// 2. Look up this hash in the database
    /// 3. If found and active, authenticate the request
    pub key_hash: String,

    pub key_prefix: String,

    pub name: String,

    pub description: Option<String>,

    /// Whether this API key is currently active
    ///
    /// Inactive keys are rejected during authentication. This provides a way to revoke access without deleting the record.
    pub is_active: bool,

    pub last_used_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a new API key.
#[derive(Debug, Clone)]
pub struct NewApiKey {
    pub user_id: i64,
    pub key_hash: String,
    pub key_prefix: String,
    pub name: String,
    pub description: Option<String>,
}

/// Partial update applied by the owner. `None` leaves a field unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateApiKeyRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl UpdateApiKeyRequest {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.name {
            validate_key_name(name)?;
        }
        Ok(())
    }
}

/// Request body for `POST /api/v1/api-keys`.
///
/// # JSON Example
///
/// ```json
/// {
///   "name": "Truck B 1234 tracker",
///   "description": "ESP32 unit under the dashboard"
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct CreateApiKeyRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl CreateApiKeyRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_key_name(&self.name)
    }
}

/// API key as returned to its owner. Never includes the key itself.
#[derive(Debug, Serialize)]
pub struct ApiKeyResponse {
    pub id: i64,
    pub user_id: i64,
    pub key_prefix: String,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub last_used_at: Option<DateTime<FixedOffset>>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl ApiKeyResponse {
    pub fn new(key: ApiKey, offset: FixedOffset) -> Self {
        Self {
            id: key.id,
            user_id: key.user_id,
            key_prefix: key.key_prefix,
            name: key.name,
            description: key.description,
            is_active: key.is_active,
            last_used_at: key.last_used_at.map(|ts| localize(ts, offset)),
            created_at: localize(key.created_at, offset),
            updated_at: localize(key.updated_at, offset),
        }
    }
}

/// Response body for key creation: the only time the plaintext key is shown.
#[derive(Serialize)]
pub struct CreatedApiKeyResponse {
    #[serde(flatten)]
    pub api_key: ApiKeyResponse,
    pub key: String,
}

/// Identity resolved for a device request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeviceIdentity {
    pub user_id: i64,
    pub api_key_id: i64,
}

fn validate_key_name(name: &str) -> Result<(), String> {
    let len = name.trim().chars().count();
    if !(1..=100).contains(&len) {
        return Err("name must be between 1 and 100 characters".to_string());
    }
    Ok(())
}
