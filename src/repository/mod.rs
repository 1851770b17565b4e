//! Persistence contracts for identities and API keys.
//!
//! The auth core only talks to storage through these traits. PostgreSQL
//! implementations live in `postgres`; tests use the in-memory ones.

use async_trait::async_trait;

use crate::models::api_key::{ApiKey, NewApiKey, UpdateApiKeyRequest};
use crate::models::user::{NewUser, User};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::{PgApiKeyRepository, PgUserRepository};

/// Identity store.
///
/// Soft-deleted users are invisible to every method.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, sqlx::Error>;

    async fn create(&self, new_user: NewUser) -> Result<User, sqlx::Error>;

    /// Returns `None` if the user does not exist.
    async fn update_profile(
        &self,
        id: i64,
        name: Option<&str>,
        phone_number: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error>;

    /// Returns `false` if the user does not exist.
    async fn update_password(&self, id: i64, password_hash: &str) -> Result<bool, sqlx::Error>;

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>, sqlx::Error>;

    /// Returns `false` if the user does not exist.
    async fn soft_delete(&self, id: i64) -> Result<bool, sqlx::Error>;

    /// Cheap connectivity check for health probes.
    async fn ping(&self) -> Result<(), sqlx::Error>;
}

/// API key store.
///
/// Every `*_for_owner` method is scoped by owner in the query itself, so a
/// key id belonging to someone else behaves exactly like a missing one.
#[async_trait]
pub trait ApiKeyRepository: Send + Sync {
    async fn create(&self, new_key: NewApiKey) -> Result<ApiKey, sqlx::Error>;

    /// Look up an active key by the SHA-256 hash of its secret.
    ///
    /// Keys whose owner is soft-deleted are never returned.
    async fn find_active_by_hash(&self, key_hash: &str) -> Result<Option<ApiKey>, sqlx::Error>;

    async fn find_for_owner(&self, owner_id: i64, id: i64) -> Result<Option<ApiKey>, sqlx::Error>;

    async fn list_for_owner(&self, owner_id: i64) -> Result<Vec<ApiKey>, sqlx::Error>;

    async fn update_for_owner(
        &self,
        owner_id: i64,
        id: i64,
        changes: &UpdateApiKeyRequest,
    ) -> Result<Option<ApiKey>, sqlx::Error>;

    async fn delete_for_owner(&self, owner_id: i64, id: i64) -> Result<bool, sqlx::Error>;

    /// Record the current time as the key's last use.
    async fn touch_last_used(&self, id: i64) -> Result<(), sqlx::Error>;
}
