//! In-memory repositories for tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use sqlx::error::{DatabaseError, ErrorKind};

use super::{ApiKeyRepository, UserRepository};
use crate::models::api_key::{ApiKey, NewApiKey, UpdateApiKeyRequest};
use crate::models::user::{NewUser, User};

/// What Postgres reports when `users.email` is already taken.
#[derive(Debug, thiserror::Error)]
#[error("duplicate key value violates unique constraint \"users_email_key\"")]
struct DuplicateEmail;

impl DatabaseError for DuplicateEmail {
    fn message(&self) -> &str {
        "duplicate key value violates unique constraint \"users_email_key\""
    }

    fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self
    }

    fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
        self
    }

    fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
        self
    }

    fn kind(&self) -> ErrorKind {
        ErrorKind::UniqueViolation
    }
}

#[derive(Default)]
pub struct MemoryUserRepository {
    users: Mutex<Vec<User>>,
    /// When set, `find_by_email` misses every row, like a read that raced
    /// a concurrent insert.
    pub stale_email_lookups: AtomicBool,
}

impl MemoryUserRepository {
    fn is_live(&self, id: i64) -> bool {
        self.users
            .lock()
            .unwrap()
            .iter()
            .any(|u| u.id == id && u.deleted_at.is_none())
    }

    /// Insert a row as-is, bypassing `create`.
    pub fn insert(&self, user: User) {
        self.users.lock().unwrap().push(user);
    }

    pub fn get_raw(&self, id: i64) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| u.id == id).cloned()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        if self.stale_email_lookups.load(Ordering::SeqCst) {
            return Ok(None);
        }
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|u| u.email == email && u.deleted_at.is_none())
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, sqlx::Error> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|u| u.id == id && u.deleted_at.is_none())
            .cloned())
    }

    async fn create(&self, new_user: NewUser) -> Result<User, sqlx::Error> {
        let mut users = self.users.lock().unwrap();
        // Mirrors the unique index, which also covers soft-deleted rows.
        if users.iter().any(|u| u.email == new_user.email) {
            return Err(sqlx::Error::Database(Box::new(DuplicateEmail)));
        }
        let now = Utc::now();
        let user = User {
            id: users.iter().map(|u| u.id).max().unwrap_or(0) + 1,
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            phone_number: new_user.phone_number,
            role: new_user.role,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn update_profile(
        &self,
        id: i64,
        name: Option<&str>,
        phone_number: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users
            .iter_mut()
            .find(|u| u.id == id && u.deleted_at.is_none())
        else {
            return Ok(None);
        };
        if let Some(name) = name {
            user.name = name.to_string();
        }
        if let Some(phone) = phone_number {
            user.phone_number = Some(phone.to_string());
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn update_password(&self, id: i64, password_hash: &str) -> Result<bool, sqlx::Error> {
        let mut users = self.users.lock().unwrap();
        match users
            .iter_mut()
            .find(|u| u.id == id && u.deleted_at.is_none())
        {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>, sqlx::Error> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .filter(|u| u.deleted_at.is_none())
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn soft_delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let mut users = self.users.lock().unwrap();
        match users
            .iter_mut()
            .find(|u| u.id == id && u.deleted_at.is_none())
        {
            Some(user) => {
                user.deleted_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryApiKeyRepository {
    keys: Mutex<Vec<ApiKey>>,
    /// Owners, when linked. Keys of soft-deleted owners never authenticate.
    owners: Option<Arc<MemoryUserRepository>>,
    /// When set, `touch_last_used` fails like a dropped connection.
    pub fail_touch: AtomicBool,
}

impl MemoryApiKeyRepository {
    /// Key store that checks owners against `users`, like the SQL join.
    pub fn with_owners(users: Arc<MemoryUserRepository>) -> Self {
        Self {
            owners: Some(users),
            ..Default::default()
        }
    }

    pub fn get_raw(&self, id: i64) -> Option<ApiKey> {
        self.keys.lock().unwrap().iter().find(|k| k.id == id).cloned()
    }
}

#[async_trait]
impl ApiKeyRepository for MemoryApiKeyRepository {
    async fn create(&self, new_key: NewApiKey) -> Result<ApiKey, sqlx::Error> {
        let mut keys = self.keys.lock().unwrap();
        let now = Utc::now();
        let key = ApiKey {
            id: keys.iter().map(|k| k.id).max().unwrap_or(0) + 1,
            user_id: new_key.user_id,
            key_hash: new_key.key_hash,
            key_prefix: new_key.key_prefix,
            name: new_key.name,
            description: new_key.description,
            is_active: true,
            last_used_at: None,
            created_at: now,
            updated_at: now,
        };
        keys.push(key.clone());
        Ok(key)
    }

    async fn find_active_by_hash(&self, key_hash: &str) -> Result<Option<ApiKey>, sqlx::Error> {
        let found = {
            let keys = self.keys.lock().unwrap();
            keys.iter()
                .find(|k| k.key_hash == key_hash && k.is_active)
                .cloned()
        };
        Ok(found.filter(|k| self.owners.as_ref().is_none_or(|users| users.is_live(k.user_id))))
    }

    async fn find_for_owner(&self, owner_id: i64, id: i64) -> Result<Option<ApiKey>, sqlx::Error> {
        let keys = self.keys.lock().unwrap();
        Ok(keys
            .iter()
            .find(|k| k.id == id && k.user_id == owner_id)
            .cloned())
    }

    async fn list_for_owner(&self, owner_id: i64) -> Result<Vec<ApiKey>, sqlx::Error> {
        let keys = self.keys.lock().unwrap();
        Ok(keys
            .iter()
            .rev()
            .filter(|k| k.user_id == owner_id)
            .cloned()
            .collect())
    }

    async fn update_for_owner(
        &self,
        owner_id: i64,
        id: i64,
        changes: &UpdateApiKeyRequest,
    ) -> Result<Option<ApiKey>, sqlx::Error> {
        let mut keys = self.keys.lock().unwrap();
        let Some(key) = keys
            .iter_mut()
            .find(|k| k.id == id && k.user_id == owner_id)
        else {
            return Ok(None);
        };
        if let Some(name) = &changes.name {
            key.name = name.clone();
        }
        if let Some(description) = &changes.description {
            key.description = Some(description.clone());
        }
        if let Some(is_active) = changes.is_active {
            key.is_active = is_active;
        }
        key.updated_at = Utc::now();
        Ok(Some(key.clone()))
    }

    async fn delete_for_owner(&self, owner_id: i64, id: i64) -> Result<bool, sqlx::Error> {
        let mut keys = self.keys.lock().unwrap();
        let before = keys.len();
        keys.retain(|k| !(k.id == id && k.user_id == owner_id));
        Ok(keys.len() < before)
    }

    async fn touch_last_used(&self, id: i64) -> Result<(), sqlx::Error> {
        if self.fail_touch.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut);
        }
        let mut keys = self.keys.lock().unwrap();
        if let Some(key) = keys.iter_mut().find(|k| k.id == id) {
            key.last_used_at = Some(Utc::now());
        }
        Ok(())
    }
}
