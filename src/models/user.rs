//! User data models and authentication request/response types.
//!
//! This module defines:
//! - `User`: database entity, including the password hash
//! - `NewUser`: insert payload
//! - request bodies for register, login, refresh, profile and password change
//! - `UserResponse`, `LoginResponse`, `RefreshTokenResponse`: response bodies

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use super::localize;

/// Represents a user record from the database.
///
/// # Database Table
///
/// Maps to the `users` table. Users are never physically removed;
/// `deleted_at` is set instead and every lookup skips such rows.
#[derive(Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,

    /// Display name, also carried in tokens as `username`
    pub name: String,

    /// Unique login email
    pub email: String,

    /// bcrypt digest. Only ever compared through `auth::password::verify_password`.
    pub password_hash: String,

    pub phone_number: Option<String>,

    /// Raw role string (`admin`, `user`, or a historical variant)
    pub role: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

// Hand-written so the password hash can never end up in a log line.
impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// Insert payload for a new user.
#[derive(Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone_number: Option<String>,
    pub role: String,
}

/// Request body for `POST /api/v1/auth/register`.
///
/// # JSON Example
///
/// ```json
/// {
///   "name": "Alice",
///   "email": "a@x.com",
///   "password": "secret1",
///   "phone_number": "081234567890"
/// }
/// ```
///
/// # Validation
///
/// - `name`: 2 to 100 characters
/// - `email`: must look like an email address
/// - `password`: at least 6 characters
/// - `phone_number`: optional, 10 to 20 characters
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub phone_number: Option<String>,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_name(&self.name)?;
        validate_email(&self.email)?;
        validate_new_password(&self.password)?;
        if let Some(phone) = self.phone_number.as_deref().filter(|p| !p.is_empty()) {
            validate_phone(phone)?;
        }
        Ok(())
    }
}

/// Request body for `POST /api/v1/auth/login`.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_email(&self.email)?;
        if self.password.is_empty() {
            return Err("password is required".to_string());
        }
        Ok(())
    }
}

/// Request body for `POST /api/v1/auth/refresh`.
#[derive(Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Request body for `PUT /api/v1/user/profile`.
///
/// Absent or empty fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

impl UpdateProfileRequest {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            validate_name(name)?;
        }
        if let Some(phone) = self.phone_number.as_deref().filter(|p| !p.is_empty()) {
            validate_phone(phone)?;
        }
        Ok(())
    }
}

/// Request body for `POST /api/v1/user/change-password`.
#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

impl ChangePasswordRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.old_password.is_empty() {
            return Err("old_password is required".to_string());
        }
        validate_new_password(&self.new_password)
    }
}

/// User as returned to API clients. Never includes the password hash.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub role: String,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl UserResponse {
    pub fn new(user: User, offset: FixedOffset) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone_number: user.phone_number,
            role: user.role,
            created_at: localize(user.created_at, offset),
            updated_at: localize(user.updated_at, offset),
        }
    }
}

/// Response body for a successful login.
///
/// `expires_in` advertises one day for the bundle, even though the access
/// token inside it expires after one hour; existing clients depend on it.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

/// Response body for a successful refresh.
#[derive(Debug, Serialize)]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

fn validate_name(name: &str) -> Result<(), String> {
    let len = name.trim().chars().count();
    if !(2..=100).contains(&len) {
        return Err("name must be between 2 and 100 characters".to_string());
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), String> {
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid || email.len() > 100 {
        return Err("email must be a valid email address".to_string());
    }
    Ok(())
}

fn validate_new_password(password: &str) -> Result<(), String> {
    if password.chars().count() < 6 {
        return Err("password must be at least 6 characters".to_string());
    }
    Ok(())
}

fn validate_phone(phone: &str) -> Result<(), String> {
    if !(10..=20).contains(&phone.chars().count()) {
        return Err("phone_number must be between 10 and 20 characters".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            phone_number: None,
        }
    }

    #[test]
    fn register_validation() {
        assert!(register("Alice", "a@x.com", "secret1").validate().is_ok());
        assert!(register("A", "a@x.com", "secret1").validate().is_err());
        assert!(register("Alice", "a.x.com", "secret1").validate().is_err());
        assert!(register("Alice", "@x.com", "secret1").validate().is_err());
        assert!(register("Alice", "a@x.com", "short").validate().is_err());

        let mut with_phone = register("Alice", "a@x.com", "secret1");
        with_phone.phone_number = Some("123".into());
        assert!(with_phone.validate().is_err());
        with_phone.phone_number = Some(String::new());
        assert!(with_phone.validate().is_ok());
    }

    #[test]
    fn change_password_requires_both_fields() {
        let req = ChangePasswordRequest {
            old_password: String::new(),
            new_password: "secret2".into(),
        };
        assert!(req.validate().is_err());

        let req = ChangePasswordRequest {
            old_password: "secret1".into(),
            new_password: "abc".into(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn debug_output_hides_password_hash() {
        let user = User {
            id: 1,
            name: "Alice".into(),
            email: "a@x.com".into(),
            password_hash: "$2b$04$very-secret-digest".into(),
            phone_number: None,
            role: "user".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        };
        let rendered = format!("{user:?}");
        assert!(!rendered.contains("very-secret-digest"));
        assert!(rendered.contains("a@x.com"));
    }
}
