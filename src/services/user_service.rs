//! User service - registration, login, token refresh and profile management.

use crate::auth::password::{check_password, hash_password, reject_unknown_account};
use crate::auth::role::Role;
use crate::auth::token::{TokenManager, TokenPair};
use crate::error::AppError;
use crate::models::user::{
    ChangePasswordRequest, LoginRequest, NewUser, RegisterRequest, UpdateProfileRequest, User,
};
use crate::repository::UserRepository;

/// Register a new user with the `user` role.
///
/// # Errors
///
/// - `InvalidRequest`: validation failed
/// - `EmailTaken`: an active user already has this email
/// - `Internal`: password hashing failed
pub async fn register(users: &dyn UserRepository, request: RegisterRequest) -> Result<User, AppError> {
    request.validate().map_err(AppError::InvalidRequest)?;

    let email = request.email.trim().to_string();
    if users.find_by_email(&email).await?.is_some() {
        return Err(AppError::EmailTaken);
    }

    let password_hash = hash_password(&request.password)?;

    let user = users
        .create(NewUser {
            name: request.name.trim().to_string(),
            email,
            password_hash,
            phone_number: request.phone_number.filter(|p| !p.is_empty()),
            role: Role::User.as_str().to_string(),
        })
        .await
        .map_err(|e| {
            // Lost a race with a concurrent registration.
            if e.as_database_error().is_some_and(|d| d.is_unique_violation()) {
                AppError::EmailTaken
            } else {
                AppError::Database(e)
            }
        })?;

    tracing::info!(user_id = user.id, "user registered");

    Ok(user)
}

/// Check email and password, then issue an access/refresh token pair.
///
/// Unknown email and wrong password fail identically.
pub async fn login(
    users: &dyn UserRepository,
    tokens: &TokenManager,
    request: LoginRequest,
) -> Result<(User, TokenPair), AppError> {
    request.validate().map_err(AppError::InvalidRequest)?;

    let Some(user) = users.find_by_email(request.email.trim()).await? else {
        tracing::info!("login rejected");
        return Err(reject_unknown_account(&request.password).into());
    };

    check_password(&request.password, &user.password_hash)
        .inspect_err(|_| tracing::info!(user_id = user.id, "login rejected"))?;

    let pair = tokens.issue_token_pair(user.id, &user.email, &user.name, &user.role)?;

    tracing::info!(user_id = user.id, "user logged in");

    Ok((user, pair))
}

/// Mint a fresh access token from a refresh token.
pub fn refresh(tokens: &TokenManager, refresh_token: &str) -> Result<String, AppError> {
    tokens.refresh_access_token(refresh_token).map_err(|e| {
        // Unverified read, for the log line only.
        let expired_at = tokens.unverified_expiry(refresh_token).ok();
        tracing::info!(?expired_at, "refresh rejected");
        e.into()
    })
}

pub async fn get_profile(users: &dyn UserRepository, user_id: i64) -> Result<User, AppError> {
    users
        .find_by_id(user_id)
        .await?
        .ok_or(AppError::UserNotFound)
}

/// Update name and/or phone number. Empty values leave the field unchanged.
pub async fn update_profile(
    users: &dyn UserRepository,
    user_id: i64,
    request: UpdateProfileRequest,
) -> Result<User, AppError> {
    request.validate().map_err(AppError::InvalidRequest)?;

    let name = request
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());
    let phone_number = request.phone_number.as_deref().filter(|p| !p.is_empty());

    users
        .update_profile(user_id, name, phone_number)
        .await?
        .ok_or(AppError::UserNotFound)
}

/// Replace the caller's password after verifying the old one.
///
/// Issued tokens stay valid until they expire.
pub async fn change_password(
    users: &dyn UserRepository,
    user_id: i64,
    request: ChangePasswordRequest,
) -> Result<(), AppError> {
    request.validate().map_err(AppError::InvalidRequest)?;

    let user = get_profile(users, user_id).await?;

    check_password(&request.old_password, &user.password_hash)
        .inspect_err(|_| tracing::info!(user_id, "password change rejected"))?;

    let password_hash = hash_password(&request.new_password)?;
    if !users.update_password(user_id, &password_hash).await? {
        return Err(AppError::UserNotFound);
    }

    tracing::info!(user_id, "password changed");

    Ok(())
}

pub async fn list_users(
    users: &dyn UserRepository,
    limit: i64,
    offset: i64,
) -> Result<Vec<User>, AppError> {
    Ok(users.list(limit, offset).await?)
}

/// Soft-delete a user. Their existing tokens expire naturally.
pub async fn delete_user(users: &dyn UserRepository, user_id: i64) -> Result<(), AppError> {
    if !users.soft_delete(user_id).await? {
        return Err(AppError::UserNotFound);
    }

    tracing::info!(user_id, "user deleted");

    Ok(())
}
