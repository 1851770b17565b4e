//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, auth context)
//! 2. Calls into a service
//! 3. Returns HTTP response (JSON, status code)

/// Admin-only user management endpoints
pub mod admin;
/// API key management endpoints
pub mod api_keys;
/// Register, login and refresh endpoints
pub mod auth;
/// Endpoints reached by tracking devices with an API key
pub mod device;
pub mod health;
/// Profile and password endpoints for the signed-in user
pub mod users;
