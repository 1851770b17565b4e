//! HTTP middleware components.
//!
//! Middleware are functions that run before route handlers. Here they
//! resolve who is calling and reject requests that may not proceed.

/// API key authentication for devices
pub mod api_key;
/// Bearer token authentication and the role gate
pub mod auth;
