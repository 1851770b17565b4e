//! Business logic services.
//!
//! Services contain the logic between HTTP handlers and the repositories:
//! credential checks, token issuance and ownership-scoped key management.

pub mod api_key_service;
pub mod user_service;
