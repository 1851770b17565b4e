//! Shared application state handed to every handler and middleware.

use std::sync::Arc;

use chrono::FixedOffset;

use crate::auth::token::TokenManager;
use crate::repository::{ApiKeyRepository, UserRepository};

/// Immutable after startup; cloning only bumps reference counts.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub api_keys: Arc<dyn ApiKeyRepository>,
    pub tokens: Arc<TokenManager>,
    /// Offset used when rendering timestamps in responses
    pub display_offset: FixedOffset,
}
