//! Device endpoints, authenticated with an API key.

use axum::{Extension, Json};

use crate::models::api_key::DeviceIdentity;

/// `GET /api/v1/esp32/identity`
///
/// Lets a device confirm its key works and learn which user it acts for.
///
/// ```json
/// { "user_id": 7, "api_key_id": 3 }
/// ```
pub async fn identity(Extension(identity): Extension<DeviceIdentity>) -> Json<DeviceIdentity> {
    Json(identity)
}
