//! Router assembly.
//!
//! Routes fall into three classes:
//! - **public**: health and the auth endpoints
//! - **device**: authenticated with an API key
//! - **private**: authenticated with a bearer token, then gated by role
//!
//! Each private group declares its static role allow-list with its routes.

use axum::{
    Router,
    http::{Method, header},
    middleware::from_fn_with_state,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    auth::role::{ADMIN_ONLY, ALL_ROLES},
    handlers,
    middleware::{
        api_key::require_api_key,
        auth::{require_auth, require_roles},
    },
    state::AppState,
};

/// Build the full application router.
pub fn build_router(state: AppState) -> Router {
    // Public routes (no authentication required)
    let auth_routes = Router::new()
        .route("/api/v1/auth/register", post(handlers::auth::register))
        .route("/api/v1/auth/login", post(handlers::auth::login))
        .route("/api/v1/auth/refresh", post(handlers::auth::refresh));

    // Device routes (API key)
    let device_routes = Router::new()
        .route("/api/v1/esp32/identity", get(handlers::device::identity))
        .route_layer(from_fn_with_state(state.clone(), require_api_key));

    // Private routes for every role
    let member_routes = Router::new()
        .route(
            "/api/v1/user/profile",
            get(handlers::users::get_profile).put(handlers::users::update_profile),
        )
        .route(
            "/api/v1/user/change-password",
            post(handlers::users::change_password),
        )
        .route(
            "/api/v1/api-keys",
            post(handlers::api_keys::create_api_key).get(handlers::api_keys::list_api_keys),
        )
        .route(
            "/api/v1/api-keys/{id}",
            get(handlers::api_keys::get_api_key)
                .put(handlers::api_keys::update_api_key)
                .delete(handlers::api_keys::delete_api_key),
        )
        .route_layer(from_fn_with_state(ALL_ROLES, require_roles));

    // Private routes for administrators
    let admin_routes = Router::new()
        .route("/api/v1/admin/users", get(handlers::admin::list_users))
        .route(
            "/api/v1/admin/users/{id}",
            get(handlers::admin::get_user).delete(handlers::admin::delete_user),
        )
        .route_layer(from_fn_with_state(ADMIN_ONLY, require_roles));

    // Bearer authentication wraps the role gates, so it always runs first
    let private_routes = Router::new()
        .merge(member_routes)
        .merge(admin_routes)
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .merge(auth_routes)
        .merge(device_routes)
        .merge(private_routes)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ])
}
