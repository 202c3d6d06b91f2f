use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::{
    identity::{auth_middleware, handlers},
    infra::app_state::AppState,
};

/// Create all v1 API routes
pub fn create_v1_router(state: AppState) -> Router<AppState> {
    Router::new()
        // Public endpoints
        .route("/identities", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        // Merge protected routes
        .merge(create_protected_routes(state))
}

/// Create protected routes that require a valid bearer token
fn create_protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/identities/me",
            get(handlers::me).put(handlers::update_me),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
