//! Route definitions for the portfolio API

mod admin;
mod auth;
mod content;

use axum::{routing::get, Router};

pub use admin::admin_routes;
pub use auth::auth_routes;
pub use content::content_routes;

use crate::handlers::{db_health_check, health_check};
use crate::state::AppState;

/// Versioned API routes, without state applied
pub fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(content_routes())
        .merge(auth_routes(state.login_limiter.clone()))
        .merge(admin_routes(state.jwt_keys.clone()))
}

/// Full application router: `/health*` plus everything under `/api/v1`
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/db", get(db_health_check))
        .nest("/api/v1", api_routes(&state))
        .with_state(state)
}
