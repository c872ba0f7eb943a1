//! Authentication routes

use axum::{middleware::from_fn_with_state, routing::post, Router};

use crate::handlers::auth;
use crate::middleware::{rate_limit, RateLimiter};
use crate::state::AppState;

/// Login is throttled per client by `limiter`; logout is not.
pub fn auth_routes(limiter: RateLimiter) -> Router<AppState> {
    Router::new()
        .route(
            "/auth/login",
            post(auth::login).route_layer(from_fn_with_state(limiter, rate_limit)),
        )
        .route("/auth/logout", post(auth::logout))
}
