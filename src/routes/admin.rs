//! Admin routes, all behind the access guard

use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, patch, post},
    Router,
};

use crate::auth::JwtKeys;
use crate::handlers::{auth, blog, education, projects, skills};
use crate::middleware::require_admin;
use crate::state::AppState;

pub fn admin_routes(keys: Arc<JwtKeys>) -> Router<AppState> {
    Router::new()
        .route("/admin/me", get(auth::me))
        .route("/admin/education", post(education::create_education))
        .route(
            "/admin/education/:id",
            patch(education::update_education).delete(education::delete_education),
        )
        .route("/admin/modules", post(education::create_module))
        .route(
            "/admin/modules/:id",
            patch(education::update_module).delete(education::delete_module),
        )
        .route("/admin/skills", post(skills::create_skill))
        .route(
            "/admin/skills/:id",
            patch(skills::update_skill).delete(skills::delete_skill),
        )
        .route("/admin/projects", post(projects::create_project))
        .route(
            "/admin/projects/:id",
            patch(projects::update_project).delete(projects::delete_project),
        )
        .route(
            "/admin/blog",
            get(blog::list_all_posts).post(blog::create_post),
        )
        .route(
            "/admin/blog/:id",
            patch(blog::update_post).delete(blog::delete_post),
        )
        .route_layer(from_fn_with_state(keys, require_admin))
}
