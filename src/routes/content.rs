//! Public read-only content routes

use axum::{routing::get, Router};

use crate::handlers::{api_index, blog, education, projects, skills};
use crate::state::AppState;

pub fn content_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(api_index))
        .route("/education", get(education::list_education))
        .route("/education/:slug", get(education::get_education))
        .route("/projects", get(projects::list_projects))
        .route("/projects/:slug", get(projects::get_project))
        .route("/skills", get(skills::list_skills))
        .route("/blog", get(blog::list_posts))
        .route("/blog/:slug", get(blog::get_post))
}
