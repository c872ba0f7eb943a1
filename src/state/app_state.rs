//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::auth::{AuthService, JwtKeys};
use crate::blog::BlogService;
use crate::config::Environment;
use crate::education::EducationService;
use crate::middleware::RateLimiter;
use crate::projects::ProjectService;
use crate::skills::SkillService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub jwt_keys: Arc<JwtKeys>,
    pub login_limiter: RateLimiter,
    pub education_service: Arc<EducationService>,
    pub skill_service: Arc<SkillService>,
    pub project_service: Arc<ProjectService>,
    pub blog_service: Arc<BlogService>,
    pub db_pool: PgPool,
    pub environment: Environment,
}

impl AppState {
    pub fn new(
        db_pool: PgPool,
        jwt_keys: Arc<JwtKeys>,
        login_limiter: RateLimiter,
        environment: Environment,
    ) -> Self {
        Self {
            auth_service: Arc::new(AuthService::new(db_pool.clone(), jwt_keys.clone())),
            jwt_keys,
            login_limiter,
            education_service: Arc::new(EducationService::new(db_pool.clone())),
            skill_service: Arc::new(SkillService::new(db_pool.clone())),
            project_service: Arc::new(ProjectService::new(db_pool.clone())),
            blog_service: Arc::new(BlogService::new(db_pool.clone())),
            db_pool,
            environment,
        }
    }
}

impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth_service.clone()
    }
}

impl FromRef<AppState> for Arc<JwtKeys> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.jwt_keys.clone()
    }
}

impl FromRef<AppState> for RateLimiter {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.login_limiter.clone()
    }
}

impl FromRef<AppState> for Arc<EducationService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.education_service.clone()
    }
}

impl FromRef<AppState> for Arc<SkillService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.skill_service.clone()
    }
}

impl FromRef<AppState> for Arc<ProjectService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.project_service.clone()
    }
}

impl FromRef<AppState> for Arc<BlogService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.blog_service.clone()
    }
}

impl FromRef<AppState> for PgPool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}
