//! Liveness, database health and the API index

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use sqlx::PgPool;

use crate::db::{check_health, PoolStats};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub environment: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DbHealthResponse {
    pub status: &'static str,
    pub database: String,
    pub pool: PoolStats,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        environment: state.environment.as_str(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /health/db - 503 when the database does not answer
pub async fn db_health_check(
    State(pool): State<PgPool>,
) -> (StatusCode, Json<DbHealthResponse>) {
    let pool_stats = PoolStats::from_pool(&pool);

    match check_health(&pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(DbHealthResponse {
                status: "healthy",
                database: "connected".to_string(),
                pool: pool_stats,
            }),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Database health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(DbHealthResponse {
                    status: "unhealthy",
                    database: "unreachable".to_string(),
                    pool: pool_stats,
                }),
            )
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiIndex {
    pub name: &'static str,
    pub version: &'static str,
    pub endpoints: &'static [&'static str],
}

const ENDPOINTS: &[&str] = &[
    "POST /api/v1/auth/login",
    "POST /api/v1/auth/logout",
    "GET /api/v1/education",
    "GET /api/v1/education/:slug",
    "GET /api/v1/projects",
    "GET /api/v1/projects/:slug",
    "GET /api/v1/skills",
    "GET /api/v1/blog",
    "GET /api/v1/blog/:slug",
    "GET /api/v1/admin/me",
];

/// GET /api/v1
pub async fn api_index() -> Json<ApiIndex> {
    Json(ApiIndex {
        name: "Portfolio API",
        version: "v1",
        endpoints: ENDPOINTS,
    })
}
