//! Admin Access Guard Tests
//!
//! Drives the guard through a router built around the real `/admin/me`
//! handler, so every case is observed the way a client sees it.

use axum::{
    body::{to_bytes, Body},
    http::{header::AUTHORIZATION, Request, StatusCode},
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

use portfolio_api::auth::{JwtKeys, DEFAULT_TOKEN_TTL_DAYS};
use portfolio_api::handlers::auth::me;
use portfolio_api::middleware::require_admin;
use portfolio_api::models::User;

const SECRET: &str = "guard-test-secret";

fn keys() -> Arc<JwtKeys> {
    Arc::new(JwtKeys::new(SECRET, DEFAULT_TOKEN_TTL_DAYS).unwrap())
}

fn app(keys: Arc<JwtKeys>) -> Router {
    Router::new()
        .route("/admin/me", get(me))
        .route_layer(from_fn_with_state(keys, require_admin))
}

fn user(is_admin: bool) -> User {
    User {
        id: Uuid::new_v4(),
        username: "jordan".to_string(),
        email: "jordan@example.com".to_string(),
        password_hash: String::new(),
        is_admin,
        created_at: Utc::now(),
        updated_at: Utc::now(),
        last_login: None,
    }
}

async fn call(keys: Arc<JwtKeys>, authorization: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().uri("/admin/me");
    if let Some(value) = authorization {
        builder = builder.header(AUTHORIZATION, value);
    }
    let request = builder.body(Body::empty()).unwrap();

    let response = app(keys).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

// ============================================================================
// Accepted tokens
// ============================================================================

#[tokio::test]
async fn test_admin_token_round_trip() {
    let keys = keys();
    let admin = user(true);
    let token = keys.issue(&admin).unwrap();

    let (status, body) = call(keys, Some(&format!("Bearer {}", token))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["user_id"], admin.id.to_string());
    assert_eq!(body["data"]["username"], "jordan");
    assert_eq!(body["data"]["is_admin"], true);
}

#[tokio::test]
async fn test_token_without_bearer_prefix_is_accepted() {
    let keys = keys();
    let token = keys.issue(&user(true)).unwrap();

    let (status, _) = call(keys, Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_bearer_prefix_is_case_insensitive() {
    let keys = keys();
    let token = keys.issue(&user(true)).unwrap();

    let (status, _) = call(keys, Some(&format!("bearer {}", token))).await;

    assert_eq!(status, StatusCode::OK);
}

// ============================================================================
// Insufficient privilege (403)
// ============================================================================

#[tokio::test]
async fn test_non_admin_token_is_forbidden() {
    let keys = keys();
    let token = keys.issue(&user(false)).unwrap();

    let (status, body) = call(keys, Some(&format!("Bearer {}", token))).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Access denied");
}

#[tokio::test]
async fn test_missing_admin_flag_is_forbidden() {
    let keys = keys();
    let token = keys
        .sign(&json!({
            "user_id": Uuid::new_v4().to_string(),
            "username": "jordan",
            "exp": (Utc::now() + Duration::hours(1)).timestamp(),
        }))
        .unwrap();

    let (status, _) = call(keys, Some(&format!("Bearer {}", token))).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_string_admin_flag_is_forbidden() {
    let keys = keys();
    let token = keys
        .sign(&json!({
            "user_id": Uuid::new_v4().to_string(),
            "username": "jordan",
            "is_admin": "true",
            "exp": (Utc::now() + Duration::hours(1)).timestamp(),
        }))
        .unwrap();

    let (status, _) = call(keys, Some(&format!("Bearer {}", token))).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

// ============================================================================
// Malformed or missing credentials (401)
// ============================================================================

#[tokio::test]
async fn test_missing_header_is_unauthorized() {
    let (status, body) = call(keys(), None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "No authorization header");
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_empty_header_is_unauthorized() {
    let (status, _) = call(keys(), Some("")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_bare_bearer_is_unauthorized() {
    let (status, _) = call(keys(), Some("Bearer ")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_is_unauthorized() {
    let keys = keys();
    let token = keys
        .issue_at(&user(true), Utc::now() - Duration::days(8))
        .unwrap();

    let (status, body) = call(keys, Some(&format!("Bearer {}", token))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid or expired token");
}

#[tokio::test]
async fn test_foreign_secret_is_unauthorized() {
    let other = Arc::new(JwtKeys::new("someone-else", DEFAULT_TOKEN_TTL_DAYS).unwrap());
    let token = other.issue(&user(true)).unwrap();

    let (status, _) = call(keys(), Some(&format!("Bearer {}", token))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_uuid_subject_is_unauthorized() {
    let keys = keys();
    let token = keys
        .sign(&json!({
            "user_id": "42",
            "username": "jordan",
            "is_admin": true,
            "exp": (Utc::now() + Duration::hours(1)).timestamp(),
        }))
        .unwrap();

    let (status, body) = call(keys, Some(&format!("Bearer {}", token))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid token claims");
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let (status, _) = call(keys(), Some("Bearer not.a.jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
