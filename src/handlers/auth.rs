//! Authentication HTTP handlers
//!
//! Email/password login for the site administrator.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::auth::AuthService;
use crate::error::ApiError;
use crate::extract::AppJson;
use crate::middleware::AdminIdentity;
use crate::models::{ApiResponse, LoginRequest, LoginResponse, MessageResponse};

/// POST /auth/login - Exchange credentials for an access token
pub async fn login(
    State(service): State<Arc<AuthService>>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let response = service.login(request).await?;
    Ok(Json(response))
}

/// POST /auth/logout - Tokens are stateless; the client discards its copy
pub async fn logout() -> Json<MessageResponse> {
    Json(MessageResponse::new("Logged out successfully"))
}

/// GET /admin/me - Identity attached by the access guard
pub async fn me(identity: AdminIdentity) -> Json<ApiResponse<AdminIdentity>> {
    Json(ApiResponse::ok(identity))
}
