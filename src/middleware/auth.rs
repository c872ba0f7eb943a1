//! Authentication middleware
//!
//! Guards admin routes: verifies the bearer token and attaches the caller's
//! identity to the request for downstream handlers.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderValue},
    middleware::Next,
    response::Response,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{JwtError, JwtKeys};
use crate::error::ApiError;

/// Admin identity extracted from a verified token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminIdentity {
    pub user_id: Uuid,
    pub username: String,
    pub is_admin: bool,
}

/// Middleware to require a valid admin token.
///
/// Use with `axum::middleware::from_fn_with_state` on the admin router.
pub async fn require_admin(
    State(keys): State<Arc<JwtKeys>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = authorize(request.headers().get(AUTHORIZATION), &keys)?;

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

/// Validate an `Authorization` header value and return the admin identity
pub fn authorize(header: Option<&HeaderValue>, keys: &JwtKeys) -> Result<AdminIdentity, ApiError> {
    let raw = header
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("No authorization header".to_string()))?;

    let token = strip_bearer(raw);
    if token.is_empty() {
        return Err(ApiError::Unauthorized(
            "Invalid or expired token".to_string(),
        ));
    }

    let claims = keys.verify(token).map_err(|e| {
        tracing::debug!(error = %e, "Rejected access token");
        match e {
            JwtError::InvalidClaims(_) => ApiError::Unauthorized("Invalid token claims".to_string()),
            _ => ApiError::Unauthorized("Invalid or expired token".to_string()),
        }
    })?;

    if !claims.is_privileged() {
        tracing::debug!(user_id = %claims.user_id, "Token lacks admin privilege");
        return Err(ApiError::Forbidden("Access denied".to_string()));
    }

    Ok(AdminIdentity {
        user_id: claims.user_id,
        username: claims.username,
        is_admin: true,
    })
}

/// Drop an optional, case-insensitive `Bearer ` prefix
fn strip_bearer(value: &str) -> &str {
    match value.get(..7) {
        Some(prefix) if prefix.eq_ignore_ascii_case("bearer ") => value[7..].trim(),
        _ => value,
    }
}

/// Extractor for the identity attached by [`require_admin`]
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(admin: AdminIdentity) -> impl IntoResponse {
///     format!("Hello, {}", admin.username)
/// }
/// ```
#[async_trait]
impl<S> FromRequestParts<S> for AdminIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AdminIdentity>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))
    }
}
