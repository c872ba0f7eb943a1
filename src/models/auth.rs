//! Authentication models for the portfolio API

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// ============================================================================
// Request/Response DTOs
// ============================================================================

/// Login credentials
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(email(message = "Invalid email format"), length(max = 254))]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Successful login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: LoginUser,
}

/// User summary returned with a token (sanitized for API)
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoginUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
}
