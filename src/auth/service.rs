//! Authentication service
//!
//! Core business logic for admin email/password login.

use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use validator::Validate;

use crate::error::ApiError;
use crate::models::{LoginRequest, LoginResponse, User};

use super::jwt::JwtKeys;

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db_pool: PgPool,
    keys: Arc<JwtKeys>,
}

impl AuthService {
    pub fn new(db_pool: PgPool, keys: Arc<JwtKeys>) -> Self {
        Self { db_pool, keys }
    }

    /// Check credentials and issue an access token
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, ApiError> {
        if request.email.is_empty() || request.password.is_empty() {
            return Err(ApiError::BadRequest(
                "Email and password are required".to_string(),
            ));
        }

        if request.validate().is_err() {
            return Err(ApiError::BadRequest("Invalid email format".to_string()));
        }

        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, is_admin,
                   created_at, updated_at, last_login
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(&request.email)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or_else(|| ApiError::BadRequest("Invalid credentials".to_string()))?;

        if !user.is_admin {
            tracing::warn!(user_id = %user.id, "Login attempt by non-admin user");
            return Err(ApiError::Forbidden("Access denied".to_string()));
        }

        let password = request.password;
        let hash = user.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| ApiError::InternalError(format!("Password check failed: {}", e)))?;

        if !matches {
            tracing::info!(user_id = %user.id, "Login rejected: wrong password");
            return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
        }

        // A failed timestamp update must not block the login
        if let Err(e) = sqlx::query("UPDATE users SET last_login = $1 WHERE id = $2")
            .bind(Utc::now())
            .bind(user.id)
            .execute(&self.db_pool)
            .await
        {
            tracing::warn!(user_id = %user.id, error = %e, "Failed to update last_login");
        }

        let token = self
            .keys
            .issue(&user)
            .map_err(|e| ApiError::InternalError(format!("Failed to generate token: {}", e)))?;

        tracing::info!(user_id = %user.id, username = %user.username, "Admin logged in");

        Ok(LoginResponse {
            token,
            user: user.into(),
        })
    }
}

/// Compare a plaintext password with a bcrypt hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    match bcrypt::verify(password, hash) {
        Ok(matches) => matches,
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash could not be checked");
            false
        }
    }
}
