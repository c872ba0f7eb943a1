//! JWT token generation and validation
//!
//! Handles creation and verification of admin access tokens (HS256).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::User;

/// Default lifetime of an issued token
pub const DEFAULT_TOKEN_TTL_DAYS: i64 = 7;

/// JWT-related errors
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Token encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Unexpected signing algorithm")]
    InvalidAlgorithm,

    #[error("Invalid token claims: {0}")]
    InvalidClaims(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token lifetime must be positive")]
    InvalidTtl,
}

/// Claims embedded in every issued token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// Claims as read back from an untrusted token.
///
/// `is_admin` stays untyped so that a missing or wrong-typed flag can be told
/// apart from a structurally broken token.
#[derive(Debug, Deserialize)]
struct IncomingClaims {
    user_id: String,
    username: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    is_admin: Option<serde_json::Value>,
    #[allow(dead_code)]
    exp: i64,
}

/// Verified token contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedClaims {
    pub user_id: Uuid,
    pub username: String,
    pub email: Option<String>,
    /// `Some(flag)` only when the claim was present and boolean
    pub is_admin: Option<bool>,
}

impl VerifiedClaims {
    pub fn is_privileged(&self) -> bool {
        self.is_admin == Some(true)
    }
}

/// Signing keys shared by token issuance and the access guard
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtKeys")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl JwtKeys {
    /// Build keys from the shared secret and a token lifetime in days
    pub fn new(secret: &str, ttl_days: i64) -> Result<Self, JwtError> {
        if ttl_days <= 0 {
            return Err(JwtError::InvalidTtl);
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::days(ttl_days),
        })
    }

    /// Issue a token for `user`, expiring `ttl` after now
    pub fn issue(&self, user: &User) -> Result<String, JwtError> {
        self.issue_at(user, Utc::now())
    }

    /// Issue a token for `user` as if issued at `issued_at`
    pub fn issue_at(&self, user: &User, issued_at: DateTime<Utc>) -> Result<String, JwtError> {
        let claims = Claims {
            user_id: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            is_admin: user.is_admin,
            exp: (issued_at + self.ttl).timestamp(),
        };

        self.sign(&claims)
    }

    /// Sign an arbitrary claim set with HS256
    pub fn sign<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Verify and decode a JWT token
    ///
    /// # Returns
    /// * `Ok(VerifiedClaims)` if signature, algorithm, expiry and claim shape are valid
    /// * `Err(JwtError)` otherwise
    pub fn verify(&self, token: &str) -> Result<VerifiedClaims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        let token_data =
            decode::<IncomingClaims>(token, &self.decoding, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                    ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                    ErrorKind::InvalidAlgorithm => JwtError::InvalidAlgorithm,
                    ErrorKind::Json(_) | ErrorKind::MissingRequiredClaim(_) => {
                        JwtError::InvalidClaims(e.to_string())
                    }
                    _ => JwtError::InvalidToken(e.to_string()),
                }
            })?;

        let claims = token_data.claims;
        let user_id = Uuid::parse_str(&claims.user_id)
            .map_err(|e| JwtError::InvalidClaims(format!("user_id: {}", e)))?;

        Ok(VerifiedClaims {
            user_id,
            username: claims.username,
            email: claims.email,
            is_admin: claims.is_admin.and_then(|v| v.as_bool()),
        })
    }
}
