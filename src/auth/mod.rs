//! Authentication module for the portfolio API
//!
//! - Email/password login for admin users (bcrypt)
//! - JWT token generation and validation

mod jwt;
mod service;

pub use jwt::{Claims, JwtError, JwtKeys, VerifiedClaims, DEFAULT_TOKEN_TTL_DAYS};
pub use service::{verify_password, AuthService};
