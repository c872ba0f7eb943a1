//! Middleware for the portfolio API
//!
//! Request tracing, login rate limiting, security headers and the admin
//! access guard.

pub mod auth;
pub mod rate_limiter;
mod request_trace;
mod security;

pub use auth::{authorize, require_admin, AdminIdentity};
pub use rate_limiter::{
    extract_client_ip, rate_limit, RateLimitConfig, RateLimitDecision, RateLimiter,
    SWEEP_INTERVAL, TOO_MANY_ATTEMPTS,
};
pub use request_trace::request_tracing;
pub use security::{hsts_header, security_headers};
