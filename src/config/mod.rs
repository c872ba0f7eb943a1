//! Configuration management for the portfolio API
//!
//! This module handles loading and validating configuration from environment variables,
//! with support for different environments (development, staging, production).

use std::env;
use std::time::Duration;
use thiserror::Error;

/// Signing secret used when `JWT_SECRET` is unset outside production.
pub const INSECURE_DEFAULT_JWT_SECRET: &str = "your-super-secret-jwt-key-change-this-in-production";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid environment value: {0}")]
    InvalidValue(String),

    #[error("Invalid port number: {0}")]
    InvalidPort(String),
}

/// Application environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Parse environment from string
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "prod" | "production" => Ok(Environment::Production),
            _ => Err(ConfigError::InvalidValue(format!(
                "Invalid environment: '{}'. Expected: dev, staging, or prod",
                s
            ))),
        }
    }

    /// Check if this is a production environment
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    /// Get the environment name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

/// Login rate limit settings
#[derive(Debug, Clone)]
pub struct LoginRateLimit {
    pub max_requests: u32,
    pub window: Duration,
    pub block_time: Duration,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Current environment
    pub environment: Environment,

    /// Bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Maximum database connections
    pub db_max_connections: u32,

    /// CORS allowed origins (comma separated)
    pub cors_allowed_origins: Option<String>,

    /// Log level (RUST_LOG)
    pub log_level: String,

    /// JWT secret for token signing
    pub jwt_secret: String,

    /// Set when `jwt_secret` fell back to the built-in default
    pub jwt_secret_is_default: bool,

    /// Access token TTL in days (default: 7)
    pub jwt_token_ttl_days: i64,

    /// Login attempt limits per client address
    pub login_rate_limit: LoginRateLimit,

    /// Prefer X-Forwarded-For / X-Real-IP over the socket address
    pub trust_proxy_headers: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = get("ENVIRONMENT")
            .or_else(|| get("ENV"))
            .map(|s| Environment::parse(&s))
            .unwrap_or(Ok(Environment::Development))?;

        let database_url = match get("DATABASE_URL") {
            Some(url) => url,
            None => database_url_from_parts(&get)?,
        };

        let host = get("HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let port = get("PORT")
            .unwrap_or_else(|| "8000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort("PORT must be a valid number".to_string()))?;

        let db_max_connections = parse_or(&get, "DB_MAX_CONNECTIONS", 25u32);

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS")
            .or_else(|| get("FRONTEND_URL"))
            .filter(|s| !s.trim().is_empty());

        let log_level = get("RUST_LOG").unwrap_or_else(|| "info".to_string());

        let (jwt_secret, jwt_secret_is_default) = match get("JWT_SECRET").filter(|s| !s.is_empty())
        {
            Some(secret) => (secret, false),
            None if environment.is_production() => {
                return Err(ConfigError::MissingEnvVar("JWT_SECRET".to_string()));
            }
            None => (INSECURE_DEFAULT_JWT_SECRET.to_string(), true),
        };

        let jwt_token_ttl_days = parse_or(&get, "JWT_TOKEN_TTL_DAYS", 7i64);
        if jwt_token_ttl_days <= 0 {
            return Err(ConfigError::InvalidValue(
                "JWT_TOKEN_TTL_DAYS must be positive".to_string(),
            ));
        }

        let max_requests = parse_or(&get, "LOGIN_RATE_LIMIT_MAX", 5u32);
        if max_requests == 0 {
            return Err(ConfigError::InvalidValue(
                "LOGIN_RATE_LIMIT_MAX must be at least 1".to_string(),
            ));
        }

        let login_rate_limit = LoginRateLimit {
            max_requests,
            window: Duration::from_secs(parse_or(&get, "LOGIN_RATE_LIMIT_WINDOW_SECS", 900u64)),
            block_time: Duration::from_secs(parse_or(&get, "LOGIN_RATE_LIMIT_BLOCK_SECS", 900u64)),
        };

        let trust_proxy_headers = get("TRUST_PROXY_HEADERS")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Config {
            database_url,
            environment,
            host,
            port,
            db_max_connections,
            cors_allowed_origins,
            log_level,
            jwt_secret,
            jwt_secret_is_default,
            jwt_token_ttl_days,
            login_rate_limit,
            trust_proxy_headers,
        })
    }

    /// Get database URL (useful for logging masked version)
    pub fn database_url_masked(&self) -> String {
        // Mask password in database URL for logging
        if let Some(at_pos) = self.database_url.find('@') {
            if let Some(colon_pos) = self.database_url[..at_pos].rfind(':') {
                let prefix = &self.database_url[..colon_pos + 1];
                let suffix = &self.database_url[at_pos..];
                return format!("{}****{}", prefix, suffix);
            }
        }
        self.database_url.clone()
    }
}

fn parse_or<F, T>(get: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    get(key).and_then(|v| v.parse::<T>().ok()).unwrap_or(default)
}

/// Assemble a postgres URL from the individual DB_* variables
fn database_url_from_parts<F>(get: &F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let host = get("DB_HOST").ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?;
    let port = get("DB_PORT").unwrap_or_else(|| "5432".to_string());
    let user = get("DB_USER").unwrap_or_else(|| "postgres".to_string());
    let password = get("DB_PASSWORD").unwrap_or_default();
    let name = get("DB_NAME").unwrap_or_else(|| "portfolio".to_string());
    let sslmode = get("DB_SSLMODE").unwrap_or_else(|| "disable".to_string());

    let credentials = if password.is_empty() {
        user
    } else {
        format!("{}:{}", user, password)
    };

    Ok(format!(
        "postgresql://{}@{}:{}/{}?sslmode={}",
        credentials, host, port, name, sslmode
    ))
}
