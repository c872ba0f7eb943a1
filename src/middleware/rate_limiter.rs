//! Login rate limiting middleware
//!
//! Counts requests per client address inside a fixed window. A client that
//! reaches `max_requests` is rejected until `window` has passed since its last
//! admitted request; rejected attempts do not move that point forward.
//!
//! Each limiter owns one background sweep that drops idle visitors every
//! [`SWEEP_INTERVAL`]. The sweep stops on [`RateLimiter::shutdown`] or when the
//! last clone of the limiter is dropped.

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use std::{collections::HashMap, net::SocketAddr, sync::Arc, time::Duration};
use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};

use crate::config::LoginRateLimit;
use crate::error::ApiError;

/// How often idle visitors are evicted
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Message returned with every 429 from the login limiter
pub const TOO_MANY_ATTEMPTS: &str = "Too many login attempts. Please try again later.";

/// Rate limit settings, fixed for the lifetime of a limiter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Requests admitted per window
    pub max_requests: u32,
    /// Counting interval, also the idle time after which a visitor is evicted
    pub window: Duration,
    /// Accepted for configuration compatibility; blocking is governed by `window`
    pub block_time: Duration,
}

impl RateLimitConfig {
    /// Five attempts per fifteen minutes
    pub fn login_default() -> Self {
        Self {
            max_requests: 5,
            window: Duration::from_secs(15 * 60),
            block_time: Duration::from_secs(15 * 60),
        }
    }
}

impl From<&LoginRateLimit> for RateLimitConfig {
    fn from(settings: &LoginRateLimit) -> Self {
        Self {
            max_requests: settings.max_requests,
            window: settings.window,
            block_time: settings.block_time,
        }
    }
}

/// Per-client counter
#[derive(Debug, Clone, Copy)]
struct Visitor {
    last_seen: Instant,
    count: u32,
}

/// Outcome of a rate limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    Limited {
        /// Time until the client's window lapses
        retry_after: Duration,
    },
}

impl RateLimitDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitDecision::Allowed)
    }
}

type VisitorTable = Arc<Mutex<HashMap<String, Visitor>>>;

/// Aborts the sweep when the owning limiter goes away
struct SweepTask {
    handle: JoinHandle<()>,
}

impl Drop for SweepTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Rate limiter state
///
/// Cloning is cheap and every clone shares the same visitor table and sweep.
#[derive(Clone)]
pub struct RateLimiter {
    visitors: VisitorTable,
    config: RateLimitConfig,
    trust_proxy_headers: bool,
    sweeper: Arc<SweepTask>,
}

impl RateLimiter {
    /// Create a new rate limiter and start its sweep.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: RateLimitConfig) -> Self {
        let visitors: VisitorTable = Arc::new(Mutex::new(HashMap::new()));

        if config.block_time != config.window {
            tracing::debug!(
                block_time_secs = config.block_time.as_secs(),
                window_secs = config.window.as_secs(),
                "block_time differs from window; blocks still lapse with the window"
            );
        }

        let handle = tokio::spawn(run_sweeper(visitors.clone(), config.window));

        Self {
            visitors,
            config,
            trust_proxy_headers: false,
            sweeper: Arc::new(SweepTask { handle }),
        }
    }

    /// Key clients by X-Forwarded-For / X-Real-IP when present
    pub fn trust_proxy_headers(mut self, trust: bool) -> Self {
        self.trust_proxy_headers = trust;
        self
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Check if a request is allowed
    pub async fn check(&self, key: &str) -> RateLimitDecision {
        self.check_at(key, Instant::now()).await
    }

    /// Check a request observed at `now`.
    ///
    /// The lock is held across the whole read-modify-write.
    pub async fn check_at(&self, key: &str, now: Instant) -> RateLimitDecision {
        let mut visitors = self.visitors.lock().await;

        let Some(visitor) = visitors.get_mut(key) else {
            visitors.insert(
                key.to_string(),
                Visitor {
                    last_seen: now,
                    count: 1,
                },
            );
            return RateLimitDecision::Allowed;
        };

        let elapsed = now.saturating_duration_since(visitor.last_seen);

        if elapsed > self.config.window {
            visitor.count = 1;
            visitor.last_seen = now;
            return RateLimitDecision::Allowed;
        }

        if visitor.count >= self.config.max_requests {
            return RateLimitDecision::Limited {
                retry_after: self.config.window - elapsed,
            };
        }

        visitor.count += 1;
        visitor.last_seen = now;
        RateLimitDecision::Allowed
    }

    /// Evict visitors idle longer than the window; returns how many were removed
    pub async fn sweep(&self) -> usize {
        evict_stale(&self.visitors, self.config.window, Instant::now()).await
    }

    /// Current count for `key`, if tracked
    pub async fn visitor_count(&self, key: &str) -> Option<u32> {
        self.visitors.lock().await.get(key).map(|v| v.count)
    }

    /// Number of tracked visitors
    pub async fn len(&self) -> usize {
        self.visitors.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Stop the background sweep. Checks keep working; idle entries are no
    /// longer evicted.
    pub fn shutdown(&self) {
        self.sweeper.handle.abort();
    }

    /// Whether the background sweep has stopped
    pub fn is_shut_down(&self) -> bool {
        self.sweeper.handle.is_finished()
    }
}

async fn evict_stale(visitors: &VisitorTable, window: Duration, now: Instant) -> usize {
    let mut visitors = visitors.lock().await;
    let before = visitors.len();
    visitors.retain(|_, v| now.saturating_duration_since(v.last_seen) <= window);
    before - visitors.len()
}

async fn run_sweeper(visitors: VisitorTable, window: Duration) {
    let mut ticker = tokio::time::interval_at(Instant::now() + SWEEP_INTERVAL, SWEEP_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let removed = evict_stale(&visitors, window, Instant::now()).await;
        if removed > 0 {
            tracing::debug!(removed, "Evicted idle rate limit entries");
        }
    }
}

/// Rate limiting middleware for use with `axum::middleware::from_fn_with_state`
pub async fn rate_limit(
    State(limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let client_key = extract_client_ip(&request, limiter.trust_proxy_headers);

    if let RateLimitDecision::Limited { retry_after } = limiter.check(&client_key).await {
        tracing::warn!(client = %client_key, "Rate limit exceeded");
        return Err(ApiError::TooManyRequests {
            message: TOO_MANY_ATTEMPTS.to_string(),
            retry_after_secs: retry_after_secs(retry_after),
        });
    }

    Ok(next.run(request).await)
}

/// Whole seconds for the `Retry-After` header, rounded up and never zero
fn retry_after_secs(retry_after: Duration) -> u64 {
    let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
    secs.max(1)
}

/// Extract the client identifier for a request
pub fn extract_client_ip(request: &Request, trust_proxy_headers: bool) -> String {
    if trust_proxy_headers {
        if let Some(ip) = forwarded_ip(request) {
            return ip;
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn forwarded_ip(request: &Request) -> Option<String> {
    let headers = request.headers();

    // Try X-Forwarded-For first
    if let Some(ip) = headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        return Some(ip.to_string());
    }

    headers
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
