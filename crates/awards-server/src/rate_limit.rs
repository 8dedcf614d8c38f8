//! Per-route, per-client token-bucket rate limiting.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::client_ip::ClientIp;
use crate::error::ApiError;

pub const LOGIN_PER_MINUTE: u32 = 10;
pub const UPLOAD_PER_MINUTE: u32 = 10;
pub const CREATE_PER_MINUTE: u32 = 20;
pub const CAST_VOTE_PER_MINUTE: u32 = 10;
pub const READ_VOTE_PER_MINUTE: u32 = 240;
pub const DEFAULT_PER_MINUTE: u32 = 60;

/// Buckets untouched for this long are dropped by [`RateLimiter::prune_idle`].
pub const IDLE_BUCKET_TTL: Duration = Duration::from_secs(600);

#[derive(Debug, Clone)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

#[derive(Debug, Default)]
pub struct RateLimiter {
    buckets: Mutex<HashMap<(&'static str, String), Bucket>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take one token from the `(scope, key)` bucket.
    ///
    /// A bucket holds `per_minute` tokens and refills at `per_minute / 60`
    /// tokens per second.
    pub async fn allow(&self, scope: &'static str, key: &str, per_minute: u32) -> bool {
        let capacity = f64::from(per_minute.max(1));
        let refill_per_sec = capacity / 60.0;
        let now = Instant::now();

        let mut buckets = self.buckets.lock().await;
        let bucket = buckets
            .entry((scope, key.to_string()))
            .or_insert_with(|| Bucket {
                tokens: capacity,
                last_refill: now,
            });

        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        bucket.last_refill = now;
        bucket.tokens = elapsed.mul_add(refill_per_sec, bucket.tokens).min(capacity);

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Drop buckets idle for longer than `max_idle`. Returns how many went.
    pub async fn prune_idle(&self, max_idle: Duration) -> usize {
        let now = Instant::now();
        let mut buckets = self.buckets.lock().await;
        let before = buckets.len();
        buckets.retain(|_, b| now.duration_since(b.last_refill) <= max_idle);
        let pruned = before - buckets.len();
        if pruned > 0 {
            debug!(pruned, remaining = buckets.len(), "Pruned idle rate-limit buckets");
        }
        pruned
    }
}

/// Limit applied to one route, used as middleware state.
#[derive(Debug, Clone)]
pub struct RouteLimit {
    pub limiter: Arc<RateLimiter>,
    pub scope: &'static str,
    pub per_minute: u32,
}

impl RouteLimit {
    pub const fn new(limiter: Arc<RateLimiter>, scope: &'static str, per_minute: u32) -> Self {
        Self {
            limiter,
            scope,
            per_minute,
        }
    }
}

/// Middleware rejecting requests over the route's ceiling with 429.
pub async fn enforce(
    State(limit): State<RouteLimit>,
    ClientIp(ip): ClientIp,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !limit.limiter.allow(limit.scope, &ip, limit.per_minute).await {
        warn!(scope = limit.scope, client = %ip, "Rate limit exceeded");
        return Err(ApiError::RateLimited);
    }
    Ok(next.run(req).await)
}
