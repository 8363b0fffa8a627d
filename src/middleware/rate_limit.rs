//! Rate limiting middleware.
//!
//! Per-client token buckets guarding the authentication endpoints against
//! brute force. Buckets live in a concurrent map keyed by client identifier
//! (first X-Forwarded-For entry, or the peer address), so requests from
//! different clients never contend on the same entry.

use crate::error::ApiError;
use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;

/// Configuration for rate limiting.
#[derive(Clone)]
pub struct RateLimitConfig {
    /// Tokens available per bucket.
    pub capacity: u32,
    /// Interval after which a bucket snaps back to full capacity.
    pub refill_period: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            capacity: 5,
            refill_period: Duration::from_secs(60),
        }
    }
}

struct Bucket {
    available: u32,
    last_refill: Instant,
}

/// Token-bucket limiter with one bucket per client identifier.
///
/// Cheap to clone; clones share the same bucket map. Buckets are created
/// lazily and never evicted (see DESIGN.md), only `clear`/`clear_all`
/// remove them.
#[derive(Clone)]
pub struct RateLimiter {
    config: RateLimitConfig,
    buckets: Arc<DashMap<String, Bucket>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            buckets: Arc::new(DashMap::new()),
        }
    }

    /// Try to consume one token for `identifier`.
    ///
    /// Get-or-insert, refill and decrement all happen under the entry lock,
    /// so concurrent requests for the same identifier cannot double-spend
    /// the last token.
    pub fn try_consume(&self, identifier: &str) -> bool {
        let mut bucket = self
            .buckets
            .entry(identifier.to_string())
            .or_insert_with(|| Bucket {
                available: self.config.capacity,
                last_refill: Instant::now(),
            });

        Self::refill(&mut bucket, &self.config);

        if bucket.available >= 1 {
            bucket.available -= 1;
            true
        } else {
            false
        }
    }

    /// Tokens currently available for `identifier`, after applying refill.
    pub fn available_tokens(&self, identifier: &str) -> u32 {
        let mut bucket = self
            .buckets
            .entry(identifier.to_string())
            .or_insert_with(|| Bucket {
                available: self.config.capacity,
                last_refill: Instant::now(),
            });

        Self::refill(&mut bucket, &self.config);
        bucket.available
    }

    /// Drop the bucket for one identifier (administrative/test reset).
    pub fn clear(&self, identifier: &str) {
        self.buckets.remove(identifier);
    }

    /// Drop every bucket.
    pub fn clear_all(&self) {
        self.buckets.clear();
    }

    // Interval refill: the bucket returns to full capacity only once a whole
    // period has elapsed since the last refill. Partial elapsed time grants
    // no partial tokens.
    fn refill(bucket: &mut Bucket, config: &RateLimitConfig) {
        if bucket.last_refill.elapsed() >= config.refill_period {
            bucket.available = config.capacity;
            bucket.last_refill = Instant::now();
        }
    }
}

/// Limiter plus the path prefixes it applies to.
#[derive(Clone)]
pub struct RateLimitLayer {
    pub limiter: RateLimiter,
    pub throttled_prefixes: Arc<Vec<String>>,
}

impl RateLimitLayer {
    pub fn new(limiter: RateLimiter, throttled_prefixes: Vec<String>) -> Self {
        Self {
            limiter,
            throttled_prefixes: Arc::new(throttled_prefixes),
        }
    }

    fn is_throttled_path(&self, path: &str) -> bool {
        self.throttled_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }
}

/// Rate limiting middleware function.
///
/// Requests outside the throttled prefixes bypass the limiter entirely.
pub async fn rate_limit_middleware(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(layer): State<RateLimitLayer>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    if !layer.is_throttled_path(&path) {
        return next.run(request).await;
    }

    let identifier = client_identifier(&request, addr);

    if layer.limiter.try_consume(&identifier) {
        next.run(request).await
    } else {
        warn!(
            identifier = %identifier,
            path = %path,
            "Rate limit exceeded"
        );
        ApiError::RateLimited.into_response()
    }
}

/// Client identifier for bucketing.
///
/// X-Forwarded-For may contain multiple IPs; take the first one. Falls back
/// to the peer address when the header is absent.
fn client_identifier(request: &Request<Body>, addr: SocketAddr) -> String {
    request
        .headers()
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| addr.ip().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn limiter(capacity: u32, refill_period: Duration) -> RateLimiter {
        RateLimiter::new(RateLimitConfig {
            capacity,
            refill_period,
        })
    }

    #[test]
    fn test_bucket_depletion() {
        let limiter = limiter(5, Duration::from_secs(60));

        for _ in 0..5 {
            assert!(limiter.try_consume("10.0.0.1"));
        }
        assert!(!limiter.try_consume("10.0.0.1"));
        assert_eq!(limiter.available_tokens("10.0.0.1"), 0);
    }

    #[test]
    fn test_failed_consume_leaves_state_unchanged() {
        let limiter = limiter(1, Duration::from_secs(60));

        assert!(limiter.try_consume("10.0.0.1"));
        assert!(!limiter.try_consume("10.0.0.1"));
        assert!(!limiter.try_consume("10.0.0.1"));
        assert_eq!(limiter.available_tokens("10.0.0.1"), 0);
    }

    #[test]
    fn test_per_identifier_isolation() {
        let limiter = limiter(3, Duration::from_secs(60));

        for _ in 0..3 {
            assert!(limiter.try_consume("10.0.0.1"));
        }
        assert!(!limiter.try_consume("10.0.0.1"));

        // A different identifier is unaffected
        assert_eq!(limiter.available_tokens("10.0.0.2"), 3);
        assert!(limiter.try_consume("10.0.0.2"));
    }

    #[test]
    fn test_interval_refill_restores_full_capacity() {
        let limiter = limiter(3, Duration::from_millis(50));

        for _ in 0..3 {
            assert!(limiter.try_consume("10.0.0.1"));
        }
        assert!(!limiter.try_consume("10.0.0.1"));

        thread::sleep(Duration::from_millis(60));

        // Full period elapsed: bucket resets to capacity, consume leaves C-1
        assert!(limiter.try_consume("10.0.0.1"));
        assert_eq!(limiter.available_tokens("10.0.0.1"), 2);
    }

    #[test]
    fn test_partial_period_grants_nothing() {
        let limiter = limiter(2, Duration::from_millis(500));

        assert!(limiter.try_consume("10.0.0.1"));
        assert!(limiter.try_consume("10.0.0.1"));

        thread::sleep(Duration::from_millis(50));

        assert_eq!(limiter.available_tokens("10.0.0.1"), 0);
        assert!(!limiter.try_consume("10.0.0.1"));
    }

    #[test]
    fn test_clear_resets_identifier() {
        let limiter = limiter(1, Duration::from_secs(60));

        assert!(limiter.try_consume("10.0.0.1"));
        assert!(!limiter.try_consume("10.0.0.1"));

        limiter.clear("10.0.0.1");
        assert!(limiter.try_consume("10.0.0.1"));
    }

    #[test]
    fn test_clear_all_resets_everything() {
        let limiter = limiter(1, Duration::from_secs(60));

        assert!(limiter.try_consume("10.0.0.1"));
        assert!(limiter.try_consume("10.0.0.2"));
        limiter.clear_all();

        assert!(limiter.try_consume("10.0.0.1"));
        assert!(limiter.try_consume("10.0.0.2"));
    }

    #[test]
    fn test_no_double_spend_under_contention() {
        let capacity = 8u32;
        let limiter = limiter(capacity, Duration::from_secs(60));
        let threads = 32;

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let limiter = limiter.clone();
                thread::spawn(move || limiter.try_consume("10.0.0.1"))
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|allowed| *allowed)
            .count();

        assert_eq!(successes, capacity as usize);
        assert_eq!(limiter.available_tokens("10.0.0.1"), 0);
    }
}
