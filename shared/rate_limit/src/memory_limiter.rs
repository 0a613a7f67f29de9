//! In-process token-bucket rate limiter (spec §4.7).
//!
//! Each key owns a bucket that refills continuously at
//! `bucket_capacity / refill_window_seconds` tokens per second, capped at
//! `bucket_capacity`. Spending more tokens than are available hard-blocks
//! the key for `block_duration_seconds`, independent of any refill that
//! would otherwise have happened in the meantime. This is intentionally
//! per-process state (§9 Open Question (c)): a multi-instance deployment
//! gets independent buckets per instance rather than a shared Redis-backed
//! counter.

use crate::config::RateLimitConfig;
use crate::limiter::{RateLimitError, RateLimitResult, RateLimiter};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct Bucket {
    tokens: f64,
    last_refill: u64,
    blocked_until: Option<u64>,
}

impl Bucket {
    fn new(capacity: u32) -> Self {
        Self { tokens: capacity as f64, last_refill: now_secs(), blocked_until: None }
    }
}

fn now_secs() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs()
}

/// Token-bucket limiter keyed by caller-supplied string (client IP per §4.7).
#[derive(Debug)]
pub struct InMemoryRateLimiter {
    buckets: Arc<RwLock<HashMap<String, Bucket>>>,
    config: RateLimitConfig,
}

impl InMemoryRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self { buckets: Arc::new(RwLock::new(HashMap::new())), config }
    }

    fn refill_rate_per_sec(&self) -> f64 {
        self.config.bucket_capacity as f64 / self.config.refill_window_seconds.max(1) as f64
    }
}

impl Clone for InMemoryRateLimiter {
    fn clone(&self) -> Self {
        Self { buckets: Arc::clone(&self.buckets), config: self.config.clone() }
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(&self, key: &str, cost: u32) -> Result<RateLimitResult, RateLimitError> {
        if !self.config.enabled {
            return Ok(RateLimitResult::allowed(self.config.bucket_capacity));
        }

        let now = now_secs();
        let mut buckets = self.buckets.write().await;
        let bucket = buckets.entry(key.to_string()).or_insert_with(|| Bucket::new(self.config.bucket_capacity));

        if let Some(blocked_until) = bucket.blocked_until {
            if now < blocked_until {
                return Ok(RateLimitResult::denied(blocked_until - now));
            }
            // Block expired: start the key over with a full bucket.
            bucket.tokens = self.config.bucket_capacity as f64;
            bucket.blocked_until = None;
            bucket.last_refill = now;
        }

        let elapsed = now.saturating_sub(bucket.last_refill) as f64;
        bucket.tokens = (bucket.tokens + elapsed * self.refill_rate_per_sec())
            .min(self.config.bucket_capacity as f64);
        bucket.last_refill = now;

        if bucket.tokens >= cost as f64 {
            bucket.tokens -= cost as f64;
            Ok(RateLimitResult::allowed(bucket.tokens as u32))
        } else {
            bucket.blocked_until = Some(now + self.config.block_duration_seconds);
            Ok(RateLimitResult::denied(self.config.block_duration_seconds))
        }
    }

    async fn reset(&self, key: &str) -> Result<(), RateLimitError> {
        let mut buckets = self.buckets.write().await;
        buckets.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter() -> InMemoryRateLimiter {
        InMemoryRateLimiter::new(RateLimitConfig::default())
    }

    #[tokio::test]
    async fn spends_down_the_bucket() {
        let limiter = limiter();
        for _ in 0..5 {
            let result = limiter.check("1.2.3.4", 2).await.unwrap();
            assert!(result.allowed);
        }
        // 11 capacity, 5 * 2 = 10 spent, 1 left — next login (cost 2) denied.
        let result = limiter.check("1.2.3.4", 2).await.unwrap();
        assert!(!result.allowed);
        assert_eq!(result.retry_after_seconds, 600);
    }

    #[tokio::test]
    async fn block_outlasts_a_would_be_refill() {
        let limiter = limiter();
        for _ in 0..6 {
            limiter.check("5.6.7.8", 2).await.unwrap();
        }
        let first_denial = limiter.check("5.6.7.8", 2).await.unwrap();
        assert!(!first_denial.allowed);
        let second_try = limiter.check("5.6.7.8", 1).await.unwrap();
        assert!(!second_try.allowed, "a blocked key stays blocked even for cheaper requests");
    }

    #[tokio::test]
    async fn different_keys_are_independent() {
        let limiter = limiter();
        for _ in 0..5 {
            limiter.check("key-a", 2).await.unwrap();
        }
        let other = limiter.check("key-b", 2).await.unwrap();
        assert!(other.allowed);
    }

    #[tokio::test]
    async fn reset_clears_a_block() {
        let limiter = limiter();
        for _ in 0..6 {
            limiter.check("blocked", 2).await.unwrap();
        }
        assert!(!limiter.check("blocked", 1).await.unwrap().allowed);
        limiter.reset("blocked").await.unwrap();
        assert!(limiter.check("blocked", 1).await.unwrap().allowed);
    }

    #[tokio::test]
    async fn disabled_limiter_always_allows() {
        let mut config = RateLimitConfig::default();
        config.enabled = false;
        let limiter = InMemoryRateLimiter::new(config);
        for _ in 0..100 {
            assert!(limiter.check("anyone", 2).await.unwrap().allowed);
        }
    }
}
