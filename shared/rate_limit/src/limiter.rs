//! Rate limiter trait and result types (spec §4.7).

use async_trait::async_trait;

/// Outcome of a token-bucket check against a single key.
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    /// Whether the request may proceed.
    pub allowed: bool,
    /// Tokens left in the bucket after this check (0 when denied).
    pub remaining: u32,
    /// Seconds the caller should wait before retrying.
    pub retry_after_seconds: u64,
}

impl RateLimitResult {
    pub fn allowed(remaining: u32) -> Self {
        Self { allowed: true, remaining, retry_after_seconds: 0 }
    }

    pub fn denied(retry_after_seconds: u64) -> Self {
        Self { allowed: false, remaining: 0, retry_after_seconds }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("internal rate limiter error: {0}")]
    InternalError(String),
}

/// A single-bucket-per-key rate limiter. The bucket refills continuously
/// over `refill_window_seconds` up to `bucket_capacity`; once a key is
/// exhausted it is hard-blocked for `block_duration_seconds` regardless of
/// refill (spec §4.7).
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Spend `cost` tokens from the bucket identified by `key`.
    async fn check(&self, key: &str, cost: u32) -> Result<RateLimitResult, RateLimitError>;

    /// Clear a key's bucket and any active block, e.g. after a successful
    /// login resets the caller's standing.
    async fn reset(&self, key: &str) -> Result<(), RateLimitError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowed_result_carries_remaining() {
        let result = RateLimitResult::allowed(7);
        assert!(result.allowed);
        assert_eq!(result.remaining, 7);
        assert_eq!(result.retry_after_seconds, 0);
    }

    #[test]
    fn denied_result_carries_retry_after() {
        let result = RateLimitResult::denied(600);
        assert!(!result.allowed);
        assert_eq!(result.remaining, 0);
        assert_eq!(result.retry_after_seconds, 600);
    }
}
