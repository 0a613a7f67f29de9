//! Rate limiting configuration (spec §4.7).
//!
//! A single in-memory token bucket keyed by client IP guards the
//! `/auth/password/...` POST/PUT/PATCH routes: 11 tokens refill every 60
//! seconds, exhaustion blocks the key for 10 minutes. Login costs 2 tokens,
//! every other covered route costs 1.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_bucket_capacity")]
    pub bucket_capacity: u32,

    #[serde(default = "default_refill_window_seconds")]
    pub refill_window_seconds: u64,

    #[serde(default = "default_block_duration_seconds")]
    pub block_duration_seconds: u64,

    #[serde(default = "default_login_cost")]
    pub login_cost: u32,

    #[serde(default = "default_route_cost")]
    pub route_cost: u32,

    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_bucket_capacity() -> u32 {
    11
}
fn default_refill_window_seconds() -> u64 {
    60
}
fn default_block_duration_seconds() -> u64 {
    600
}
fn default_login_cost() -> u32 {
    2
}
fn default_route_cost() -> u32 {
    1
}
fn default_enabled() -> bool {
    true
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            bucket_capacity: default_bucket_capacity(),
            refill_window_seconds: default_refill_window_seconds(),
            block_duration_seconds: default_block_duration_seconds(),
            login_cost: default_login_cost(),
            route_cost: default_route_cost(),
            enabled: default_enabled(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_bucket() {
        let config = RateLimitConfig::default();
        assert_eq!(config.bucket_capacity, 11);
        assert_eq!(config.refill_window_seconds, 60);
        assert_eq!(config.block_duration_seconds, 600);
        assert_eq!(config.login_cost, 2);
        assert_eq!(config.route_cost, 1);
    }
}
