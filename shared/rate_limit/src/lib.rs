//! Token-bucket rate limiting for the password-based authentication routes
//! (spec §4.7): a single in-memory bucket per client IP, 11 tokens
//! refilling over 60 seconds, a 10-minute hard block on exhaustion.
//!
//! ```rust,ignore
//! use shared_rate_limit::{RateLimitConfig, RateLimitState, RateLimitExt};
//!
//! let state = RateLimitState::new(RateLimitConfig::default(), ssr_ip_key);
//! let app = Router::new()
//!     .route("/auth/password/login", post(login))
//!     .rate_limit(state);
//! ```

pub mod config;
pub mod limiter;
pub mod memory_limiter;
pub mod middleware;

pub use config::RateLimitConfig;
pub use limiter::{RateLimitError, RateLimitResult, RateLimiter};
pub use memory_limiter::InMemoryRateLimiter;
pub use middleware::{RateLimitExt, RateLimitLayer, RateLimitMiddleware, RateLimitState};
