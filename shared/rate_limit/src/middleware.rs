//! Axum layer applying the token-bucket limiter to the password-based
//! authentication routes (spec §4.7).

use crate::config::RateLimitConfig;
use crate::limiter::RateLimiter;
use crate::memory_limiter::InMemoryRateLimiter;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{header, HeaderValue, Method, Request, Response, StatusCode};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::{debug, warn};

type HmacSha256 = Hmac<Sha256>;

/// Shared state handed to the layer: the limiter plus the key used to
/// verify `X-SSR-Ip-Verification`.
#[derive(Clone)]
pub struct RateLimitState {
    pub limiter: Arc<InMemoryRateLimiter>,
    pub config: RateLimitConfig,
    /// Shared secret for the `X-SSR-Ip` override header. `None` disables
    /// the override entirely — `X-SSR-Ip` is then ignored.
    pub ssr_ip_verification_key: Option<String>,
}

impl RateLimitState {
    pub fn new(config: RateLimitConfig, ssr_ip_verification_key: Option<String>) -> Self {
        let limiter = Arc::new(InMemoryRateLimiter::new(config.clone()));
        Self { limiter, config, ssr_ip_verification_key }
    }
}

/// Cost of a request against the bucket: login attempts are more expensive
/// than other covered mutations (spec §4.7).
fn cost_for(path: &str, method: &Method, config: &RateLimitConfig) -> Option<u32> {
    if !matches!(*method, Method::POST | Method::PUT | Method::PATCH) {
        return None;
    }
    if !path.starts_with("/auth/password") {
        return None;
    }
    if path.ends_with("/login") {
        Some(config.login_cost)
    } else {
        Some(config.route_cost)
    }
}

/// Verify `X-SSR-Ip-Verification` as an HMAC-SHA256 of `X-SSR-Ip` under the
/// shared secret, hex-encoded. Returns the overridden IP only when both
/// headers are present and the signature checks out.
fn verify_ssr_ip_override<B>(req: &Request<B>, secret: &str) -> Option<String> {
    let ip = req.headers().get("x-ssr-ip")?.to_str().ok()?;
    let signature_hex = req.headers().get("x-ssr-ip-verification")?.to_str().ok()?;
    let signature = hex::decode(signature_hex).ok()?;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(ip.as_bytes());
    mac.verify_slice(&signature).ok()?;

    Some(ip.to_string())
}

fn client_ip<B>(req: &Request<B>, state: &RateLimitState) -> String {
    if let Some(secret) = &state.ssr_ip_verification_key {
        if let Some(ip) = verify_ssr_ip_override(req, secret) {
            return ip;
        }
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[derive(Clone)]
pub struct RateLimitLayer {
    state: RateLimitState,
}

impl RateLimitLayer {
    pub fn new(state: RateLimitState) -> Self {
        Self { state }
    }
}

impl<S> Layer<S> for RateLimitLayer {
    type Service = RateLimitMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RateLimitMiddleware { inner, state: self.state.clone() }
    }
}

#[derive(Clone)]
pub struct RateLimitMiddleware<S> {
    inner: S,
    state: RateLimitState,
}

impl<S> Service<Request<Body>> for RateLimitMiddleware<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response<Body>;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let state = self.state.clone();
        let mut inner = self.inner.clone();

        let Some(cost) = cost_for(req.uri().path(), req.method(), &state.config) else {
            return Box::pin(async move { inner.call(req).await });
        };

        Box::pin(async move {
            let ip = client_ip(&req, &state);

            match state.limiter.check(&ip, cost).await {
                Ok(result) if result.allowed => inner.call(req).await,
                Ok(result) => {
                    debug!(ip, retry_after = result.retry_after_seconds, "rate limit exceeded");
                    Ok(rate_limit_exceeded_response(result.retry_after_seconds))
                },
                Err(e) => {
                    warn!("rate limiter check failed, allowing request: {}", e);
                    inner.call(req).await
                },
            }
        })
    }
}

fn rate_limit_exceeded_response(retry_after_seconds: u64) -> Response<Body> {
    let body = serde_json::json!({
        "key": "server.internal.rateLimit",
        "status": 429,
        "info": { "retryAfterSeconds": retry_after_seconds },
    });

    let mut response = Response::builder()
        .status(StatusCode::TOO_MANY_REQUESTS)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    if let Ok(v) = HeaderValue::from_str(&retry_after_seconds.to_string()) {
        response.headers_mut().insert("retry-after", v);
    }

    response
}

/// Extension trait for attaching the layer to a router.
pub trait RateLimitExt {
    fn rate_limit(self, state: RateLimitState) -> Self;
}

impl<S> RateLimitExt for axum::Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn rate_limit(self, state: RateLimitState) -> Self {
        self.layer(RateLimitLayer::new(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_route_costs_more_than_other_routes() {
        let config = RateLimitConfig::default();
        assert_eq!(
            cost_for("/auth/password/login", &Method::POST, &config),
            Some(config.login_cost)
        );
        assert_eq!(
            cost_for("/auth/password/register", &Method::POST, &config),
            Some(config.route_cost)
        );
    }

    #[test]
    fn get_requests_are_not_covered() {
        let config = RateLimitConfig::default();
        assert_eq!(cost_for("/auth/password/login", &Method::GET, &config), None);
    }

    #[test]
    fn unrelated_paths_are_not_covered() {
        let config = RateLimitConfig::default();
        assert_eq!(cost_for("/auth/anonymous/login", &Method::POST, &config), None);
    }

    #[test]
    fn ssr_ip_override_requires_a_valid_signature() {
        let secret = "ssr-secret";
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(b"203.0.113.9");
        let signature = hex::encode(mac.finalize().into_bytes());

        let req = Request::builder()
            .header("x-ssr-ip", "203.0.113.9")
            .header("x-ssr-ip-verification", signature)
            .body(Body::empty())
            .unwrap();
        assert_eq!(verify_ssr_ip_override(&req, secret), Some("203.0.113.9".to_string()));

        let tampered = Request::builder()
            .header("x-ssr-ip", "203.0.113.9")
            .header("x-ssr-ip-verification", "00")
            .body(Body::empty())
            .unwrap();
        assert_eq!(verify_ssr_ip_override(&tampered, secret), None);
    }
}
