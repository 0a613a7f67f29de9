//! Shared plumbing used by every login-producing handler: existing
//! session lookup (so the shared tail protocol can invalidate it),
//! bearer-plus-cookie token delivery (spec §4.3's SSR integration).

use crate::cookie_helper::{get_cookie_value, set_auth_cookies, CookieConfig};
use crate::dto::TokenPairResp;
use crate::state::AppState;
use axum::http::HeaderMap;
use axum::Json;
use identity_core_core::domains::session::TokenPair;
use shared_error::AppError;
use uuid::Uuid;

/// Best-effort lookup of the session behind whatever bearer token or
/// cookie the request already carries. Unauthenticated/invalid tokens
/// are treated as "no existing session" rather than an error, since
/// every login route is reachable without one.
pub async fn existing_session_id(state: &AppState, headers: &HeaderMap) -> Option<Uuid> {
    let token = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|s| s.to_string())
        .or_else(|| get_cookie_value(headers, "access_token"))?;

    state.session_store.load_from_access_token(&token).await.ok().map(|session| session.id)
}

/// Mirrors the token pair into httpOnly cookies alongside the JSON body.
pub fn token_response(state: &AppState, pair: TokenPair) -> Result<(HeaderMap, Json<TokenPairResp>), AppError> {
    let mut headers = HeaderMap::new();
    let cookie_config = CookieConfig::new(&state.config);
    set_auth_cookies(&mut headers, &pair.access_token, &pair.refresh_token, &cookie_config)
        .map_err(AppError::server_key)?;
    Ok((headers, Json(pair.into())))
}
