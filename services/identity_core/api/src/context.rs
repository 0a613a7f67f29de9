//! Request-scoped extractors: tenant resolution from request headers
//! (spec §4.1) and session/permission loading from the bearer token or
//! cookie fallback (spec §4.3, §4.4).

use crate::cookie_helper::get_cookie_value;
use crate::state::AppState;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use identity_core_core::domains::permission::UserPermissionSummary;
use identity_core_core::domains::session::Session;
use identity_core_core::domains::tenant::{ResolvedTenantContext, TenantResolutionHeaders};
use shared_error::AppError;
use uuid::Uuid;

/// The resolved tenant for this request, attached by every route that
/// isn't tenant-agnostic.
pub struct TenantContext(pub ResolvedTenantContext);

impl FromRequestParts<AppState> for TenantContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let headers = TenantResolutionHeaders {
            host: header_str(parts, header::HOST),
            origin: header_str(parts, header::ORIGIN),
            x_lpc_tenant_origin: parts
                .headers
                .get("x-lpc-tenant-origin")
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string()),
        };
        let resolved = state.tenant_resolver.resolve(&headers).await?;
        Ok(TenantContext(resolved))
    }
}

fn header_str(parts: &Parts, name: header::HeaderName) -> Option<String> {
    parts.headers.get(name).and_then(|v| v.to_str().ok()).map(|s| s.to_string())
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|s| s.to_string())
}

/// An authenticated session plus the caller's held permissions, scoped to
/// the resolved tenant (spec §4.3 step "session -> permission summary").
/// Any failure normalizes to 401 (spec §7's session boundary rule).
pub struct SessionContext {
    pub session: Session,
    pub user_id: Uuid,
    pub summary: UserPermissionSummary,
}

impl FromRequestParts<AppState> for SessionContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let TenantContext(tenant_ctx) = TenantContext::from_request_parts(parts, state).await?;

        let token = bearer_token(parts)
            .or_else(|| get_cookie_value(&parts.headers, "access_token"))
            .ok_or_else(|| AppError::unauthorized("session.require.missingToken"))?;

        let session = state
            .session_store
            .load_from_access_token(&token)
            .await
            .map_err(AppError::normalize_session_error)?;

        let user_id = session
            .data
            .0
            .user_id
            .ok_or_else(|| AppError::unauthorized("session.require.noUser"))?;

        let summary = state
            .permission_engine
            .user_summary(user_id, tenant_ctx.tenant.id)
            .await
            .map_err(AppError::normalize_session_error)?;

        Ok(SessionContext { session, user_id, summary })
    }
}
