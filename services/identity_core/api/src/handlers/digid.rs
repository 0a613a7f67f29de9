//! `POST /auth/digid-based/{metadata,redirect,login}` (spec §4.5.3).

use crate::context::TenantContext;
use crate::dto::{DigidLoginReq, DigidMetadataResp, RedirectResp, TokenPairResp};
use crate::handlers::common::{existing_session_id, token_response};
use crate::state::{AppState, DigidProviderT};
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use identity_core_core::domains::auth::complete_login;
use serde::Deserialize;
use shared_error::AppError;
use std::sync::Arc;

fn provider(state: &AppState) -> Result<Arc<DigidProviderT>, AppError> {
    state.digid_provider.clone().ok_or_else(|| AppError::server_key("authDigidBased.notConfigured"))
}

#[utoipa::path(
    post,
    path = "/auth/digid-based/metadata",
    tag = "digid-based",
    operation_id = "digid_based_metadata",
    responses((status = 200, description = "Signed SAML SP metadata", body = DigidMetadataResp))
)]
pub async fn metadata(State(state): State<AppState>) -> Result<Json<DigidMetadataResp>, AppError> {
    let metadata_xml = provider(&state)?.metadata()?;
    Ok(Json(DigidMetadataResp { metadata_xml }))
}

#[derive(Debug, Deserialize)]
pub struct RelayStateQuery {
    pub relay_state: Option<String>,
}

#[utoipa::path(
    post,
    path = "/auth/digid-based/redirect",
    tag = "digid-based",
    operation_id = "digid_based_redirect",
    responses((status = 200, description = "IdP redirect URL", body = RedirectResp))
)]
pub async fn redirect(
    State(state): State<AppState>,
    Query(query): Query<RelayStateQuery>,
) -> Result<Json<RedirectResp>, AppError> {
    let redirect_url = provider(&state)?.redirect_url(query.relay_state.as_deref())?;
    Ok(Json(RedirectResp { redirect_url }))
}

#[utoipa::path(
    post,
    path = "/auth/digid-based/login",
    tag = "digid-based",
    operation_id = "digid_based_login",
    request_body = DigidLoginReq,
    responses((status = 200, description = "Token pair", body = TokenPairResp))
)]
pub async fn login(
    State(state): State<AppState>,
    tenant: TenantContext,
    headers: HeaderMap,
    Json(payload): Json<DigidLoginReq>,
) -> Result<(HeaderMap, Json<TokenPairResp>), AppError> {
    let provider = provider(&state)?;
    let existing = existing_session_id(&state, &headers).await;

    let bsn = provider.resolve_bsn(&payload.artifact).await?;
    let outcome = provider.login(tenant.0.tenant.id, &bsn).await?;

    let (_, pair, _) =
        complete_login(&state.session_store, existing, outcome, payload.device.map(Into::into)).await?;
    token_response(&state, pair)
}
