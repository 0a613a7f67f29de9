//! `POST /auth/anonymous-based/login` (spec §4.5.2).

use crate::context::TenantContext;
use crate::dto::{AnonymousLoginReq, TokenPairResp};
use crate::handlers::common::{existing_session_id, token_response};
use crate::state::AppState;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use identity_core_core::domains::auth::complete_login;
use shared_error::AppError;

#[utoipa::path(
    post,
    path = "/auth/anonymous-based/login",
    tag = "anonymous-based",
    operation_id = "anonymous_based_login",
    request_body = AnonymousLoginReq,
    responses((status = 200, description = "Token pair", body = TokenPairResp))
)]
pub async fn login(
    State(state): State<AppState>,
    tenant: TenantContext,
    headers: HeaderMap,
    Json(payload): Json<AnonymousLoginReq>,
) -> Result<(HeaderMap, Json<TokenPairResp>), AppError> {
    let existing = existing_session_id(&state, &headers).await;

    let outcome = state
        .with_events(|events| async { state.anonymous_provider(events).login(tenant.0.tenant.id, &payload.token).await })
        .await?;

    let (_, pair, _) =
        complete_login(&state.session_store, existing, outcome, payload.device.map(Into::into)).await?;
    token_response(&state, pair)
}
