//! `POST /auth/keycloak-based/{redirect,login,user/:id/update,create}`
//! (spec §4.5.4).

use crate::context::{SessionContext, TenantContext};
use crate::dto::{KeycloakCreateReq, KeycloakLoginReq, KeycloakUserUpdateReq, SuccessResp, TokenPairResp, UserResp};
use crate::handlers::common::{existing_session_id, token_response};
use crate::handlers::tenant_settings::keycloak_settings;
use crate::state::{AppState, KeycloakProviderT};
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use identity_core_core::domains::auth::complete_login;
use identity_core_core::domains::auth::keycloak::KeycloakLoginRepository;
use serde::Deserialize;
use shared_error::AppError;
use uuid::Uuid;

const USER_MANAGE_PERMISSION: &str = "auth:user:manage";

fn provider(state: &AppState) -> Result<KeycloakProviderT, AppError> {
    state.keycloak_provider(crate::noop_sink()).ok_or_else(|| AppError::server_key("authKeycloakBased.notConfigured"))
}

#[derive(Debug, Deserialize)]
pub struct RedirectQuery {
    pub state: String,
}

#[utoipa::path(
    post,
    path = "/auth/keycloak-based/redirect",
    tag = "keycloak-based",
    operation_id = "keycloak_based_redirect",
    responses((status = 200, description = "IdP redirect URL", body = crate::dto::RedirectResp))
)]
pub async fn redirect(
    State(state): State<AppState>,
    axum::extract::Query(query): axum::extract::Query<RedirectQuery>,
) -> Result<Json<crate::dto::RedirectResp>, AppError> {
    let redirect_url = provider(&state)?.redirect_url(&query.state)?;
    Ok(Json(crate::dto::RedirectResp { redirect_url }))
}

#[utoipa::path(
    post,
    path = "/auth/keycloak-based/login",
    tag = "keycloak-based",
    operation_id = "keycloak_based_login",
    request_body = KeycloakLoginReq,
    responses((status = 200, description = "Token pair", body = TokenPairResp))
)]
pub async fn login(
    State(state): State<AppState>,
    tenant: TenantContext,
    headers: HeaderMap,
    Json(payload): Json<KeycloakLoginReq>,
) -> Result<(HeaderMap, Json<TokenPairResp>), AppError> {
    let settings = keycloak_settings(&tenant.0.tenant.data);
    let existing = existing_session_id(&state, &headers).await;

    let outcome = state
        .with_events(|events| async {
            let provider = state
                .keycloak_provider(events)
                .ok_or_else(|| AppError::server_key("authKeycloakBased.notConfigured"))?;
            provider.login(tenant.0.tenant.id, &payload.code, &settings).await
        })
        .await?;

    let (_, pair, _) =
        complete_login(&state.session_store, existing, outcome, payload.device.map(Into::into)).await?;
    token_response(&state, pair)
}

#[utoipa::path(
    put,
    path = "/auth/keycloak-based/user/{id}/update",
    tag = "keycloak-based",
    operation_id = "keycloak_based_user_update",
    request_body = KeycloakUserUpdateReq,
    responses((status = 200, description = "Updated user record", body = UserResp))
)]
pub async fn user_update(
    State(state): State<AppState>,
    ctx: SessionContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<KeycloakUserUpdateReq>,
) -> Result<Json<UserResp>, AppError> {
    if ctx.user_id != id && !ctx.summary.permissions.iter().any(|p| p == USER_MANAGE_PERMISSION) {
        return Err(AppError::forbidden("authKeycloakBased.userUpdate.missingPermission"));
    }
    let display_name = payload.display_name.unwrap_or_default();
    let user = state.user_directory(crate::noop_sink()).update_display_name(id, &display_name).await?;
    Ok(Json(user.into()))
}

/// Admin-linked Keycloak identity for an existing user, bypassing the
/// implicit-creation path a real login would take.
#[utoipa::path(
    post,
    path = "/auth/keycloak-based/create",
    tag = "keycloak-based",
    operation_id = "keycloak_based_create",
    request_body = KeycloakCreateReq,
    responses((status = 200, description = "Identity linked", body = SuccessResp))
)]
pub async fn create(
    State(state): State<AppState>,
    tenant: TenantContext,
    ctx: SessionContext,
    Json(payload): Json<KeycloakCreateReq>,
) -> Result<Json<SuccessResp>, AppError> {
    if !ctx.summary.permissions.iter().any(|p| p == USER_MANAGE_PERMISSION) {
        return Err(AppError::forbidden("authKeycloakBased.create.missingPermission"));
    }
    state
        .with_events(|events| async {
            state.keycloak_repo.insert(payload.user_id, tenant.0.tenant.id, &payload.email).await?;
            events.enqueue(
                identity_core_core::domains::auth::keycloak::KEYCLOAK_BASED_USER_REGISTERED,
                serde_json::json!({ "userId": payload.user_id, "tenantId": tenant.0.tenant.id, "email": payload.email }),
            )?;
            Ok(())
        })
        .await?;
    Ok(Json(SuccessResp::ok()))
}
