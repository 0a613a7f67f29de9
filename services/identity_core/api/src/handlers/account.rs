//! `GET /auth/me`, session rotation/logout, impersonation exit, and the
//! `auth:user:list` / `auth:user:manage`-gated user admin routes (spec §6).

use crate::context::{SessionContext, TenantContext};
use crate::dto::{
    ListUsersReq, ListUsersResp, MeResp, RefreshTokensReq, SessionResp, SetActiveReq, SuccessResp, TokenPairResp,
    UpdateUserReq, UserResp, UserSummaryResp,
};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use identity_core_core::domains::common::SessionType;
use shared_error::AppError;
use uuid::Uuid;

/// Current session plus the authenticated user's summary; `user` is
/// omitted while a second factor is outstanding (spec §6).
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "account",
    operation_id = "auth_me",
    responses((status = 200, description = "Current session", body = MeResp))
)]
pub async fn me(State(state): State<AppState>, ctx: SessionContext) -> Result<Json<MeResp>, AppError> {
    let user = if ctx.session.data.0.session_type == SessionType::User {
        let user = state
            .user_directory(crate::noop_sink())
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("auth.me.unknownUser"))?;
        Some(UserSummaryResp {
            id: user.id,
            display_name: user.display_name,
            roles: ctx.summary.roles.clone(),
            permissions: ctx.summary.permissions.clone(),
        })
    } else {
        None
    };

    Ok(Json(MeResp { session: SessionResp::from(&ctx.session), user }))
}

#[utoipa::path(
    post,
    path = "/auth/refresh-tokens",
    tag = "account",
    operation_id = "auth_refresh_tokens",
    request_body = RefreshTokensReq,
    responses((status = 200, description = "Rotated token pair", body = TokenPairResp))
)]
pub async fn refresh_tokens(
    State(state): State<AppState>,
    Json(payload): Json<RefreshTokensReq>,
) -> Result<Json<TokenPairResp>, AppError> {
    let pair =
        state.session_store.refresh(&payload.refresh_token).await.map_err(AppError::normalize_session_error)?;
    Ok(Json(pair.into()))
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "account",
    operation_id = "auth_logout",
    responses((status = 200, description = "Session revoked", body = SuccessResp))
)]
pub async fn logout(State(state): State<AppState>, ctx: SessionContext) -> Result<Json<SuccessResp>, AppError> {
    state.session_store.invalidate(ctx.session.id).await?;
    Ok(Json(SuccessResp::ok()))
}

/// Drops `impersonatorUserId` by reissuing the session under the
/// impersonator's identity, ending the elevated view.
#[utoipa::path(
    post,
    path = "/auth/impersonate-stop-session",
    tag = "account",
    operation_id = "auth_impersonate_stop_session",
    responses((status = 200, description = "Impersonation ended", body = SuccessResp))
)]
pub async fn impersonate_stop_session(
    State(state): State<AppState>,
    ctx: SessionContext,
) -> Result<Json<SuccessResp>, AppError> {
    let impersonator_id = ctx
        .session
        .data
        .0
        .impersonator_user_id
        .ok_or_else(|| AppError::validation("auth.impersonateStopSession.notImpersonating"))?;

    let data = identity_core_core::domains::session::SessionData {
        user_id: Some(impersonator_id),
        login_type: ctx.session.data.0.login_type,
        session_type: SessionType::User,
        two_step_type: None,
        impersonator_user_id: None,
    };
    state.session_store.update_data(ctx.session.id, data).await?;
    Ok(Json(SuccessResp::ok()))
}

const USER_LIST_PERMISSION: &str = "auth:user:list";
const USER_MANAGE_PERMISSION: &str = "auth:user:manage";

fn require_permission(ctx: &SessionContext, permission: &str) -> Result<(), AppError> {
    if ctx.summary.permissions.iter().any(|p| p == permission) {
        Ok(())
    } else {
        Err(AppError::forbidden("auth.userAdmin.missingPermission"))
    }
}

#[utoipa::path(
    post,
    path = "/auth/list-users",
    tag = "account",
    operation_id = "auth_list_users",
    request_body = ListUsersReq,
    responses((status = 200, description = "Paginated user list", body = ListUsersResp))
)]
pub async fn list_users(
    State(state): State<AppState>,
    tenant: TenantContext,
    ctx: SessionContext,
    Json(payload): Json<ListUsersReq>,
) -> Result<Json<ListUsersResp>, AppError> {
    require_permission(&ctx, USER_LIST_PERMISSION)?;
    let (users, total) =
        state.user_directory(crate::noop_sink()).list(tenant.0.tenant.id, payload.page, payload.page_size).await?;
    Ok(Json(ListUsersResp { users: users.into_iter().map(UserResp::from).collect(), total }))
}

#[utoipa::path(
    get,
    path = "/auth/user/{id}",
    tag = "account",
    operation_id = "auth_get_user",
    responses((status = 200, description = "User record", body = UserResp))
)]
pub async fn get_user(
    State(state): State<AppState>,
    ctx: SessionContext,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResp>, AppError> {
    require_permission(&ctx, USER_LIST_PERMISSION)?;
    let user = state
        .user_directory(crate::noop_sink())
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("auth.getUser.unknownUser"))?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    put,
    path = "/auth/user/{id}/update",
    tag = "account",
    operation_id = "auth_update_user",
    request_body = UpdateUserReq,
    responses((status = 200, description = "Updated user record", body = UserResp))
)]
pub async fn update_user(
    State(state): State<AppState>,
    ctx: SessionContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserReq>,
) -> Result<Json<UserResp>, AppError> {
    require_permission(&ctx, USER_MANAGE_PERMISSION)?;
    let display_name = payload.display_name.unwrap_or_default();
    let user = state.user_directory(crate::noop_sink()).update_display_name(id, &display_name).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    post,
    path = "/auth/user/{id}/set-active",
    tag = "account",
    operation_id = "auth_set_user_active",
    request_body = SetActiveReq,
    responses((status = 200, description = "Activation toggled", body = SuccessResp))
)]
pub async fn set_active(
    State(state): State<AppState>,
    ctx: SessionContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetActiveReq>,
) -> Result<Json<SuccessResp>, AppError> {
    require_permission(&ctx, USER_MANAGE_PERMISSION)?;
    state.with_events(|events| async { state.user_directory(events).set_active(id, payload.active).await }).await?;
    Ok(Json(SuccessResp::ok()))
}
