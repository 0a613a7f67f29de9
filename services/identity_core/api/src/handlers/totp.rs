//! `GET|POST|DELETE /auth/totp-provider/{info,setup,setup/verify,verify,
//! remove,user/:id/remove}` (spec §4.5.5).

use crate::context::SessionContext;
use crate::dto::{SuccessResp, TotpCodeReq, TotpInfoResp, TotpSetupReq, TotpSetupResp, TotpVerifyResp};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use identity_core_core::domains::auth::totp::TotpRepository;
use identity_core_core::domains::common::SessionType;
use shared_error::AppError;
use uuid::Uuid;

fn require_user(ctx: &SessionContext) -> Result<Uuid, AppError> {
    ctx.session.data.0.user_id.ok_or_else(|| AppError::unauthorized("authTotpProvider.require.noUser"))
}

#[utoipa::path(
    get,
    path = "/auth/totp-provider/info",
    tag = "totp-provider",
    operation_id = "totp_provider_info",
    responses((status = 200, description = "Whether TOTP is set up/verified", body = TotpInfoResp))
)]
pub async fn info(State(state): State<AppState>, ctx: SessionContext) -> Result<Json<TotpInfoResp>, AppError> {
    let user_id = require_user(&ctx)?;
    let settings = state.totp_repo.find_by_user(user_id).await?;
    let (enabled, verified) = match settings {
        Some(settings) => (true, settings.is_verified()),
        None => (false, false),
    };
    Ok(Json(TotpInfoResp { enabled, verified }))
}

#[utoipa::path(
    post,
    path = "/auth/totp-provider/setup",
    tag = "totp-provider",
    operation_id = "totp_provider_setup",
    request_body = TotpSetupReq,
    responses((status = 200, description = "otpauth:// URL to render as a QR code", body = TotpSetupResp))
)]
pub async fn setup(
    State(state): State<AppState>,
    ctx: SessionContext,
    Json(payload): Json<TotpSetupReq>,
) -> Result<Json<TotpSetupResp>, AppError> {
    let user_id = require_user(&ctx)?;
    let (_, otpauth_url) = state.totp_provider.setup(user_id, &payload.account_name).await?;
    Ok(Json(TotpSetupResp { otpauth_url }))
}

#[utoipa::path(
    post,
    path = "/auth/totp-provider/setup/verify",
    tag = "totp-provider",
    operation_id = "totp_provider_setup_verify",
    request_body = TotpCodeReq,
    responses((status = 200, description = "Setup verified", body = SuccessResp))
)]
pub async fn setup_verify(
    State(state): State<AppState>,
    ctx: SessionContext,
    Json(payload): Json<TotpCodeReq>,
) -> Result<Json<SuccessResp>, AppError> {
    let user_id = require_user(&ctx)?;
    state.totp_provider.setup_verify(user_id, &payload.code).await?;
    Ok(Json(SuccessResp::ok()))
}

/// On success, promotes the session from `checkTwoStep` to `user`.
#[utoipa::path(
    post,
    path = "/auth/totp-provider/verify",
    tag = "totp-provider",
    operation_id = "totp_provider_verify",
    request_body = TotpCodeReq,
    responses((status = 200, description = "Second factor accepted", body = TotpVerifyResp))
)]
pub async fn verify(
    State(state): State<AppState>,
    ctx: SessionContext,
    Json(payload): Json<TotpCodeReq>,
) -> Result<Json<TotpVerifyResp>, AppError> {
    let user_id = require_user(&ctx)?;
    let verified = state.totp_provider.verify(user_id, &payload.code).await?;
    if verified {
        let mut data = ctx.session.data.0.clone();
        data.session_type = SessionType::User;
        data.two_step_type = None;
        state.session_store.update_data(ctx.session.id, data).await?;
    }
    Ok(Json(TotpVerifyResp { verified }))
}

#[utoipa::path(
    delete,
    path = "/auth/totp-provider/remove",
    tag = "totp-provider",
    operation_id = "totp_provider_remove",
    responses((status = 200, description = "TOTP disabled for the caller", body = SuccessResp))
)]
pub async fn remove(State(state): State<AppState>, ctx: SessionContext) -> Result<Json<SuccessResp>, AppError> {
    let user_id = require_user(&ctx)?;
    state.totp_provider.remove(user_id).await?;
    Ok(Json(SuccessResp::ok()))
}

#[utoipa::path(
    delete,
    path = "/auth/totp-provider/user/{id}/remove",
    tag = "totp-provider",
    operation_id = "totp_provider_remove_for_user",
    responses((status = 200, description = "TOTP disabled for the target user", body = SuccessResp))
)]
pub async fn remove_for_user(
    State(state): State<AppState>,
    ctx: SessionContext,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessResp>, AppError> {
    state.totp_provider.remove_for_user(&ctx.summary.permissions, id).await?;
    Ok(Json(SuccessResp::ok()))
}
