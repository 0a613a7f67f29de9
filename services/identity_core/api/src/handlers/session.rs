//! `GET /session/list`, `POST /session/logout`,
//! `POST /session/set-notification-token` (spec §4.3, §4.5.6).

use crate::context::SessionContext;
use crate::dto::{SessionListResp, SessionResp, SetNotificationTokenReq, SuccessResp};
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use identity_core_core::domains::common::DevicePlatform;
use identity_core_core::domains::session::{DeviceInput, SessionRepository};
use shared_error::AppError;

fn parse_platform(raw: &str) -> DevicePlatform {
    match raw {
        "apple" => DevicePlatform::Apple,
        "android" => DevicePlatform::Android,
        "desktop" => DevicePlatform::Desktop,
        _ => DevicePlatform::Other,
    }
}

#[utoipa::path(
    get,
    path = "/session/list",
    tag = "session",
    operation_id = "session_list",
    responses((status = 200, description = "Every non-revoked session for the caller", body = SessionListResp))
)]
pub async fn list(State(state): State<AppState>, ctx: SessionContext) -> Result<Json<SessionListResp>, AppError> {
    let sessions = state.session_store.list_for_user(ctx.user_id).await?;
    Ok(Json(SessionListResp { sessions: sessions.iter().map(SessionResp::from).collect() }))
}

#[utoipa::path(
    post,
    path = "/session/logout",
    tag = "session",
    operation_id = "session_logout",
    responses((status = 200, description = "Session revoked", body = SuccessResp))
)]
pub async fn logout(State(state): State<AppState>, ctx: SessionContext) -> Result<Json<SuccessResp>, AppError> {
    state.session_store.invalidate(ctx.session.id).await?;
    Ok(Json(SuccessResp::ok()))
}

/// Re-attaches the session's device with an updated push token; the
/// device's other fields (platform, name, web-push subscription) are
/// preserved as-is.
#[utoipa::path(
    post,
    path = "/session/set-notification-token",
    tag = "session",
    operation_id = "session_set_notification_token",
    request_body = SetNotificationTokenReq,
    responses((status = 200, description = "Notification token updated", body = SuccessResp))
)]
pub async fn set_notification_token(
    State(state): State<AppState>,
    ctx: SessionContext,
    Json(payload): Json<SetNotificationTokenReq>,
) -> Result<Json<SuccessResp>, AppError> {
    let device = state
        .session_repo
        .find_device(ctx.session.id)
        .await?
        .ok_or_else(|| AppError::validation("session.setNotificationToken.noDevice"))?;

    let input = DeviceInput {
        platform: parse_platform(&device.platform),
        name: device.name,
        notification_token: Some(payload.notification_token),
        web_push_subscription: device.web_push_subscription,
    };
    state.session_repo.attach_device(ctx.session.id, &input.normalized()).await?;
    Ok(Json(SuccessResp::ok()))
}
