//! `POST /auth/password-based/*` (spec §4.5.1): login, registration
//! support endpoints, email verification, password reset/forgot, email
//! and password updates, and the OTP second factor.

use crate::context::{SessionContext, TenantContext};
use crate::dto::{
    PasswordForgotReq, PasswordLoginReq, PasswordResetReq, PasswordUpdateEmailReq, PasswordUpdatePasswordReq,
    PasswordVerifyEmailReq, PasswordVerifyOtpReq, SuccessResp, TokenPairResp,
};
use crate::handlers::common::{existing_session_id, token_response};
use crate::handlers::tenant_settings::password_settings;
use crate::state::AppState;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use identity_core_core::domains::auth::complete_login;
use identity_core_core::domains::auth::password::RemoveSessionPolicy;
use identity_core_core::domains::auth::password::PasswordLoginRepository;
use shared_error::AppError;

#[utoipa::path(
    post,
    path = "/auth/password-based/login",
    tag = "password-based",
    operation_id = "password_based_login",
    request_body = PasswordLoginReq,
    responses((status = 200, description = "Token pair", body = TokenPairResp))
)]
pub async fn login(
    State(state): State<AppState>,
    tenant: TenantContext,
    headers: HeaderMap,
    Json(payload): Json<PasswordLoginReq>,
) -> Result<(HeaderMap, Json<TokenPairResp>), AppError> {
    let settings = password_settings(&tenant.0.tenant.data);
    let existing = existing_session_id(&state, &headers).await;

    let outcome = state
        .with_events(|events| async {
            state
                .password_provider(events)
                .login(
                    tenant.0.tenant.id,
                    &payload.email,
                    &payload.password,
                    settings.reduce_error_info,
                    settings.rolling_attempt_blocking_enabled,
                )
                .await
        })
        .await?;

    let (_, pair, _) =
        complete_login(&state.session_store, existing, outcome, payload.device.map(Into::into)).await?;
    token_response(&state, pair)
}

#[utoipa::path(
    post,
    path = "/auth/password-based/verify-otp",
    tag = "password-based",
    operation_id = "password_based_verify_otp",
    request_body = PasswordVerifyOtpReq,
    responses((status = 200, description = "Session promoted to user", body = SuccessResp))
)]
pub async fn verify_otp(
    State(state): State<AppState>,
    ctx: SessionContext,
    Json(payload): Json<PasswordVerifyOtpReq>,
) -> Result<Json<SuccessResp>, AppError> {
    let user_id =
        ctx.session.data.0.user_id.ok_or_else(|| AppError::unauthorized("authPasswordBased.verifyOtp.noUser"))?;

    let valid = state
        .with_events(|events| async { state.password_provider(events).verify_otp(user_id, &payload.otp).await })
        .await?;
    if !valid {
        return Err(AppError::validation("authPasswordBased.verifyOtp.invalidCode"));
    }

    let mut data = ctx.session.data.0.clone();
    data.session_type = identity_core_core::domains::common::SessionType::User;
    data.two_step_type = None;
    state.session_store.update_data(ctx.session.id, data).await?;
    Ok(Json(SuccessResp::ok()))
}

#[utoipa::path(
    post,
    path = "/auth/password-based/verify-email",
    tag = "password-based",
    operation_id = "password_based_verify_email",
    request_body = PasswordVerifyEmailReq,
    responses((status = 200, description = "Email verified", body = SuccessResp))
)]
pub async fn verify_email(
    State(state): State<AppState>,
    Json(payload): Json<PasswordVerifyEmailReq>,
) -> Result<Json<SuccessResp>, AppError> {
    state.with_events(|events| async { state.password_provider(events).verify_email(&payload.token).await }).await?;
    Ok(Json(SuccessResp::ok()))
}

#[utoipa::path(
    post,
    path = "/auth/password-based/forgot-password",
    tag = "password-based",
    operation_id = "password_based_forgot_password",
    request_body = PasswordForgotReq,
    responses((status = 200, description = "Reset flow started if the email exists", body = SuccessResp))
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<PasswordForgotReq>,
) -> Result<Json<SuccessResp>, AppError> {
    let settings = password_settings(&tenant.0.tenant.data);
    state
        .with_events(|events| async {
            state
                .password_provider(events)
                .forgot_password(tenant.0.tenant.id, &payload.email, settings.reduce_error_info)
                .await
        })
        .await?;
    Ok(Json(SuccessResp::ok()))
}

#[utoipa::path(
    post,
    path = "/auth/password-based/reset-password",
    tag = "password-based",
    operation_id = "password_based_reset_password",
    request_body = PasswordResetReq,
    responses((status = 200, description = "Password reset", body = SuccessResp))
)]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<PasswordResetReq>,
) -> Result<Json<SuccessResp>, AppError> {
    state
        .with_events(|events| async {
            state.password_provider(events).reset_password(&payload.token, &payload.new_password).await
        })
        .await?;
    Ok(Json(SuccessResp::ok()))
}

/// The emails a password-authenticated caller is already known by,
/// surfaced so a client can prefill an email-change form. Backed by the
/// current user's own login record only.
#[utoipa::path(
    post,
    path = "/auth/password-based/list-emails",
    tag = "password-based",
    operation_id = "password_based_list_emails",
    responses((status = 200, description = "Known emails", body = crate::dto::PasswordListEmailsResp))
)]
pub async fn list_emails(
    State(state): State<AppState>,
    ctx: SessionContext,
) -> Result<Json<crate::dto::PasswordListEmailsResp>, AppError> {
    let user_id =
        ctx.session.data.0.user_id.ok_or_else(|| AppError::unauthorized("authPasswordBased.listEmails.noUser"))?;
    let login = state
        .password_repo
        .find_by_user_id(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("authPasswordBased.listEmails.notEnabled"))?;
    Ok(Json(crate::dto::PasswordListEmailsResp { emails: vec![login.email] }))
}

#[utoipa::path(
    post,
    path = "/auth/password-based/update-email",
    tag = "password-based",
    operation_id = "password_based_update_email",
    request_body = PasswordUpdateEmailReq,
    responses((status = 200, description = "Verification email reissued", body = SuccessResp))
)]
pub async fn update_email(
    State(state): State<AppState>,
    ctx: SessionContext,
    Json(payload): Json<PasswordUpdateEmailReq>,
) -> Result<Json<SuccessResp>, AppError> {
    let user_id =
        ctx.session.data.0.user_id.ok_or_else(|| AppError::unauthorized("authPasswordBased.updateEmail.noUser"))?;
    state
        .with_events(|events| async { state.password_provider(events).update_email(user_id, &payload.new_email).await })
        .await?;
    Ok(Json(SuccessResp::ok()))
}

#[utoipa::path(
    post,
    path = "/auth/password-based/update-password",
    tag = "password-based",
    operation_id = "password_based_update_password",
    request_body = PasswordUpdatePasswordReq,
    responses((status = 200, description = "Password updated", body = SuccessResp))
)]
pub async fn update_password(
    State(state): State<AppState>,
    ctx: SessionContext,
    Json(payload): Json<PasswordUpdatePasswordReq>,
) -> Result<Json<SuccessResp>, AppError> {
    let user_id =
        ctx.session.data.0.user_id.ok_or_else(|| AppError::unauthorized("authPasswordBased.updatePassword.noUser"))?;
    let policy = if payload.remove_other_sessions_only {
        RemoveSessionPolicy::AllExceptCaller(ctx.session.id)
    } else {
        RemoveSessionPolicy::All
    };
    state
        .with_events(|events| async {
            state.password_provider(events).update_password(user_id, &payload.new_password, policy).await
        })
        .await?;
    Ok(Json(SuccessResp::ok()))
}
