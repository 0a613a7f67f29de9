//! `GET /feature-flag/current` plus CRUD (spec §4.6).

use crate::context::{SessionContext, TenantContext};
use crate::dto::{FeatureFlagSetResp, SetFeatureFlagReq, SuccessResp};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use shared_error::AppError;

#[utoipa::path(
    get,
    path = "/feature-flag/current",
    tag = "feature-flag",
    operation_id = "feature_flag_current",
    responses((status = 200, description = "Every declared flag resolved for the current tenant", body = FeatureFlagSetResp))
)]
pub async fn current(
    State(state): State<AppState>,
    tenant: TenantContext,
) -> Result<Json<FeatureFlagSetResp>, AppError> {
    let declared: Vec<String> = state.config.feature_flags.iter().map(|f| f.name.clone()).collect();
    let flags = state.feature_flag_engine.resolve_current_set(&tenant.0.tenant.name, &declared).await?;
    Ok(Json(FeatureFlagSetResp { flags }))
}

#[utoipa::path(
    get,
    path = "/feature-flag/{name}",
    tag = "feature-flag",
    operation_id = "feature_flag_get",
    responses((status = 200, description = "Single flag resolved for the current tenant", body = bool))
)]
pub async fn get_dynamic(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(name): Path<String>,
) -> Result<Json<bool>, AppError> {
    Ok(Json(state.feature_flag_engine.resolve_dynamic(&tenant.0.tenant.name, &name).await?))
}

const FEATURE_FLAG_MANAGE_PERMISSION: &str = "auth:permission:manage";

#[utoipa::path(
    post,
    path = "/feature-flag/{name}",
    tag = "feature-flag",
    operation_id = "feature_flag_set",
    request_body = SetFeatureFlagReq,
    responses((status = 200, description = "Flag updated", body = SuccessResp))
)]
pub async fn set_dynamic(
    State(state): State<AppState>,
    tenant: TenantContext,
    ctx: SessionContext,
    Path(name): Path<String>,
    Json(payload): Json<SetFeatureFlagReq>,
) -> Result<Json<SuccessResp>, AppError> {
    if !ctx.summary.permissions.iter().any(|p| p == FEATURE_FLAG_MANAGE_PERMISSION) {
        return Err(AppError::forbidden("featureFlag.setDynamic.missingPermission"));
    }
    let tenant_value = payload.tenant_value.map(|value| (tenant.0.tenant.name.as_str(), value));
    state.feature_flag_engine.set_dynamic(&name, payload.global_value, tenant_value).await?;
    Ok(Json(SuccessResp::ok()))
}
