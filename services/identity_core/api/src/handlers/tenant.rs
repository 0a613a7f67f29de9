//! `GET /multitenant/current` (spec §4.1).

use crate::context::TenantContext;
use crate::dto::TenantCurrentResp;
use axum::Json;
use shared_error::AppError;

#[utoipa::path(
    get,
    path = "/multitenant/current",
    tag = "multitenant",
    operation_id = "multitenant_current",
    responses((status = 200, description = "The tenant resolved for this request", body = TenantCurrentResp))
)]
pub async fn current(tenant: TenantContext) -> Result<Json<TenantCurrentResp>, AppError> {
    Ok(Json(TenantCurrentResp {
        tenant_id: tenant.0.tenant.id,
        tenant_name: tenant.0.tenant.name,
        public_url: tenant.0.public_url,
        api_url: tenant.0.api_url,
    }))
}
