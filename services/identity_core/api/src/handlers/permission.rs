//! `/auth/permission/*` (spec §4.2): startup-synced permission catalog,
//! role CRUD, and role assignment, all gated on `auth:permission:manage`
//! except the caller's own summary.

use crate::context::{SessionContext, TenantContext};
use crate::dto::{
    CreateRoleReq, PermissionsReq, RoleIdReq, RoleResp, RoleSyncReq, RoleSyncResp, UserPermissionSummaryResp,
};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use identity_core_core::domains::permission::RoleSelector;
use shared_error::AppError;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/auth/permission/summary",
    tag = "permission",
    operation_id = "permission_summary",
    responses((status = 200, description = "Caller's own roles and permissions", body = UserPermissionSummaryResp))
)]
pub async fn summary(ctx: SessionContext) -> Result<Json<UserPermissionSummaryResp>, AppError> {
    Ok(Json(UserPermissionSummaryResp { roles: ctx.summary.roles, permissions: ctx.summary.permissions }))
}

#[utoipa::path(
    get,
    path = "/auth/permission/permission/list",
    tag = "permission",
    operation_id = "permission_list",
    responses((status = 200, description = "Declared permission catalog", body = [String]))
)]
pub async fn list_permissions(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.permission_engine.list_permissions().await?))
}

#[utoipa::path(
    get,
    path = "/auth/permission/role/list",
    tag = "permission",
    operation_id = "permission_role_list",
    responses((status = 200, description = "Roles visible to the current tenant", body = [RoleResp]))
)]
pub async fn list_roles(
    State(state): State<AppState>,
    tenant: TenantContext,
    ctx: SessionContext,
) -> Result<Json<Vec<RoleResp>>, AppError> {
    let roles = state.permission_engine.list_roles_for_tenant(&ctx.summary.permissions, tenant.0.tenant.id).await?;
    Ok(Json(
        roles
            .into_iter()
            .map(|(role, is_editable)| RoleResp { id: role.id, identifier: role.identifier, is_editable })
            .collect(),
    ))
}

#[utoipa::path(
    post,
    path = "/auth/permission/role",
    tag = "permission",
    operation_id = "permission_create_role",
    request_body = CreateRoleReq,
    responses((status = 200, description = "Role created", body = RoleResp))
)]
pub async fn create_role(
    State(state): State<AppState>,
    tenant: TenantContext,
    ctx: SessionContext,
    Json(payload): Json<CreateRoleReq>,
) -> Result<Json<RoleResp>, AppError> {
    let role = state
        .permission_engine
        .create_role(&ctx.summary.permissions, tenant.0.tenant.id, &payload.identifier)
        .await?;
    Ok(Json(RoleResp { id: role.id, identifier: role.identifier, is_editable: role.is_editable() }))
}

#[utoipa::path(
    delete,
    path = "/auth/permission/role/{id}",
    tag = "permission",
    operation_id = "permission_delete_role",
    responses((status = 200, description = "Role deleted", body = crate::dto::SuccessResp))
)]
pub async fn delete_role(
    State(state): State<AppState>,
    ctx: SessionContext,
    Path(id): Path<Uuid>,
) -> Result<Json<crate::dto::SuccessResp>, AppError> {
    state.permission_engine.delete_role(&ctx.summary.permissions, id).await?;
    Ok(Json(crate::dto::SuccessResp::ok()))
}

#[utoipa::path(
    post,
    path = "/auth/permission/role/{id}/add-permissions",
    tag = "permission",
    operation_id = "permission_add_permissions",
    request_body = PermissionsReq,
    responses((status = 200, description = "Permissions attached", body = crate::dto::SuccessResp))
)]
pub async fn add_permissions(
    State(state): State<AppState>,
    ctx: SessionContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<PermissionsReq>,
) -> Result<Json<crate::dto::SuccessResp>, AppError> {
    state.permission_engine.add_permissions(&ctx.summary.permissions, id, &payload.permission_identifiers).await?;
    Ok(Json(crate::dto::SuccessResp::ok()))
}

#[utoipa::path(
    post,
    path = "/auth/permission/role/{id}/remove-permissions",
    tag = "permission",
    operation_id = "permission_remove_permissions",
    request_body = PermissionsReq,
    responses((status = 200, description = "Permissions detached", body = crate::dto::SuccessResp))
)]
pub async fn remove_permissions(
    State(state): State<AppState>,
    ctx: SessionContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<PermissionsReq>,
) -> Result<Json<crate::dto::SuccessResp>, AppError> {
    state.permission_engine.remove_permissions(&ctx.summary.permissions, id, &payload.permission_identifiers).await?;
    Ok(Json(crate::dto::SuccessResp::ok()))
}

#[utoipa::path(
    post,
    path = "/auth/permission/user/{id}/assign-role",
    tag = "permission",
    operation_id = "permission_assign_role",
    request_body = RoleIdReq,
    responses((status = 200, description = "Role assigned", body = crate::dto::SuccessResp))
)]
pub async fn assign_role(
    State(state): State<AppState>,
    ctx: SessionContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<RoleIdReq>,
) -> Result<Json<crate::dto::SuccessResp>, AppError> {
    state.permission_engine.assign_role(&ctx.summary.permissions, id, payload.role_id).await?;
    Ok(Json(crate::dto::SuccessResp::ok()))
}

#[utoipa::path(
    post,
    path = "/auth/permission/user/{id}/remove-role",
    tag = "permission",
    operation_id = "permission_remove_role",
    request_body = RoleIdReq,
    responses((status = 200, description = "Role removed", body = crate::dto::SuccessResp))
)]
pub async fn remove_role(
    State(state): State<AppState>,
    ctx: SessionContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<RoleIdReq>,
) -> Result<Json<crate::dto::SuccessResp>, AppError> {
    state.permission_engine.remove_role(&ctx.summary.permissions, id, payload.role_id).await?;
    Ok(Json(crate::dto::SuccessResp::ok()))
}

/// Not part of the original route family: replaces a user's tenant role
/// set wholesale in one call, grounded in `PermissionEngine::user_sync_roles`
/// (spec §4.2's `userSyncRoles`), which otherwise has no HTTP surface.
#[utoipa::path(
    post,
    path = "/auth/permission/user/{id}/sync-roles",
    tag = "permission",
    operation_id = "permission_sync_roles",
    request_body = RoleSyncReq,
    responses((status = 200, description = "Role add/remove delta applied", body = RoleSyncResp))
)]
pub async fn sync_roles(
    State(state): State<AppState>,
    tenant: TenantContext,
    ctx: SessionContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<RoleSyncReq>,
) -> Result<Json<RoleSyncResp>, AppError> {
    let selector = match (payload.id_in, payload.identifier_in) {
        (Some(ids), None) => RoleSelector::IdIn(ids),
        (None, Some(identifiers)) => RoleSelector::IdentifierIn(identifiers),
        _ => return Err(AppError::validation("authPermission.syncRoles.exactlyOneSelector")),
    };
    let delta =
        state.permission_engine.user_sync_roles(&ctx.summary.permissions, id, tenant.0.tenant.id, selector).await?;
    Ok(Json(RoleSyncResp { added: delta.to_add, removed: delta.to_remove }))
}

#[utoipa::path(
    get,
    path = "/auth/permission/user/{id}/summary",
    tag = "permission",
    operation_id = "permission_user_summary",
    responses((status = 200, description = "Target user's roles and permissions", body = UserPermissionSummaryResp))
)]
pub async fn user_summary(
    State(state): State<AppState>,
    tenant: TenantContext,
    ctx: SessionContext,
    Path(id): Path<Uuid>,
) -> Result<Json<UserPermissionSummaryResp>, AppError> {
    if !ctx.summary.permissions.iter().any(|p| p == identity_core_core::domains::permission::MANAGE_PERMISSION) {
        return Err(AppError::forbidden("authPermission.userSummary.missingPermission"));
    }
    let summary = state.permission_engine.user_summary(id, tenant.0.tenant.id).await?;
    Ok(Json(UserPermissionSummaryResp { roles: summary.roles, permissions: summary.permissions }))
}
