use super::model::{Permission, Role, RolePermission, UserRole};
use async_trait::async_trait;
use shared_error::AppError;
use uuid::Uuid;

#[async_trait]
pub trait PermissionRepository: Send + Sync {
    async fn list_permissions(&self) -> Result<Vec<Permission>, AppError>;
    async fn permissions_by_identifiers(&self, identifiers: &[String]) -> Result<Vec<Permission>, AppError>;
    async fn insert_permission(&self, identifier: &str) -> Result<Permission, AppError>;
    async fn delete_permissions_not_in(&self, identifiers: &[String]) -> Result<u64, AppError>;

    async fn find_role_by_identifier(
        &self,
        identifier: &str,
        tenant_id: Option<Uuid>,
    ) -> Result<Option<Role>, AppError>;
    async fn insert_role(
        &self,
        identifier: &str,
        tenant_id: Option<Uuid>,
        is_static: bool,
    ) -> Result<Role, AppError>;
    async fn delete_role(&self, role_id: Uuid) -> Result<(), AppError>;
    async fn list_roles_for_tenant(&self, tenant_id: Uuid) -> Result<Vec<Role>, AppError>;
    async fn find_role_by_id(&self, role_id: Uuid) -> Result<Option<Role>, AppError>;

    async fn clear_role_permissions(&self, role_id: Uuid) -> Result<(), AppError>;
    async fn add_role_permissions(&self, role_id: Uuid, permission_ids: &[Uuid]) -> Result<(), AppError>;
    async fn remove_role_permissions(&self, role_id: Uuid, permission_ids: &[Uuid]) -> Result<(), AppError>;
    async fn role_permissions(&self, role_id: Uuid) -> Result<Vec<RolePermission>, AppError>;

    async fn assign_role(&self, user_id: Uuid, role_id: Uuid) -> Result<(), AppError>;
    async fn remove_role(&self, user_id: Uuid, role_id: Uuid) -> Result<(), AppError>;
    async fn user_roles(&self, user_id: Uuid) -> Result<Vec<UserRole>, AppError>;
    async fn user_has_role(&self, user_id: Uuid, role_id: Uuid) -> Result<bool, AppError>;

    /// Every permission identifier reachable by the user, across every
    /// role whose `tenant` is `None` (global) or the given tenant.
    async fn user_permission_identifiers(
        &self,
        user_id: Uuid,
        tenant_id: Uuid,
    ) -> Result<Vec<String>, AppError>;
    async fn user_role_identifiers(
        &self,
        user_id: Uuid,
        tenant_id: Uuid,
    ) -> Result<Vec<String>, AppError>;
}
