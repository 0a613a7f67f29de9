use super::model::{User, UserTenant};
use async_trait::async_trait;
use shared_error::AppError;
use uuid::Uuid;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, display_name: Option<&str>) -> Result<User, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;
    async fn update_display_name(&self, id: Uuid, display_name: &str) -> Result<User, AppError>;
    async fn update_last_login(&self, id: Uuid) -> Result<(), AppError>;
    async fn list(&self, tenant_id: Uuid, page: i64, page_size: i64) -> Result<(Vec<User>, i64), AppError>;

    async fn soft_delete(&self, id: Uuid) -> Result<(), AppError>;
    async fn reactivate(&self, id: Uuid) -> Result<(), AppError>;

    async fn add_tenant(&self, user_id: Uuid, tenant_id: Uuid) -> Result<(), AppError>;
    async fn is_member_of_tenant(&self, user_id: Uuid, tenant_id: Uuid) -> Result<bool, AppError>;
    async fn tenants_for_user(&self, user_id: Uuid) -> Result<Vec<UserTenant>, AppError>;
    async fn all_tenant_ids(&self) -> Result<Vec<Uuid>, AppError>;

    /// Re-targets every foreign key in the declarative allowlist (spec
    /// §9(b), DESIGN.md) from `old_user_id` to `new_user_id`, then hard
    /// deletes `old_user_id`. Identity-provider tables are excluded by
    /// the caller, never passed here.
    async fn retarget_foreign_keys(&self, old_user_id: Uuid, new_user_id: Uuid) -> Result<(), AppError>;
    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
}

/// Implemented by the password-login repository; injected so the User
/// Directory's uniqueness check doesn't depend on the auth domain.
#[async_trait]
pub trait PasswordEmailUniquenessChecker: Send + Sync {
    async fn email_used_in_tenant(
        &self,
        tenant_id: Uuid,
        email: &str,
        excluding_user_id: Option<Uuid>,
    ) -> Result<bool, AppError>;
}

/// Implemented by the keycloak-login repository, same contract.
#[async_trait]
pub trait KeycloakEmailUniquenessChecker: Send + Sync {
    async fn email_used_in_tenant(
        &self,
        tenant_id: Uuid,
        email: &str,
        excluding_user_id: Option<Uuid>,
    ) -> Result<bool, AppError>;
}
