use super::model::KeycloakLogin;
use async_trait::async_trait;
use shared_error::AppError;
use uuid::Uuid;

#[async_trait]
pub trait KeycloakLoginRepository: Send + Sync {
    async fn find_by_email(&self, tenant_id: Uuid, email: &str) -> Result<Option<KeycloakLogin>, AppError>;
    async fn insert(&self, user_id: Uuid, tenant_id: Uuid, email: &str) -> Result<KeycloakLogin, AppError>;
}
