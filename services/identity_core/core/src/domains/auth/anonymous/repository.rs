use super::model::AnonymousLogin;
use async_trait::async_trait;
use shared_error::AppError;
use uuid::Uuid;

#[async_trait]
pub trait AnonymousLoginRepository: Send + Sync {
    async fn find_by_token(&self, tenant_id: Uuid, login_token: &str) -> Result<Option<AnonymousLogin>, AppError>;
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<AnonymousLogin>, AppError>;
    async fn insert(&self, user_id: Uuid, tenant_id: Uuid, login_token: &str) -> Result<AnonymousLogin, AppError>;
}
