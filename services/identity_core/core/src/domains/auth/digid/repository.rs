use super::model::DigidLogin;
use async_trait::async_trait;
use shared_error::AppError;
use uuid::Uuid;

#[async_trait]
pub trait DigidLoginRepository: Send + Sync {
    async fn find_by_bsn(&self, tenant_id: Uuid, bsn: &str) -> Result<Option<DigidLogin>, AppError>;
    async fn insert(&self, user_id: Uuid, tenant_id: Uuid, bsn: &str) -> Result<DigidLogin, AppError>;
}
