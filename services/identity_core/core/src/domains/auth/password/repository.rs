use super::model::{PasswordLogin, PasswordLoginReset};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared_error::AppError;
use uuid::Uuid;

#[async_trait]
pub trait PasswordLoginRepository: Send + Sync {
    async fn find_by_email(&self, tenant_id: Uuid, email: &str) -> Result<Option<PasswordLogin>, AppError>;
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<PasswordLogin>, AppError>;
    async fn insert(&self, user_id: Uuid, tenant_id: Uuid, email: &str, password_hash: &str) -> Result<PasswordLogin, AppError>;
    async fn update_password_hash(&self, user_id: Uuid, password_hash: &str) -> Result<(), AppError>;
    async fn update_email(&self, user_id: Uuid, email: &str) -> Result<(), AppError>;
    async fn set_verified(&self, user_id: Uuid) -> Result<(), AppError>;
    async fn set_otp_secret(&self, user_id: Uuid, secret: &str, enabled: bool) -> Result<(), AppError>;

    async fn count_attempts_since(&self, user_id: Uuid, since: DateTime<Utc>) -> Result<i64, AppError>;
    async fn insert_attempt(&self, user_id: Uuid) -> Result<(), AppError>;

    async fn insert_reset_token(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
        should_set_password: bool,
    ) -> Result<PasswordLoginReset, AppError>;
    async fn find_reset_token_by_hash(&self, token_hash: &str) -> Result<Option<PasswordLoginReset>, AppError>;
    async fn delete_reset_token(&self, id: Uuid) -> Result<(), AppError>;
}
