use super::model::TotpSettings;
use async_trait::async_trait;
use shared_error::AppError;
use uuid::Uuid;

#[async_trait]
pub trait TotpRepository: Send + Sync {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<TotpSettings>, AppError>;
    /// Overwrites an unverified setup; must reject if the existing row is
    /// already verified (spec §3: "Unverified setup is overwritable;
    /// verified setup protected").
    async fn upsert_unverified(&self, user_id: Uuid, secret: &str) -> Result<TotpSettings, AppError>;
    async fn mark_verified(&self, user_id: Uuid) -> Result<(), AppError>;
    async fn delete(&self, user_id: Uuid) -> Result<(), AppError>;
}
