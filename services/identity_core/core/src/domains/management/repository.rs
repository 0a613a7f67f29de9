use super::model::ManagementProvisioning;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared_error::AppError;
use uuid::Uuid;

#[async_trait]
pub trait ManagementRepository: Send + Sync {
    async fn insert(&self, user_id: Uuid, messaging_user_id: &str, thread_id: &str) -> Result<ManagementProvisioning, AppError>;
    /// Rows whose owning user is older than the retention cutoff, for
    /// the daily cleanup job (spec §4.8).
    async fn list_older_than(&self, cutoff: DateTime<Utc>) -> Result<Vec<ManagementProvisioning>, AppError>;
    async fn delete(&self, user_id: Uuid) -> Result<(), AppError>;
}
