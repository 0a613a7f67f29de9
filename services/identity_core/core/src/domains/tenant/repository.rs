use super::model::Tenant;
use async_trait::async_trait;
use shared_error::AppError;
use uuid::Uuid;

/// Tenant persistence (spec §3, §4.1). Implementations must treat `name`
/// as globally unique.
#[async_trait]
pub trait TenantRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tenant>, AppError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Tenant>, AppError>;
    async fn list_all(&self) -> Result<Vec<Tenant>, AppError>;

    /// Startup sync hook: insert a tenant row that exists in configuration
    /// but not yet in storage, or update `data`/`url_config` for one that
    /// does. Idempotent: running with the same document twice is a no-op.
    async fn upsert_from_config(
        &self,
        name: &str,
        data: serde_json::Value,
        url_config: serde_json::Value,
    ) -> Result<Tenant, AppError>;
}
