use super::model::FeatureFlag;
use async_trait::async_trait;
use shared_error::AppError;

#[async_trait]
pub trait FeatureFlagRepository: Send + Sync {
    async fn list_stored_names(&self) -> Result<Vec<String>, AppError>;
    async fn delete_by_name(&self, name: &str) -> Result<(), AppError>;
    async fn insert_declaration(&self, name: &str) -> Result<(), AppError>;

    async fn list_all(&self) -> Result<Vec<FeatureFlag>, AppError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<FeatureFlag>, AppError>;

    async fn set_global_value(&self, name: &str, value: bool) -> Result<(), AppError>;
    async fn set_tenant_value(&self, name: &str, tenant_name: &str, value: bool) -> Result<(), AppError>;
}
