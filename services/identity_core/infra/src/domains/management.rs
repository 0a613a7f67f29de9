use async_trait::async_trait;
use chrono::{DateTime, Utc};
use identity_core_core::domains::management::{ManagementProvisioning, ManagementRepository};
use shared_error::AppError;
use sqlx::PgPool;
use uuid::Uuid;

pub struct PgManagementRepository {
    pool: PgPool,
}

impl PgManagementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ManagementRepository for PgManagementRepository {
    async fn insert(
        &self,
        user_id: Uuid,
        messaging_user_id: &str,
        thread_id: &str,
    ) -> Result<ManagementProvisioning, AppError> {
        Ok(sqlx::query_as::<_, ManagementProvisioning>(
            r#"
            INSERT INTO management_provisionings (user_id, messaging_user_id, thread_id, created_at)
            VALUES ($1, $2, $3, now())
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(messaging_user_id)
        .bind(thread_id)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn list_older_than(&self, cutoff: DateTime<Utc>) -> Result<Vec<ManagementProvisioning>, AppError> {
        Ok(sqlx::query_as::<_, ManagementProvisioning>(
            "SELECT * FROM management_provisionings WHERE created_at < $1",
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn delete(&self, user_id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM management_provisionings WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
