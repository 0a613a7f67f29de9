use async_trait::async_trait;
use identity_core_core::domains::tenant::{Tenant, TenantRepository};
use shared_error::AppError;
use sqlx::PgPool;
use uuid::Uuid;

pub struct PgTenantRepository {
    pool: PgPool,
}

impl PgTenantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TenantRepository for PgTenantRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tenant>, AppError> {
        Ok(sqlx::query_as::<_, Tenant>("SELECT * FROM tenants WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Tenant>, AppError> {
        Ok(sqlx::query_as::<_, Tenant>("SELECT * FROM tenants WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_all(&self) -> Result<Vec<Tenant>, AppError> {
        Ok(sqlx::query_as::<_, Tenant>("SELECT * FROM tenants ORDER BY name").fetch_all(&self.pool).await?)
    }

    async fn upsert_from_config(
        &self,
        name: &str,
        data: serde_json::Value,
        url_config: serde_json::Value,
    ) -> Result<Tenant, AppError> {
        Ok(sqlx::query_as::<_, Tenant>(
            r#"
            INSERT INTO tenants (id, name, data, url_config, created_at, updated_at)
            VALUES ($1, $2, $3, $4, now(), now())
            ON CONFLICT (name) DO UPDATE
                SET data = EXCLUDED.data, url_config = EXCLUDED.url_config, updated_at = now()
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(data)
        .bind(url_config)
        .fetch_one(&self.pool)
        .await?)
    }
}
