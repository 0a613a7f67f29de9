use async_trait::async_trait;
use identity_core_core::domains::auth::digid::{DigidLogin, DigidLoginRepository};
use shared_error::AppError;
use sqlx::PgPool;
use uuid::Uuid;

pub struct PgDigidLoginRepository {
    pool: PgPool,
}

impl PgDigidLoginRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DigidLoginRepository for PgDigidLoginRepository {
    async fn find_by_bsn(&self, tenant_id: Uuid, bsn: &str) -> Result<Option<DigidLogin>, AppError> {
        Ok(sqlx::query_as::<_, DigidLogin>("SELECT * FROM digid_logins WHERE tenant_id = $1 AND bsn = $2")
            .bind(tenant_id)
            .bind(bsn)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert(&self, user_id: Uuid, tenant_id: Uuid, bsn: &str) -> Result<DigidLogin, AppError> {
        Ok(sqlx::query_as::<_, DigidLogin>(
            r#"
            INSERT INTO digid_logins (user_id, tenant_id, bsn, created_at, updated_at)
            VALUES ($1, $2, $3, now(), now())
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(tenant_id)
        .bind(bsn)
        .fetch_one(&self.pool)
        .await?)
    }
}
