use async_trait::async_trait;
use identity_core_core::domains::auth::totp::{TotpRepository, TotpSettings};
use shared_error::AppError;
use sqlx::PgPool;
use uuid::Uuid;

pub struct PgTotpRepository {
    pool: PgPool,
}

impl PgTotpRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TotpRepository for PgTotpRepository {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<TotpSettings>, AppError> {
        Ok(sqlx::query_as::<_, TotpSettings>("SELECT * FROM totp_settings WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn upsert_unverified(&self, user_id: Uuid, secret: &str) -> Result<TotpSettings, AppError> {
        Ok(sqlx::query_as::<_, TotpSettings>(
            r#"
            INSERT INTO totp_settings (user_id, secret, verified_at, created_at, updated_at)
            VALUES ($1, $2, NULL, now(), now())
            ON CONFLICT (user_id) DO UPDATE
                SET secret = EXCLUDED.secret, updated_at = now()
                WHERE totp_settings.verified_at IS NULL
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(secret)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn mark_verified(&self, user_id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE totp_settings SET verified_at = now() WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete(&self, user_id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM totp_settings WHERE user_id = $1").bind(user_id).execute(&self.pool).await?;
        Ok(())
    }
}
