use async_trait::async_trait;
use chrono::{DateTime, Utc};
use identity_core_core::domains::auth::password::{PasswordLogin, PasswordLoginRepository, PasswordLoginReset};
use identity_core_core::domains::user::PasswordEmailUniquenessChecker;
use shared_error::AppError;
use sqlx::PgPool;
use uuid::Uuid;

pub struct PgPasswordLoginRepository {
    pool: PgPool,
}

impl PgPasswordLoginRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PasswordLoginRepository for PgPasswordLoginRepository {
    async fn find_by_email(&self, tenant_id: Uuid, email: &str) -> Result<Option<PasswordLogin>, AppError> {
        Ok(sqlx::query_as::<_, PasswordLogin>(
            "SELECT * FROM password_logins WHERE tenant_id = $1 AND email = $2",
        )
        .bind(tenant_id)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<PasswordLogin>, AppError> {
        Ok(sqlx::query_as::<_, PasswordLogin>("SELECT * FROM password_logins WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert(
        &self,
        user_id: Uuid,
        tenant_id: Uuid,
        email: &str,
        password_hash: &str,
    ) -> Result<PasswordLogin, AppError> {
        Ok(sqlx::query_as::<_, PasswordLogin>(
            r#"
            INSERT INTO password_logins
                (user_id, tenant_id, email, password_hash, verified_at, otp_enabled_at, otp_secret, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NULL, NULL, NULL, now(), now())
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(tenant_id)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn update_password_hash(&self, user_id: Uuid, password_hash: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE password_logins SET password_hash = $1, updated_at = now() WHERE user_id = $2")
            .bind(password_hash)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_email(&self, user_id: Uuid, email: &str) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE password_logins SET email = $1, verified_at = NULL, updated_at = now() WHERE user_id = $2",
        )
        .bind(email)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn set_verified(&self, user_id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE password_logins SET verified_at = now() WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn set_otp_secret(&self, user_id: Uuid, secret: &str, enabled: bool) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE password_logins SET otp_secret = $1, otp_enabled_at = CASE WHEN $2 THEN now() ELSE NULL END
             WHERE user_id = $3",
        )
        .bind(secret)
        .bind(enabled)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn count_attempts_since(&self, user_id: Uuid, since: DateTime<Utc>) -> Result<i64, AppError> {
        Ok(sqlx::query_scalar::<_, i64>(
            "SELECT count(*) FROM password_login_attempts WHERE user_id = $1 AND created_at >= $2",
        )
        .bind(user_id)
        .bind(since)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn insert_attempt(&self, user_id: Uuid) -> Result<(), AppError> {
        sqlx::query("INSERT INTO password_login_attempts (id, user_id, created_at) VALUES ($1, $2, now())")
            .bind(Uuid::new_v4())
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_reset_token(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
        should_set_password: bool,
    ) -> Result<PasswordLoginReset, AppError> {
        Ok(sqlx::query_as::<_, PasswordLoginReset>(
            r#"
            INSERT INTO password_login_resets
                (id, user_id, token_hash, expires_at, should_set_password, created_at)
            VALUES ($1, $2, $3, $4, $5, now())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(token_hash)
        .bind(expires_at)
        .bind(should_set_password)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn find_reset_token_by_hash(&self, token_hash: &str) -> Result<Option<PasswordLoginReset>, AppError> {
        Ok(sqlx::query_as::<_, PasswordLoginReset>(
            "SELECT * FROM password_login_resets WHERE token_hash = $1",
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete_reset_token(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM password_login_resets WHERE id = $1").bind(id).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl PasswordEmailUniquenessChecker for PgPasswordLoginRepository {
    async fn email_used_in_tenant(
        &self,
        tenant_id: Uuid,
        email: &str,
        excluding_user_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT count(*) FROM password_logins
             WHERE tenant_id = $1 AND email = $2 AND ($3::uuid IS NULL OR user_id != $3)",
        )
        .bind(tenant_id)
        .bind(email)
        .bind(excluding_user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }
}
