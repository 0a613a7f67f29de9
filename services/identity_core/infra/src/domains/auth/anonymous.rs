use async_trait::async_trait;
use identity_core_core::domains::auth::anonymous::{AnonymousLogin, AnonymousLoginRepository};
use shared_error::AppError;
use sqlx::PgPool;
use uuid::Uuid;

pub struct PgAnonymousLoginRepository {
    pool: PgPool,
}

impl PgAnonymousLoginRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnonymousLoginRepository for PgAnonymousLoginRepository {
    async fn find_by_token(&self, tenant_id: Uuid, login_token: &str) -> Result<Option<AnonymousLogin>, AppError> {
        Ok(sqlx::query_as::<_, AnonymousLogin>(
            "SELECT * FROM anonymous_logins WHERE tenant_id = $1 AND login_token = $2",
        )
        .bind(tenant_id)
        .bind(login_token)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<AnonymousLogin>, AppError> {
        Ok(sqlx::query_as::<_, AnonymousLogin>("SELECT * FROM anonymous_logins WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert(&self, user_id: Uuid, tenant_id: Uuid, login_token: &str) -> Result<AnonymousLogin, AppError> {
        Ok(sqlx::query_as::<_, AnonymousLogin>(
            r#"
            INSERT INTO anonymous_logins (user_id, tenant_id, login_token, is_allowed_to_login, created_at, updated_at)
            VALUES ($1, $2, $3, true, now(), now())
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(tenant_id)
        .bind(login_token)
        .fetch_one(&self.pool)
        .await?)
    }
}
