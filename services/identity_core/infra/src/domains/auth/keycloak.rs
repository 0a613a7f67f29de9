use async_trait::async_trait;
use identity_core_core::domains::auth::keycloak::{KeycloakLogin, KeycloakLoginRepository};
use identity_core_core::domains::user::KeycloakEmailUniquenessChecker;
use shared_error::AppError;
use sqlx::PgPool;
use uuid::Uuid;

pub struct PgKeycloakLoginRepository {
    pool: PgPool,
}

impl PgKeycloakLoginRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KeycloakLoginRepository for PgKeycloakLoginRepository {
    async fn find_by_email(&self, tenant_id: Uuid, email: &str) -> Result<Option<KeycloakLogin>, AppError> {
        Ok(sqlx::query_as::<_, KeycloakLogin>(
            "SELECT * FROM keycloak_logins WHERE tenant_id = $1 AND email = $2",
        )
        .bind(tenant_id)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn insert(&self, user_id: Uuid, tenant_id: Uuid, email: &str) -> Result<KeycloakLogin, AppError> {
        Ok(sqlx::query_as::<_, KeycloakLogin>(
            r#"
            INSERT INTO keycloak_logins (user_id, tenant_id, email, created_at, updated_at)
            VALUES ($1, $2, $3, now(), now())
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(tenant_id)
        .bind(email)
        .fetch_one(&self.pool)
        .await?)
    }
}

#[async_trait]
impl KeycloakEmailUniquenessChecker for PgKeycloakLoginRepository {
    async fn email_used_in_tenant(
        &self,
        tenant_id: Uuid,
        email: &str,
        excluding_user_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT count(*) FROM keycloak_logins
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
