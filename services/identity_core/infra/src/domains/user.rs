use async_trait::async_trait;
use identity_core_core::domains::user::{User, UserRepository, UserTenant};
use shared_error::AppError;
use sqlx::PgPool;
use uuid::Uuid;

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, display_name: Option<&str>) -> Result<User, AppError> {
        Ok(sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, display_name, last_login, deleted_at, created_at, updated_at)
            VALUES ($1, $2, NULL, NULL, now(), now())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(display_name)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1").bind(id).fetch_optional(&self.pool).await?)
    }

    async fn update_display_name(&self, id: Uuid, display_name: &str) -> Result<User, AppError> {
        Ok(sqlx::query_as::<_, User>(
            "UPDATE users SET display_name = $1, updated_at = now() WHERE id = $2 RETURNING *",
        )
        .bind(display_name)
        .bind(id)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn update_last_login(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET last_login = now() WHERE id = $1").bind(id).execute(&self.pool).await?;
        Ok(())
    }

    async fn list(&self, tenant_id: Uuid, page: i64, page_size: i64) -> Result<(Vec<User>, i64), AppError> {
        let offset = page.saturating_sub(1).max(0) * page_size;
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT u.* FROM users u
            JOIN user_tenants ut ON ut.user_id = u.id
            WHERE ut.tenant_id = $1
            ORDER BY u.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(tenant_id)
        .bind(page_size)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT count(*) FROM user_tenants WHERE tenant_id = $1",
        )
        .bind(tenant_id)
        .fetch_one(&self.pool)
        .await?;
        Ok((users, total))
    }

    async fn soft_delete(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET deleted_at = now() WHERE id = $1").bind(id).execute(&self.pool).await?;
        Ok(())
    }

    async fn reactivate(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET deleted_at = NULL WHERE id = $1").bind(id).execute(&self.pool).await?;
        Ok(())
    }

    async fn add_tenant(&self, user_id: Uuid, tenant_id: Uuid) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO user_tenants (user_id, tenant_id, created_at) VALUES ($1, $2, now())
             ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(tenant_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn is_member_of_tenant(&self, user_id: Uuid, tenant_id: Uuid) -> Result<bool, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT count(*) FROM user_tenants WHERE user_id = $1 AND tenant_id = $2",
        )
        .bind(user_id)
        .bind(tenant_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }

    async fn tenants_for_user(&self, user_id: Uuid) -> Result<Vec<UserTenant>, AppError> {
        Ok(sqlx::query_as::<_, UserTenant>("SELECT * FROM user_tenants WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn all_tenant_ids(&self) -> Result<Vec<Uuid>, AppError> {
        Ok(sqlx::query_scalar::<_, Uuid>("SELECT id FROM tenants").fetch_all(&self.pool).await?)
    }

    /// Re-targets every foreign key in the declarative allowlist
    /// (sessions' embedded `userId`, user_tenants, user_roles); identity
    /// provider tables are never passed here, per the trait contract.
    async fn retarget_foreign_keys(&self, old_user_id: Uuid, new_user_id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "UPDATE sessions SET data = jsonb_set(data, '{user_id}', to_jsonb($2::text))
             WHERE (data->>'user_id')::uuid = $1",
        )
        .bind(old_user_id)
        .bind(new_user_id.to_string())
        .execute(&mut *tx)
        .await?;
        sqlx::query(
            "INSERT INTO user_tenants (user_id, tenant_id, created_at)
             SELECT $2, tenant_id, created_at FROM user_tenants WHERE user_id = $1
             ON CONFLICT DO NOTHING",
        )
        .bind(old_user_id)
        .bind(new_user_id)
        .execute(&mut *tx)
        .await?;
        sqlx::query(
            "INSERT INTO user_roles (user_id, role_id)
             SELECT $2, role_id FROM user_roles WHERE user_id = $1
             ON CONFLICT DO NOTHING",
        )
        .bind(old_user_id)
        .bind(new_user_id)
        .execute(&mut *tx)
        .await?;
        sqlx::query("DELETE FROM user_tenants WHERE user_id = $1").bind(old_user_id).execute(&mut *tx).await?;
        sqlx::query("DELETE FROM user_roles WHERE user_id = $1").bind(old_user_id).execute(&mut *tx).await?;
        sqlx::query("DELETE FROM users WHERE id = $1").bind(old_user_id).execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM users WHERE id = $1").bind(id).execute(&self.pool).await?;
        Ok(())
    }
}
