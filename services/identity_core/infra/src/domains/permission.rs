use async_trait::async_trait;
use identity_core_core::domains::permission::{Permission, PermissionRepository, Role, RolePermission, UserRole};
use shared_error::AppError;
use sqlx::PgPool;
use uuid::Uuid;

pub struct PgPermissionRepository {
    pool: PgPool,
}

impl PgPermissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PermissionRepository for PgPermissionRepository {
    async fn list_permissions(&self) -> Result<Vec<Permission>, AppError> {
        Ok(sqlx::query_as::<_, Permission>("SELECT * FROM permissions ORDER BY identifier")
            .fetch_all(&self.pool)
            .await?)
    }

    async fn permissions_by_identifiers(&self, identifiers: &[String]) -> Result<Vec<Permission>, AppError> {
        Ok(sqlx::query_as::<_, Permission>("SELECT * FROM permissions WHERE identifier = ANY($1)")
            .bind(identifiers)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn insert_permission(&self, identifier: &str) -> Result<Permission, AppError> {
        Ok(sqlx::query_as::<_, Permission>(
            "INSERT INTO permissions (id, identifier, created_at) VALUES ($1, $2, now())
             ON CONFLICT (identifier) DO UPDATE SET identifier = EXCLUDED.identifier
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(identifier)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn delete_permissions_not_in(&self, identifiers: &[String]) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM permissions WHERE NOT (identifier = ANY($1))")
            .bind(identifiers)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn find_role_by_identifier(
        &self,
        identifier: &str,
        tenant_id: Option<Uuid>,
    ) -> Result<Option<Role>, AppError> {
        Ok(sqlx::query_as::<_, Role>(
            "SELECT * FROM roles WHERE identifier = $1 AND tenant_id IS NOT DISTINCT FROM $2",
        )
        .bind(identifier)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn insert_role(&self, identifier: &str, tenant_id: Option<Uuid>, is_static: bool) -> Result<Role, AppError> {
        Ok(sqlx::query_as::<_, Role>(
            r#"
            INSERT INTO roles (id, identifier, tenant_id, is_static, created_at, updated_at)
            VALUES ($1, $2, $3, $4, now(), now())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(identifier)
        .bind(tenant_id)
        .bind(is_static)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn delete_role(&self, role_id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM roles WHERE id = $1").bind(role_id).execute(&self.pool).await?;
        Ok(())
    }

    async fn list_roles_for_tenant(&self, tenant_id: Uuid) -> Result<Vec<Role>, AppError> {
        Ok(sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE tenant_id = $1 ORDER BY identifier")
            .bind(tenant_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_role_by_id(&self, role_id: Uuid) -> Result<Option<Role>, AppError> {
        Ok(sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE id = $1").bind(role_id).fetch_optional(&self.pool).await?)
    }

    async fn clear_role_permissions(&self, role_id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM role_permissions WHERE role_id = $1").bind(role_id).execute(&self.pool).await?;
        Ok(())
    }

    async fn add_role_permissions(&self, role_id: Uuid, permission_ids: &[Uuid]) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO role_permissions (role_id, permission_id)
             SELECT $1, unnest($2::uuid[])
             ON CONFLICT DO NOTHING",
        )
        .bind(role_id)
        .bind(permission_ids)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove_role_permissions(&self, role_id: Uuid, permission_ids: &[Uuid]) -> Result<(), AppError> {
        sqlx::query("DELETE FROM role_permissions WHERE role_id = $1 AND permission_id = ANY($2)")
            .bind(role_id)
            .bind(permission_ids)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn role_permissions(&self, role_id: Uuid) -> Result<Vec<RolePermission>, AppError> {
        Ok(sqlx::query_as::<_, RolePermission>("SELECT * FROM role_permissions WHERE role_id = $1")
            .bind(role_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn assign_role(&self, user_id: Uuid, role_id: Uuid) -> Result<(), AppError> {
        sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
            .bind(user_id)
            .bind(role_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn remove_role(&self, user_id: Uuid, role_id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM user_roles WHERE user_id = $1 AND role_id = $2")
            .bind(user_id)
            .bind(role_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn user_roles(&self, user_id: Uuid) -> Result<Vec<UserRole>, AppError> {
        Ok(sqlx::query_as::<_, UserRole>("SELECT * FROM user_roles WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn user_has_role(&self, user_id: Uuid, role_id: Uuid) -> Result<bool, AppError> {
        let row = sqlx::query_scalar::<_, i64>(
            "SELECT count(*) FROM user_roles WHERE user_id = $1 AND role_id = $2",
        )
        .bind(user_id)
        .bind(role_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row > 0)
    }

    async fn user_permission_identifiers(&self, user_id: Uuid, tenant_id: Uuid) -> Result<Vec<String>, AppError> {
        Ok(sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT p.identifier
            FROM user_roles ur
            JOIN roles r ON r.id = ur.role_id
            JOIN role_permissions rp ON rp.role_id = r.id
            JOIN permissions p ON p.id = rp.permission_id
            WHERE ur.user_id = $1 AND (r.tenant_id IS NULL OR r.tenant_id = $2)
            "#,
        )
        .bind(user_id)
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn user_role_identifiers(&self, user_id: Uuid, tenant_id: Uuid) -> Result<Vec<String>, AppError> {
        Ok(sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT r.identifier
            FROM user_roles ur
            JOIN roles r ON r.id = ur.role_id
            WHERE ur.user_id = $1 AND (r.tenant_id IS NULL OR r.tenant_id = $2)
            "#,
        )
        .bind(user_id)
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?)
    }
}
