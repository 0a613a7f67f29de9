use async_trait::async_trait;
use identity_core_core::domains::feature_flag::{FeatureFlag, FeatureFlagRepository};
use shared_error::AppError;
use sqlx::PgPool;
use std::collections::HashMap;

pub struct PgFeatureFlagRepository {
    pool: PgPool,
}

impl PgFeatureFlagRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FeatureFlagRepository for PgFeatureFlagRepository {
    async fn list_stored_names(&self) -> Result<Vec<String>, AppError> {
        Ok(sqlx::query_scalar::<_, String>("SELECT name FROM feature_flags ORDER BY name").fetch_all(&self.pool).await?)
    }

    async fn delete_by_name(&self, name: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM feature_flags WHERE name = $1").bind(name).execute(&self.pool).await?;
        Ok(())
    }

    async fn insert_declaration(&self, name: &str) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO feature_flags (name, global_value, created_at) VALUES ($1, false, now())
             ON CONFLICT (name) DO NOTHING",
        )
        .bind(name)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<FeatureFlag>, AppError> {
        let rows = sqlx::query_as::<_, (String, bool)>("SELECT name, global_value FROM feature_flags ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        let overrides = sqlx::query_as::<_, (String, String, bool)>(
            "SELECT name, tenant_name, value FROM feature_flag_tenant_values",
        )
        .fetch_all(&self.pool)
        .await?;
        let mut flags: HashMap<String, FeatureFlag> = rows
            .into_iter()
            .map(|(name, global_value)| {
                (name.clone(), FeatureFlag { name, global_value, tenant_values: HashMap::new() })
            })
            .collect();
        for (name, tenant_name, value) in overrides {
            if let Some(flag) = flags.get_mut(&name) {
                flag.tenant_values.insert(tenant_name, value);
            }
        }
        let mut flags: Vec<FeatureFlag> = flags.into_values().collect();
        flags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(flags)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<FeatureFlag>, AppError> {
        let Some((global_value,)) =
            sqlx::query_as::<_, (bool,)>("SELECT global_value FROM feature_flags WHERE name = $1")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?
        else {
            return Ok(None);
        };
        let overrides = sqlx::query_as::<_, (String, bool)>(
            "SELECT tenant_name, value FROM feature_flag_tenant_values WHERE name = $1",
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await?;
        Ok(Some(FeatureFlag {
            name: name.to_string(),
            global_value,
            tenant_values: overrides.into_iter().collect(),
        }))
    }

    async fn set_global_value(&self, name: &str, value: bool) -> Result<(), AppError> {
        sqlx::query("UPDATE feature_flags SET global_value = $1 WHERE name = $2")
            .bind(value)
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn set_tenant_value(&self, name: &str, tenant_name: &str, value: bool) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO feature_flag_tenant_values (name, tenant_name, value)
            VALUES ($1, $2, $3)
            ON CONFLICT (name, tenant_name) DO UPDATE SET value = EXCLUDED.value
            "#,
        )
        .bind(name)
        .bind(tenant_name)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
