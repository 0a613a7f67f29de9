use async_trait::async_trait;
use identity_core_core::domains::common::DevicePlatform;
use identity_core_core::domains::session::{
    Device, DeviceInput, Session, SessionData, SessionRepository, SessionToken, TokenKind,
};
use shared_error::AppError;
use sqlx::PgPool;
use uuid::Uuid;

pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn kind_str(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::Access => "access",
        TokenKind::Refresh => "refresh",
    }
}

fn platform_str(platform: DevicePlatform) -> &'static str {
    match platform {
        DevicePlatform::Apple => "apple",
        DevicePlatform::Android => "android",
        DevicePlatform::Desktop => "desktop",
        DevicePlatform::Other => "other",
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn create_session(&self, data: &SessionData) -> Result<Session, AppError> {
        let checksum = data.checksum();
        Ok(sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (id, checksum, data, revoked_at, created_at)
            VALUES ($1, $2, $3, NULL, now())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(checksum)
        .bind(sqlx::types::Json(data.clone()))
        .fetch_one(&self.pool)
        .await?)
    }

    async fn find_session(&self, id: Uuid) -> Result<Option<Session>, AppError> {
        Ok(sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn update_session_data(&self, id: Uuid, data: &SessionData) -> Result<Session, AppError> {
        let checksum = data.checksum();
        Ok(sqlx::query_as::<_, Session>(
            "UPDATE sessions SET data = $1, checksum = $2 WHERE id = $3 RETURNING *",
        )
        .bind(sqlx::types::Json(data.clone()))
        .bind(checksum)
        .bind(id)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn revoke_session(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE sessions SET revoked_at = now() WHERE id = $1 AND revoked_at IS NULL")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_session(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM sessions WHERE id = $1").bind(id).execute(&self.pool).await?;
        Ok(())
    }

    async fn create_token(
        &self,
        id: Uuid,
        session_id: Uuid,
        kind: TokenKind,
        token_hash: &str,
        ttl_seconds: i64,
        parent_refresh_token_id: Option<Uuid>,
    ) -> Result<SessionToken, AppError> {
        Ok(sqlx::query_as::<_, SessionToken>(
            r#"
            INSERT INTO session_tokens
                (id, session_id, kind, token_hash, expires_at, parent_refresh_token_id, revoked_at, created_at)
            VALUES ($1, $2, $3, $4, now() + ($5 || ' seconds')::interval, $6, NULL, now())
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(session_id)
        .bind(kind_str(kind))
        .bind(token_hash)
        .bind(ttl_seconds.to_string())
        .bind(parent_refresh_token_id)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn find_token_by_hash(&self, token_hash: &str) -> Result<Option<SessionToken>, AppError> {
        Ok(sqlx::query_as::<_, SessionToken>("SELECT * FROM session_tokens WHERE token_hash = $1")
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_token(&self, id: Uuid) -> Result<Option<SessionToken>, AppError> {
        Ok(sqlx::query_as::<_, SessionToken>("SELECT * FROM session_tokens WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn revoke_token(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE session_tokens SET revoked_at = now() WHERE id = $1 AND revoked_at IS NULL")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn revoke_chain(&self, session_id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("UPDATE session_tokens SET revoked_at = now() WHERE session_id = $1 AND revoked_at IS NULL")
            .bind(session_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE sessions SET revoked_at = now() WHERE id = $1 AND revoked_at IS NULL")
            .bind(session_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn attach_device(&self, session_id: Uuid, device: &DeviceInput) -> Result<Device, AppError> {
        Ok(sqlx::query_as::<_, Device>(
            r#"
            INSERT INTO devices (session_id, platform, name, notification_token, web_push_subscription, created_at)
            VALUES ($1, $2, $3, $4, $5, now())
            ON CONFLICT (session_id) DO UPDATE
                SET platform = EXCLUDED.platform, name = EXCLUDED.name,
                    notification_token = EXCLUDED.notification_token,
                    web_push_subscription = EXCLUDED.web_push_subscription
            RETURNING *
            "#,
        )
        .bind(session_id)
        .bind(platform_str(device.platform))
        .bind(&device.name)
        .bind(&device.notification_token)
        .bind(device.web_push_subscription.clone().map(sqlx::types::Json))
        .fetch_one(&self.pool)
        .await?)
    }

    async fn find_device(&self, session_id: Uuid) -> Result<Option<Device>, AppError> {
        Ok(sqlx::query_as::<_, Device>("SELECT * FROM devices WHERE session_id = $1")
            .bind(session_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn count_active_mobile_sessions(&self, user_id: Uuid) -> Result<i64, AppError> {
        Ok(sqlx::query_scalar::<_, i64>(
            r#"
            SELECT count(*)
            FROM sessions s
            JOIN devices d ON d.session_id = s.id
            WHERE s.revoked_at IS NULL
              AND d.platform IN ('apple', 'android')
              AND (s.data->>'user_id')::uuid = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn delete_sessions_for_user(&self, user_id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM sessions WHERE (data->>'user_id')::uuid = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_sessions_for_user_except(&self, user_id: Uuid, except_session_id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM sessions WHERE (data->>'user_id')::uuid = $1 AND id != $2")
            .bind(user_id)
            .bind(except_session_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_sessions_for_user(&self, user_id: Uuid) -> Result<Vec<Session>, AppError> {
        Ok(sqlx::query_as::<_, Session>(
            "SELECT * FROM sessions WHERE (data->>'user_id')::uuid = $1 AND revoked_at IS NULL ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }
}
