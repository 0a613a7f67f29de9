use super::model::{Device, DeviceInput, Session, SessionData, SessionToken, TokenKind};
use async_trait::async_trait;
use shared_error::AppError;
use uuid::Uuid;

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create_session(&self, data: &SessionData) -> Result<Session, AppError>;
    async fn find_session(&self, id: Uuid) -> Result<Option<Session>, AppError>;
    async fn update_session_data(&self, id: Uuid, data: &SessionData) -> Result<Session, AppError>;
    async fn revoke_session(&self, id: Uuid) -> Result<(), AppError>;
    /// Hard delete: cascades to tokens and device.
    async fn delete_session(&self, id: Uuid) -> Result<(), AppError>;

    async fn create_token(
        &self,
        id: Uuid,
        session_id: Uuid,
        kind: TokenKind,
        token_hash: &str,
        ttl_seconds: i64,
        parent_refresh_token_id: Option<Uuid>,
    ) -> Result<SessionToken, AppError>;
    async fn find_token_by_hash(&self, token_hash: &str) -> Result<Option<SessionToken>, AppError>;
    async fn find_token(&self, id: Uuid) -> Result<Option<SessionToken>, AppError>;
    async fn revoke_token(&self, id: Uuid) -> Result<(), AppError>;
    /// Replay detection rule (spec §4.3 step 6): revoke every token
    /// belonging to this session, and the session itself.
    async fn revoke_chain(&self, session_id: Uuid) -> Result<(), AppError>;

    async fn attach_device(&self, session_id: Uuid, device: &DeviceInput) -> Result<Device, AppError>;
    async fn find_device(&self, session_id: Uuid) -> Result<Option<Device>, AppError>;
    async fn count_active_mobile_sessions(&self, user_id: Uuid) -> Result<i64, AppError>;
    async fn delete_sessions_for_user(&self, user_id: Uuid) -> Result<(), AppError>;
    async fn delete_sessions_for_user_except(&self, user_id: Uuid, except_session_id: Uuid) -> Result<(), AppError>;
    async fn list_sessions_for_user(&self, user_id: Uuid) -> Result<Vec<Session>, AppError>;
}
