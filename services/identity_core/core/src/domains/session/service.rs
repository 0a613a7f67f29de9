//! Session Store (spec §4.3): issues and validates access/refresh token
//! pairs, rotates refresh tokens, revokes sessions.
//!
//! Token signing itself is delegated to a [`TokenSigner`] implemented by
//! the infra layer (HMAC via `shared_token`) — this crate has no
//! infrastructure dependencies, only the pure state-machine logic and the
//! at-rest hash (`sha2`, already a dependency for the session checksum).

use super::model::{Device, DeviceInput, Session, SessionData, SessionToken, TokenKind, TokenPair};
use super::repository::SessionRepository;
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use shared_error::AppError;
use std::sync::Arc;
use uuid::Uuid;

#[async_trait]
pub trait TokenSigner: Send + Sync {
    fn sign_access(&self, session_id: Uuid, ttl_seconds: i64) -> Result<String, AppError>;
    fn sign_refresh(&self, session_id: Uuid, refresh_token_id: Uuid, ttl_seconds: i64) -> Result<String, AppError>;
    /// Returns the session id the access token claims to belong to.
    fn verify_access(&self, token: &str) -> Result<Uuid, AppError>;
    /// Returns `(session_id, refresh_token_id)`.
    fn verify_refresh(&self, token: &str) -> Result<(Uuid, Uuid), AppError>;
}

/// Resolves the refresh-token max age per call; sees the session and the
/// proposed device (spec §4.3: "may also be resolved per-call from a
/// callback that sees the session and the proposed device").
pub trait RefreshTtlResolver: Send + Sync {
    fn resolve(&self, session: &Session, device: Option<&DeviceInput>) -> i64;
}

pub struct FixedRefreshTtl(pub i64);

impl RefreshTtlResolver for FixedRefreshTtl {
    fn resolve(&self, _session: &Session, _device: Option<&DeviceInput>) -> i64 {
        self.0
    }
}

pub struct SessionStoreConfig {
    pub access_token_ttl_seconds: i64,
    pub refresh_token_ttl_seconds: i64,
    /// Concurrent mobile session cap (spec §4.5.6); `None` disables the check.
    pub max_concurrent_mobile_sessions: Option<i64>,
    /// Reject logins carrying no `device` object (spec §4.5.6).
    pub require_device: bool,
}

fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

pub struct SessionStore<R: SessionRepository, S: TokenSigner> {
    repository: Arc<R>,
    signer: Arc<S>,
    config: SessionStoreConfig,
}

impl<R: SessionRepository, S: TokenSigner> SessionStore<R, S> {
    pub fn new(repository: Arc<R>, signer: Arc<S>, config: SessionStoreConfig) -> Self {
        Self { repository, signer, config }
    }

    /// Creates a new session, an access/refresh token pair, and (if
    /// supplied) attaches a device — all in one operation, matching the
    /// authentication providers' shared tail protocol (spec §4.5).
    pub async fn issue(
        &self,
        data: SessionData,
        device: Option<DeviceInput>,
    ) -> Result<(Session, TokenPair, Option<Device>), AppError> {
        data.validate().map_err(AppError::server_key)?;

        if self.config.require_device && device.is_none() {
            return Err(AppError::validation("authSession.issue.deviceRequired"));
        }

        if let (Some(device_input), Some(cap)) = (&device, self.config.max_concurrent_mobile_sessions) {
            if device_input.platform.is_mobile() {
                if let Some(user_id) = data.user_id {
                    let active = self.repository.count_active_mobile_sessions(user_id).await?;
                    if active >= cap {
                        return Err(AppError::validation("authSession.issue.tooManyMobileSessions"));
                    }
                }
            }
        }

        let session = self.repository.create_session(&data).await?;

        let access_token = self.signer.sign_access(session.id, self.config.access_token_ttl_seconds)?;
        let access_hash = hash_token(&access_token);
        self.repository
            .create_token(
                Uuid::new_v4(),
                session.id,
                TokenKind::Access,
                &access_hash,
                self.config.access_token_ttl_seconds,
                None,
            )
            .await?;

        let refresh_token_id = Uuid::new_v4();
        let refresh_token =
            self.signer.sign_refresh(session.id, refresh_token_id, self.config.refresh_token_ttl_seconds)?;
        let refresh_hash = hash_token(&refresh_token);
        self.repository
            .create_token(
                refresh_token_id,
                session.id,
                TokenKind::Refresh,
                &refresh_hash,
                self.config.refresh_token_ttl_seconds,
                None,
            )
            .await?;

        let attached_device = match device {
            Some(input) => Some(self.repository.attach_device(session.id, &input.normalized()).await?),
            None => None,
        };

        Ok((session, TokenPair { access_token, refresh_token }, attached_device))
    }

    /// Loads and validates a session from a presented access token
    /// (checksum match, non-revoked session, non-revoked/non-expired token).
    pub async fn load_from_access_token(&self, token: &str) -> Result<Session, AppError> {
        let claimed_session_id = self.signer.verify_access(token)?;
        let hash = hash_token(token);
        let token_row = self
            .repository
            .find_token_by_hash(&hash)
            .await?
            .ok_or_else(|| AppError::unauthorized("authSession.load.unknownToken"))?;
        if token_row.session_id != claimed_session_id {
            return Err(AppError::unauthorized("authSession.load.sessionMismatch"));
        }
        let now = chrono::Utc::now();
        if !token_row.is_valid(now) {
            return Err(AppError::unauthorized("authSession.load.tokenExpiredOrRevoked"));
        }

        let session = self
            .repository
            .find_session(token_row.session_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("authSession.load.unknownSession"))?;
        if session.is_revoked() {
            return Err(AppError::unauthorized("authSession.load.revoked"));
        }
        if !session.checksum_matches() {
            return Err(AppError::unauthorized("authSession.load.checksumMismatch"));
        }
        Ok(session)
    }

    /// Refresh protocol (spec §4.3 steps 1-6), including the replay rule.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AppError> {
        let (claimed_session_id, refresh_token_id) = self.signer.verify_refresh(refresh_token)?;

        let token_row = self
            .repository
            .find_token(refresh_token_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("authSession.refresh.unknownToken"))?;
        if token_row.session_id != claimed_session_id || token_row.kind != "refresh" {
            return Err(AppError::unauthorized("authSession.refresh.tokenMismatch"));
        }

        let session = self
            .repository
            .find_session(token_row.session_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("authSession.refresh.unknownSession"))?;
        if session.is_revoked() {
            return Err(AppError::unauthorized("authSession.refresh.sessionRevoked"));
        }

        if token_row.revoked_at.is_some() {
            // Replay: a refresh token that was already rotated is being
            // presented again. Revoke the whole chain for this session.
            self.repository.revoke_chain(session.id).await?;
            return Err(AppError::unauthorized("authSession.refresh.replayDetected"));
        }
        if token_row.expires_at <= chrono::Utc::now() {
            return Err(AppError::unauthorized("authSession.refresh.expired"));
        }

        self.repository.revoke_token(token_row.id).await?;

        let access_token = self.signer.sign_access(session.id, self.config.access_token_ttl_seconds)?;
        let access_hash = hash_token(&access_token);
        self.repository
            .create_token(
                Uuid::new_v4(),
                session.id,
                TokenKind::Access,
                &access_hash,
                self.config.access_token_ttl_seconds,
                None,
            )
            .await?;

        let new_refresh_token_id = Uuid::new_v4();
        let new_refresh_token = self.signer.sign_refresh(
            session.id,
            new_refresh_token_id,
            self.config.refresh_token_ttl_seconds,
        )?;
        let new_refresh_hash = hash_token(&new_refresh_token);
        self.repository
            .create_token(
                new_refresh_token_id,
                session.id,
                TokenKind::Refresh,
                &new_refresh_hash,
                self.config.refresh_token_ttl_seconds,
                Some(token_row.id),
            )
            .await?;

        Ok(TokenPair { access_token, refresh_token: new_refresh_token })
    }

    pub async fn update_data(&self, session_id: Uuid, data: SessionData) -> Result<Session, AppError> {
        data.validate().map_err(AppError::server_key)?;
        self.repository.update_session_data(session_id, &data).await
    }

    pub async fn invalidate(&self, session_id: Uuid) -> Result<(), AppError> {
        self.repository.revoke_session(session_id).await
    }

    pub async fn delete(&self, session_id: Uuid) -> Result<(), AppError> {
        self.repository.delete_session(session_id).await
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Session>, AppError> {
        self.repository.list_sessions_for_user(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::common::{LoginType, SessionType};

    struct FakeSigner;

    #[async_trait]
    impl TokenSigner for FakeSigner {
        fn sign_access(&self, session_id: Uuid, _ttl: i64) -> Result<String, AppError> {
            Ok(format!("access:{session_id}"))
        }
        fn sign_refresh(&self, session_id: Uuid, refresh_id: Uuid, _ttl: i64) -> Result<String, AppError> {
            Ok(format!("refresh:{session_id}:{refresh_id}"))
        }
        fn verify_access(&self, token: &str) -> Result<Uuid, AppError> {
            let id = token.strip_prefix("access:").ok_or_else(|| AppError::unauthorized("bad"))?;
            Uuid::parse_str(id).map_err(|_| AppError::unauthorized("bad"))
        }
        fn verify_refresh(&self, token: &str) -> Result<(Uuid, Uuid), AppError> {
            let rest = token.strip_prefix("refresh:").ok_or_else(|| AppError::unauthorized("bad"))?;
            let mut parts = rest.splitn(2, ':');
            let session_id = Uuid::parse_str(parts.next().unwrap()).map_err(|_| AppError::unauthorized("bad"))?;
            let refresh_id = Uuid::parse_str(parts.next().unwrap()).map_err(|_| AppError::unauthorized("bad"))?;
            Ok((session_id, refresh_id))
        }
    }

    #[test]
    fn hash_token_is_deterministic() {
        assert_eq!(hash_token("abc"), hash_token("abc"));
        assert_ne!(hash_token("abc"), hash_token("abd"));
    }

    struct UnreachableRepository;

    #[async_trait]
    impl SessionRepository for UnreachableRepository {
        async fn create_session(&self, _data: &SessionData) -> Result<Session, AppError> {
            unreachable!("require_device must reject before touching the repository")
        }
        async fn find_session(&self, _id: Uuid) -> Result<Option<Session>, AppError> {
            unreachable!()
        }
        async fn update_session_data(&self, _id: Uuid, _data: &SessionData) -> Result<Session, AppError> {
            unreachable!()
        }
        async fn revoke_session(&self, _id: Uuid) -> Result<(), AppError> {
            unreachable!()
        }
        async fn delete_session(&self, _id: Uuid) -> Result<(), AppError> {
            unreachable!()
        }
        async fn create_token(
            &self,
            _id: Uuid,
            _session_id: Uuid,
            _kind: TokenKind,
            _token_hash: &str,
            _ttl_seconds: i64,
            _parent_refresh_token_id: Option<Uuid>,
        ) -> Result<SessionToken, AppError> {
            unreachable!()
        }
        async fn find_token_by_hash(&self, _token_hash: &str) -> Result<Option<SessionToken>, AppError> {
            unreachable!()
        }
        async fn find_token(&self, _id: Uuid) -> Result<Option<SessionToken>, AppError> {
            unreachable!()
        }
        async fn revoke_token(&self, _id: Uuid) -> Result<(), AppError> {
            unreachable!()
        }
        async fn revoke_chain(&self, _session_id: Uuid) -> Result<(), AppError> {
            unreachable!()
        }
        async fn attach_device(&self, _session_id: Uuid, _device: &DeviceInput) -> Result<Device, AppError> {
            unreachable!()
        }
        async fn find_device(&self, _session_id: Uuid) -> Result<Option<Device>, AppError> {
            unreachable!()
        }
        async fn count_active_mobile_sessions(&self, _user_id: Uuid) -> Result<i64, AppError> {
            unreachable!()
        }
        async fn delete_sessions_for_user(&self, _user_id: Uuid) -> Result<(), AppError> {
            unreachable!()
        }
        async fn delete_sessions_for_user_except(&self, _user_id: Uuid, _except_session_id: Uuid) -> Result<(), AppError> {
            unreachable!()
        }
        async fn list_sessions_for_user(&self, _user_id: Uuid) -> Result<Vec<Session>, AppError> {
            unreachable!()
        }
    }

    #[tokio::test]
    async fn issue_rejects_a_deviceless_login_when_required() {
        let store = SessionStore::new(
            Arc::new(UnreachableRepository),
            Arc::new(FakeSigner),
            SessionStoreConfig {
                access_token_ttl_seconds: 900,
                refresh_token_ttl_seconds: 604_800,
                max_concurrent_mobile_sessions: None,
                require_device: true,
            },
        );
        let data = SessionData {
            user_id: Some(Uuid::new_v4()),
            login_type: Some(LoginType::PasswordBased),
            session_type: SessionType::User,
            two_step_type: None,
            impersonator_user_id: None,
        };

        let err = store.issue(data, None).await.unwrap_err();
        assert_eq!(err.key(), "authSession.issue.deviceRequired");
    }

    #[test]
    fn session_data_for_checkstep_carries_two_step_type() {
        let data = SessionData {
            user_id: Some(Uuid::new_v4()),
            login_type: Some(LoginType::PasswordBased),
            session_type: SessionType::CheckTwoStep,
            two_step_type: Some(crate::domains::common::TwoStepType::PasswordBasedOtp),
            impersonator_user_id: None,
        };
        assert!(data.validate().is_ok());
    }
}
