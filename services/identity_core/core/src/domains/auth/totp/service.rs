//! TOTP second factor (spec §4.5.5): setup, setup-verify, runtime verify,
//! remove. The actual TOTP math (SHA-512, base32, configurable skew) is
//! delegated to [`TotpCodeVerifier`], implemented in infra via `totp-rs`.

use super::model::{TotpSettings, VERIFY_WINDOW_STEPS};
use super::repository::TotpRepository;
use crate::domains::permission::has_all_permissions;
use shared_error::AppError;
use std::sync::Arc;
use uuid::Uuid;

pub const TOTP_MANAGE_PERMISSION: &str = "auth:totp:manage";

pub trait TotpCodeVerifier: Send + Sync {
    fn new_secret(&self) -> String;
    fn current_code(&self, secret: &str) -> Result<String, AppError>;
    fn verify(&self, secret: &str, code: &str, window_steps: u8) -> Result<bool, AppError>;
    fn otpauth_url(&self, secret: &str, account_name: &str) -> Result<String, AppError>;
}

pub struct TotpProvider<R: TotpRepository, V: TotpCodeVerifier> {
    repository: Arc<R>,
    verifier: Arc<V>,
}

impl<R: TotpRepository, V: TotpCodeVerifier> TotpProvider<R, V> {
    pub fn new(repository: Arc<R>, verifier: Arc<V>) -> Self {
        Self { repository, verifier }
    }

    pub async fn setup(&self, user_id: Uuid, account_name: &str) -> Result<(TotpSettings, String), AppError> {
        if let Some(existing) = self.repository.find_by_user(user_id).await? {
            if existing.is_verified() {
                return Err(AppError::validation("authTotpProvider.setup.alreadyVerified"));
            }
        }
        let secret = self.verifier.new_secret();
        let settings = self.repository.upsert_unverified(user_id, &secret).await?;
        let otpauth_url = self.verifier.otpauth_url(&secret, account_name)?;
        Ok((settings, otpauth_url))
    }

    pub async fn setup_verify(&self, user_id: Uuid, code: &str) -> Result<(), AppError> {
        let settings = self
            .repository
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| AppError::validation("authTotpProvider.setupVerify.notSetUp"))?;
        if settings.is_verified() {
            return Err(AppError::validation("authTotpProvider.setupVerify.alreadyVerified"));
        }
        if !self.verifier.verify(&settings.secret, code, VERIFY_WINDOW_STEPS)? {
            return Err(AppError::validation("authTotpProvider.setupVerify.invalidCode"));
        }
        self.repository.mark_verified(user_id).await
    }

    /// Runtime second factor: on success the caller promotes
    /// `session.type` from `checkTwoStep` to `user`.
    pub async fn verify(&self, user_id: Uuid, code: &str) -> Result<bool, AppError> {
        let settings = self
            .repository
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| AppError::validation("authTotpProvider.verify.notSetUp"))?;
        self.verifier.verify(&settings.secret, code, VERIFY_WINDOW_STEPS)
    }

    pub async fn remove(&self, user_id: Uuid) -> Result<(), AppError> {
        self.repository.delete(user_id).await
    }

    pub async fn remove_for_user(
        &self,
        caller_permissions: &[String],
        target_user_id: Uuid,
    ) -> Result<(), AppError> {
        if !has_all_permissions(caller_permissions, &[TOTP_MANAGE_PERMISSION.to_string()]) {
            return Err(AppError::forbidden("authTotpProvider.removeForUser.missingPermission"));
        }
        self.repository.delete(target_user_id).await
    }
}
