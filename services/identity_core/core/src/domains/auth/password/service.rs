//! Password Provider (spec §4.5.1): login, register, verify-email,
//! reset/forgot password, update email/password, OTP second factor,
//! force-rotate. Password hashing and TOTP math are delegated to injected
//! traits so this crate stays free of infrastructure dependencies.

use super::model::{
    PasswordLogin, MAX_ROLLING_ATTEMPTS, PASSWORD_OTP_WINDOW_STEPS, RESET_TOKEN_TTL_SECONDS,
    ROLLING_ATTEMPT_WINDOW_SECONDS,
};
use super::repository::PasswordLoginRepository;
use crate::domains::auth::LoginOutcome;
use crate::domains::auth::totp::TotpCodeVerifier;
use crate::domains::common::{EventSink, LoginType, TwoStepType};
use crate::domains::session::SessionRepository;
use crate::domains::user::UserRepository;
use chrono::Utc;
use sha2::{Digest, Sha256};
use shared_error::AppError;
use std::sync::Arc;
use uuid::Uuid;

/// A dummy but syntactically valid bcrypt hash, compared against on an
/// unknown-email login when `reduce_error_info` is enabled, to equalize
/// response timing between known and unknown emails (spec §4.5.1 step 1).
const DUMMY_TIMING_HASH: &str = "$2b$12$EixZaYVK1fsbw1ZfbX3OXePaWxn96p36WQoeG6Lruj3vjPGga31lW";

pub const PASSWORD_BASED_REQUEST_OTP: &str = "auth.passwordBased.requestOtp";
pub const PASSWORD_BASED_USER_REGISTERED: &str = "auth.passwordBased.userRegistered";
pub const PASSWORD_BASED_LOGIN_VERIFIED: &str = "auth.passwordBased.loginVerified";
pub const PASSWORD_BASED_PASSWORD_RESET: &str = "auth.passwordBased.passwordReset";
pub const PASSWORD_BASED_FORGOT_PASSWORD: &str = "auth.passwordBased.forgotPassword";
pub const PASSWORD_BASED_EMAIL_UPDATED: &str = "auth.passwordBased.emailUpdated";
pub const PASSWORD_BASED_PASSWORD_UPDATED: &str = "auth.passwordBased.passwordUpdated";

pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, AppError>;
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AppError>;
}

pub enum RemoveSessionPolicy {
    All,
    AllExceptCaller(Uuid),
}

fn token_hash(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

fn new_opaque_token() -> String {
    Uuid::new_v4().to_string()
}

pub struct PasswordProvider<R, S, H, V, U>
where
    R: PasswordLoginRepository,
    S: SessionRepository,
    H: PasswordHasher,
    V: TotpCodeVerifier,
    U: UserRepository,
{
    repository: Arc<R>,
    sessions: Arc<S>,
    hasher: Arc<H>,
    totp: Arc<V>,
    users: Arc<U>,
    events: Arc<dyn EventSink>,
}

impl<R, S, H, V, U> PasswordProvider<R, S, H, V, U>
where
    R: PasswordLoginRepository,
    S: SessionRepository,
    H: PasswordHasher,
    V: TotpCodeVerifier,
    U: UserRepository,
{
    pub fn new(
        repository: Arc<R>,
        sessions: Arc<S>,
        hasher: Arc<H>,
        totp: Arc<V>,
        users: Arc<U>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self { repository, sessions, hasher, totp, users, events }
    }

    pub async fn login(
        &self,
        tenant_id: Uuid,
        email: &str,
        password: &str,
        reduce_error_info: bool,
        rolling_attempt_blocking_enabled: bool,
    ) -> Result<LoginOutcome, AppError> {
        let login = match self.repository.find_by_email(tenant_id, email).await? {
            Some(login) => login,
            None => {
                if reduce_error_info {
                    let _ = self.hasher.verify(password, DUMMY_TIMING_HASH);
                    return Err(AppError::validation("authPasswordBased.login.invalidEmailPasswordCombination"));
                }
                return Err(AppError::validation("authPasswordBased.login.unknownEmail"));
            },
        };

        if rolling_attempt_blocking_enabled {
            let since = Utc::now() - chrono::Duration::seconds(ROLLING_ATTEMPT_WINDOW_SECONDS);
            let attempts = self.repository.count_attempts_since(login.user_id, since).await?;
            if attempts >= MAX_ROLLING_ATTEMPTS {
                self.repository.insert_attempt(login.user_id).await?;
                return Err(AppError::validation("authPasswordBased.login.maxAttemptsExceeded"));
            }
        }

        if !self.hasher.verify(password, &login.password_hash)? {
            self.repository.insert_attempt(login.user_id).await?;
            return Err(AppError::validation("authPasswordBased.login.invalidEmailPasswordCombination"));
        }

        if !login.is_verified() {
            return Err(AppError::validation("authPasswordBased.login.emailNotVerified"));
        }

        if login.otp_required() {
            let secret = match &login.otp_secret {
                Some(secret) => secret.clone(),
                None => self.totp.new_secret(),
            };
            self.repository.set_otp_secret(login.user_id, &secret, true).await?;
            let otp_token = self.totp.current_code(&secret)?;
            self.events.enqueue(
                PASSWORD_BASED_REQUEST_OTP,
                serde_json::json!({
                    "userId": login.user_id,
                    "tenantId": tenant_id,
                    "email": login.email,
                    "otpToken": otp_token,
                }),
            )?;
            return Ok(LoginOutcome {
                user_id: login.user_id,
                login_type: LoginType::PasswordBased,
                two_step_type: Some(TwoStepType::PasswordBasedOtp),
            });
        }

        self.users.update_last_login(login.user_id).await?;
        Ok(LoginOutcome { user_id: login.user_id, login_type: LoginType::PasswordBased, two_step_type: None })
    }

    /// Transactional: must run on an existing user. Returns the opaque
    /// reset/verify token in plaintext for the caller to deliver by mail;
    /// only its hash is persisted.
    pub async fn register(
        &self,
        user_id: Uuid,
        tenant_id: Uuid,
        email: &str,
        password: Option<&str>,
        random_password: bool,
    ) -> Result<(PasswordLogin, String), AppError> {
        let password_hash = if random_password {
            self.hasher.hash(&new_opaque_token())?
        } else {
            let password = password.ok_or_else(|| AppError::server_key("authPasswordBased.register.missingPassword"))?;
            self.hasher.hash(password)?
        };

        let login = self.repository.insert(user_id, tenant_id, email, &password_hash).await?;
        if random_password {
            self.repository.set_verified(user_id).await?;
        }

        let token = new_opaque_token();
        let expires_at = Utc::now() + chrono::Duration::seconds(RESET_TOKEN_TTL_SECONDS);
        self.repository
            .insert_reset_token(user_id, &token_hash(&token), expires_at, random_password)
            .await?;

        self.events.enqueue(
            PASSWORD_BASED_USER_REGISTERED,
            serde_json::json!({ "userId": user_id, "tenantId": tenant_id, "email": email }),
        )?;

        Ok((login, token))
    }

    pub async fn verify_email(&self, token: &str) -> Result<(), AppError> {
        let row = self
            .repository
            .find_reset_token_by_hash(&token_hash(token))
            .await?
            .ok_or_else(|| AppError::validation("authPasswordBased.verifyEmail.invalidToken"))?;
        if row.should_set_password {
            return Err(AppError::validation("authPasswordBased.verifyEmail.invalidToken"));
        }
        if row.is_expired(Utc::now()) {
            return Err(AppError::validation("authPasswordBased.verifyEmail.expiredToken"));
        }
        self.repository.set_verified(row.user_id).await?;
        self.repository.delete_reset_token(row.id).await?;
        self.events.enqueue(PASSWORD_BASED_LOGIN_VERIFIED, serde_json::json!({ "userId": row.user_id }))?;
        Ok(())
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AppError> {
        let row = self
            .repository
            .find_reset_token_by_hash(&token_hash(token))
            .await?
            .ok_or_else(|| AppError::validation("authPasswordBased.resetPassword.invalidToken"))?;
        if !row.should_set_password {
            return Err(AppError::validation("authPasswordBased.resetPassword.invalidToken"));
        }
        if row.is_expired(Utc::now()) {
            return Err(AppError::validation("authPasswordBased.resetPassword.expiredToken"));
        }
        let hash = self.hasher.hash(new_password)?;
        self.repository.update_password_hash(row.user_id, &hash).await?;
        self.repository.delete_reset_token(row.id).await?;
        self.events.enqueue(PASSWORD_BASED_PASSWORD_RESET, serde_json::json!({ "userId": row.user_id }))?;
        Ok(())
    }

    /// Always succeeds observably when `reduce_error_info` is on, per
    /// spec §4.5.1/§8's enumeration-defense scenario.
    pub async fn forgot_password(
        &self,
        tenant_id: Uuid,
        email: &str,
        reduce_error_info: bool,
    ) -> Result<(), AppError> {
        let login = self.repository.find_by_email(tenant_id, email).await?;
        let login = match login {
            Some(login) => login,
            None => {
                if reduce_error_info {
                    return Ok(());
                }
                return Err(AppError::validation("authPasswordBased.forgotPassword.unknownEmail"));
            },
        };

        let token = new_opaque_token();
        let expires_at = Utc::now() + chrono::Duration::seconds(RESET_TOKEN_TTL_SECONDS);
        self.repository.insert_reset_token(login.user_id, &token_hash(&token), expires_at, true).await?;
        self.events.enqueue(
            PASSWORD_BASED_FORGOT_PASSWORD,
            serde_json::json!({ "userId": login.user_id, "email": login.email }),
        )?;
        Ok(())
    }

    /// Rewrites the email, resets verification, issues a new verify
    /// token, and deletes every session for the user. The caller is
    /// responsible for re-running `UserDirectory::check_unique`
    /// afterward (spec §4.5.1: "re-checks uniqueness").
    pub async fn update_email(&self, user_id: Uuid, new_email: &str) -> Result<String, AppError> {
        self.repository.update_email(user_id, new_email).await?;
        let token = new_opaque_token();
        let expires_at = Utc::now() + chrono::Duration::seconds(RESET_TOKEN_TTL_SECONDS);
        self.repository.insert_reset_token(user_id, &token_hash(&token), expires_at, false).await?;
        self.sessions.delete_sessions_for_user(user_id).await?;
        self.events.enqueue(
            PASSWORD_BASED_EMAIL_UPDATED,
            serde_json::json!({ "userId": user_id, "email": new_email }),
        )?;
        Ok(token)
    }

    pub async fn update_password(
        &self,
        user_id: Uuid,
        new_password: &str,
        policy: RemoveSessionPolicy,
    ) -> Result<(), AppError> {
        let hash = self.hasher.hash(new_password)?;
        self.repository.update_password_hash(user_id, &hash).await?;
        match policy {
            RemoveSessionPolicy::All => self.sessions.delete_sessions_for_user(user_id).await?,
            RemoveSessionPolicy::AllExceptCaller(session_id) => {
                self.sessions.delete_sessions_for_user_except(user_id, session_id).await?
            },
        }
        self.events.enqueue(PASSWORD_BASED_PASSWORD_UPDATED, serde_json::json!({ "userId": user_id }))?;
        Ok(())
    }

    /// Password-flow OTP second factor (SHA-512, base32, ~5m30s window).
    /// On success the caller promotes `session.type` to `user`.
    pub async fn verify_otp(&self, user_id: Uuid, code: &str) -> Result<bool, AppError> {
        let login = self
            .repository
            .find_by_user_id(user_id)
            .await?
            .ok_or_else(|| AppError::validation("authPasswordBased.verifyOtp.notEnabled"))?;
        let secret = login
            .otp_secret
            .as_deref()
            .ok_or_else(|| AppError::validation("authPasswordBased.verifyOtp.notEnabled"))?;
        self.totp.verify(secret, code, PASSWORD_OTP_WINDOW_STEPS)
    }

    /// Force-rotate gate (spec §4.5.1): when enabled and the password is
    /// older than 6 months, the caller must add a
    /// `{type: "passwordBasedUpdatePassword"}` addendum to the session.
    pub fn needs_force_rotate(&self, login: &PasswordLogin, enabled: bool) -> bool {
        enabled && login.needs_force_rotate(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dummy_timing_hash_is_well_formed_bcrypt() {
        assert!(DUMMY_TIMING_HASH.starts_with("$2b$12$"));
    }

    #[test]
    fn new_opaque_tokens_are_unique() {
        assert_ne!(new_opaque_token(), new_opaque_token());
    }
}
