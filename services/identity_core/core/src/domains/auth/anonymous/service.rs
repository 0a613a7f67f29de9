//! Anonymous Provider (spec §4.5.2): device-bound login with no
//! credentials beyond a possession token.

use super::model::{new_login_token, AnonymousLogin};
use super::repository::AnonymousLoginRepository;
use crate::domains::auth::LoginOutcome;
use crate::domains::common::{EventSink, LoginType};
use crate::domains::user::UserRepository;
use shared_error::AppError;
use std::sync::Arc;
use uuid::Uuid;

pub const ANONYMOUS_BASED_USER_REGISTERED: &str = "auth.anonymousBased.userRegistered";

pub struct AnonymousProvider<R: AnonymousLoginRepository, U: UserRepository> {
    repository: Arc<R>,
    users: Arc<U>,
    events: Arc<dyn EventSink>,
}

impl<R: AnonymousLoginRepository, U: UserRepository> AnonymousProvider<R, U> {
    pub fn new(repository: Arc<R>, users: Arc<U>, events: Arc<dyn EventSink>) -> Self {
        Self { repository, users, events }
    }

    pub async fn login(&self, tenant_id: Uuid, login_token: &str) -> Result<LoginOutcome, AppError> {
        let login = self
            .repository
            .find_by_token(tenant_id, login_token)
            .await?
            .ok_or_else(|| AppError::validation("authAnonymousBased.login.unknownToken"))?;
        if !login.is_allowed_to_login {
            return Err(AppError::validation("authAnonymousBased.login.tokenIsNotAllowedToLogin"));
        }
        self.users.update_last_login(login.user_id).await?;
        Ok(LoginOutcome { user_id: login.user_id, login_type: LoginType::AnonymousBased, two_step_type: None })
    }

    pub async fn register(&self, user_id: Uuid, tenant_id: Uuid) -> Result<AnonymousLogin, AppError> {
        let token = new_login_token();
        let login = self.repository.insert(user_id, tenant_id, &token).await?;
        self.events.enqueue(
            ANONYMOUS_BASED_USER_REGISTERED,
            serde_json::json!({ "userId": user_id, "tenantId": tenant_id }),
        )?;
        Ok(login)
    }

    /// Converts an already-authenticated user with an anonymous login
    /// into a session seed, without issuing tokens (spec §4.5.2:
    /// "GetSessionForUser").
    pub async fn session_seed_for_user(&self, user_id: Uuid) -> Result<LoginOutcome, AppError> {
        self.repository
            .find_by_user_id(user_id)
            .await?
            .ok_or_else(|| AppError::validation("authAnonymousBased.sessionSeed.noAnonymousLogin"))?;
        Ok(LoginOutcome { user_id, login_type: LoginType::AnonymousBased, two_step_type: None })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_tokens_carry_the_fixed_prefix() {
        assert!(new_login_token().starts_with("auth-anonymous-"));
    }
}
