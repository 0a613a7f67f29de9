//! Authentication providers (spec §4.5). Each provider authenticates a
//! user through its own mechanism and hands off to the shared tail
//! protocol below, which is what actually talks to the Session Store.

pub mod anonymous;
pub mod digid;
pub mod keycloak;
pub mod password;
pub mod totp;

use crate::domains::common::{LoginType, SessionType, TwoStepType};
use crate::domains::session::{Device, DeviceInput, Session, SessionData, SessionRepository, SessionStore, TokenPair, TokenSigner};
use shared_error::AppError;
use uuid::Uuid;

/// What a provider hands back once it has authenticated (or partially
/// authenticated, pending a second factor) a user.
pub struct LoginOutcome {
    pub user_id: Uuid,
    pub login_type: LoginType,
    pub two_step_type: Option<TwoStepType>,
}

impl LoginOutcome {
    fn session_type(&self) -> SessionType {
        if self.two_step_type.is_some() {
            SessionType::CheckTwoStep
        } else {
            SessionType::User
        }
    }
}

/// Shared by every provider (spec §4.5's common tail): invalidate any
/// session the caller already holds, then issue a fresh one for the
/// newly authenticated user.
pub async fn complete_login<R, S>(
    store: &SessionStore<R, S>,
    existing_session_id: Option<Uuid>,
    outcome: LoginOutcome,
    device: Option<DeviceInput>,
) -> Result<(Session, TokenPair, Option<Device>), AppError>
where
    R: SessionRepository,
    S: TokenSigner,
{
    if let Some(session_id) = existing_session_id {
        store.invalidate(session_id).await?;
    }

    let data = SessionData {
        user_id: Some(outcome.user_id),
        login_type: Some(outcome.login_type),
        session_type: outcome.session_type(),
        two_step_type: outcome.two_step_type,
        impersonator_user_id: None,
    };

    store.issue(data, device).await
}
