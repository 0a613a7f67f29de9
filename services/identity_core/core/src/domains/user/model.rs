//! User Directory data model (spec §3, §4.4).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub display_name: Option<String>,
    pub last_login: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct UserTenant {
    pub user_id: Uuid,
    pub tenant_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Which provider attachments to create during `User Directory::create`
/// (spec §4.4 step 3, run in this order: password → anonymous → digid →
/// keycloak → totp).
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistration {
    pub password: Option<PasswordRegistration>,
    pub anonymous: bool,
    pub digid_bsn: Option<String>,
    pub keycloak_email: Option<String>,
    pub totp: bool,
}

#[derive(Debug, Clone)]
pub struct PasswordRegistration {
    pub email: String,
    pub password: Option<String>,
    pub random_password: bool,
}

/// Options controlling `create` (spec §4.4 steps 2 and 4).
#[derive(Debug, Clone, Default)]
pub struct CreateUserOptions {
    pub display_name: Option<String>,
    pub sync_across_all_tenants: bool,
    pub initial_tenant_id: Option<Uuid>,
    pub initial_role_ids: Vec<Uuid>,
}

/// Selector for `RequireUser` (spec §4.4): a caller identifies the user
/// either by an authenticated session's user id, or by an explicit uuid
/// for admin-style lookups.
#[derive(Debug, Clone)]
pub enum UserSelector {
    FromSession(Uuid),
    ById(Uuid),
}

impl UserSelector {
    pub fn user_id(&self) -> Uuid {
        match self {
            UserSelector::FromSession(id) | UserSelector::ById(id) => *id,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RequireUserOptions {
    pub skip_session_is_user_check: bool,
    /// Session `loginType` must match one of these, when non-empty.
    pub required_login_types: Vec<crate::domains::common::LoginType>,
    pub required_permissions: Vec<String>,
}

/// Pre-fetched session facts `RequireUser` checks against; fetching the
/// session itself is the caller's job (Session Store), keeping this
/// domain free of a dependency on session internals.
#[derive(Debug, Clone)]
pub struct SessionFacts {
    pub session_type: crate::domains::common::SessionType,
    pub login_type: Option<crate::domains::common::LoginType>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_user_id_resolves_either_variant() {
        let id = Uuid::new_v4();
        assert_eq!(UserSelector::FromSession(id).user_id(), id);
        assert_eq!(UserSelector::ById(id).user_id(), id);
    }
}
