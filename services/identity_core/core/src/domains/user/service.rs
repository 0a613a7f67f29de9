//! User Directory (spec §4.4): create, read, update, soft-delete, merge,
//! uniqueness enforcement, and the `RequireUser` guard.

use super::model::{CreateUserOptions, RequireUserOptions, SessionFacts, User, UserSelector};
use super::repository::{KeycloakEmailUniquenessChecker, PasswordEmailUniquenessChecker, UserRepository};
use crate::domains::common::EventSink;
use crate::domains::permission::has_all_permissions;
use shared_error::AppError;
use std::sync::Arc;
use uuid::Uuid;

pub const USER_SOFT_DELETED_EVENT: &str = "auth.user.softDeleted";

pub struct UserDirectory<R: UserRepository> {
    repository: Arc<R>,
    events: Arc<dyn EventSink>,
}

impl<R: UserRepository> UserDirectory<R> {
    pub fn new(repository: Arc<R>, events: Arc<dyn EventSink>) -> Self {
        Self { repository, events }
    }

    /// Steps 1-2 of `create` (spec §4.4): insert the bare user row, and —
    /// if `syncUsersAcrossAllTenants` — a `UserTenant` row for every
    /// existing tenant. Provider registration (step 3) and role sync
    /// (step 4) are composed by the caller against the returned user,
    /// since they cross into the auth and permission domains; uniqueness
    /// (step 5) is `check_unique` below. Must run inside the enclosing
    /// transaction (spec §5).
    pub async fn create_bare(&self, options: &CreateUserOptions) -> Result<(User, Vec<Uuid>), AppError> {
        let user = self.repository.create(options.display_name.as_deref()).await?;

        let mut tenant_ids = Vec::new();
        if options.sync_across_all_tenants {
            for tenant_id in self.repository.all_tenant_ids().await? {
                self.repository.add_tenant(user.id, tenant_id).await?;
                tenant_ids.push(tenant_id);
            }
        } else if let Some(tenant_id) = options.initial_tenant_id {
            self.repository.add_tenant(user.id, tenant_id).await?;
            tenant_ids.push(tenant_id);
        }

        Ok((user, tenant_ids))
    }

    /// Uniqueness check (spec §4.4): for each tenant the user belongs to,
    /// no other non-deleted user may hold the same password-login or
    /// keycloak-login email in that tenant.
    pub async fn check_unique(
        &self,
        user_id: Uuid,
        tenant_ids: &[Uuid],
        password_email: Option<&str>,
        keycloak_email: Option<&str>,
        password_source: &dyn PasswordEmailUniquenessChecker,
        keycloak_source: &dyn KeycloakEmailUniquenessChecker,
    ) -> Result<(), AppError> {
        for tenant_id in tenant_ids {
            if let Some(email) = password_email {
                if password_source.email_used_in_tenant(*tenant_id, email, Some(user_id)).await? {
                    return Err(AppError::validation("authPasswordBased.checkUnique.duplicateEmail"));
                }
            }
            if let Some(email) = keycloak_email {
                if keycloak_source.email_used_in_tenant(*tenant_id, email, Some(user_id)).await? {
                    return Err(AppError::validation("authKeycloakBased.checkUnique.duplicateEmail"));
                }
            }
        }
        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        self.repository.find_by_id(id).await
    }

    pub async fn update_display_name(&self, id: Uuid, display_name: &str) -> Result<User, AppError> {
        self.repository.update_display_name(id, display_name).await
    }

    pub async fn touch_last_login(&self, id: Uuid) -> Result<(), AppError> {
        self.repository.update_last_login(id).await
    }

    pub async fn list(&self, tenant_id: Uuid, page: i64, page_size: i64) -> Result<(Vec<User>, i64), AppError> {
        self.repository.list(tenant_id, page, page_size).await
    }

    /// Soft-delete / reactivate (spec §4.4). Transitioning to deleted
    /// enqueues `auth.user.softDeleted` exactly once.
    pub async fn set_active(&self, user_id: Uuid, active: bool) -> Result<(), AppError> {
        if active {
            self.repository.reactivate(user_id).await
        } else {
            self.repository.soft_delete(user_id).await?;
            self.events.enqueue(USER_SOFT_DELETED_EVENT, serde_json::json!({ "userId": user_id }))
        }
    }

    /// `RequireUser` (spec §4.4): loads the user and runs the ordered
    /// checks. `error_key_prefix` lets different call sites produce their
    /// own documented error keys while sharing this one algorithm.
    pub async fn require_user(
        &self,
        selector: &UserSelector,
        session: &SessionFacts,
        held_permissions: &[String],
        options: &RequireUserOptions,
        error_key_prefix: &str,
    ) -> Result<User, AppError> {
        let user = self
            .repository
            .find_by_id(selector.user_id())
            .await?
            .ok_or_else(|| AppError::not_found(format!("{error_key_prefix}.invalidUser")))?;
        if user.is_deleted() {
            return Err(AppError::not_found(format!("{error_key_prefix}.invalidUser")));
        }

        if !options.skip_session_is_user_check
            && session.session_type != crate::domains::common::SessionType::User
        {
            return Err(AppError::unauthorized(format!("{error_key_prefix}.incorrectSessionType")));
        }

        if !options.required_login_types.is_empty() {
            let matches = session
                .login_type
                .map(|lt| options.required_login_types.contains(&lt))
                .unwrap_or(false);
            if !matches {
                return Err(AppError::unauthorized(format!("{error_key_prefix}.incorrectLoginType")));
            }
        }

        if !has_all_permissions(held_permissions, &options.required_permissions) {
            return Err(AppError::forbidden(format!("{error_key_prefix}.missingPermissions")));
        }

        Ok(user)
    }

    /// Merge (spec §4.4): re-targets every foreign key in the
    /// declarative allowlist (DESIGN.md, spec §9(b)) from `old_user_id`
    /// to `new_user_id`, then deletes the old user. `should_combine` is
    /// the caller-supplied guard; identity-provider tables are never
    /// touched by `retarget_foreign_keys` (enforced by the repository
    /// implementation's allowlist, not by this method).
    pub async fn merge(
        &self,
        old_user_id: Uuid,
        new_user_id: Uuid,
        should_combine: bool,
    ) -> Result<(), AppError> {
        if !should_combine {
            return Ok(());
        }
        self.repository.retarget_foreign_keys(old_user_id, new_user_id).await?;
        self.repository.delete(old_user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::common::{LoginType, SessionType};

    fn facts(session_type: SessionType, login_type: Option<LoginType>) -> SessionFacts {
        SessionFacts { session_type, login_type }
    }

    #[test]
    fn require_user_options_default_to_no_extra_checks() {
        let options = RequireUserOptions::default();
        assert!(!options.skip_session_is_user_check);
        assert!(options.required_login_types.is_empty());
        assert!(options.required_permissions.is_empty());
    }

    #[test]
    fn session_facts_carry_login_type() {
        let facts = facts(SessionType::User, Some(LoginType::PasswordBased));
        assert_eq!(facts.login_type, Some(LoginType::PasswordBased));
    }
}
