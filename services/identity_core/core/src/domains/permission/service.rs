//! Permission Engine (spec §4.2): startup synchronization plus
//! administrative role/permission operations gated on `auth:permission:manage`.

use super::model::{MandatoryRoleConfig, Role, RoleSyncDelta, UserPermissionSummary};
use super::repository::PermissionRepository;
use shared_error::AppError;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

pub const MANAGE_PERMISSION: &str = "auth:permission:manage";

/// Either `idIn` or `identifierIn` must be present, never both (spec
/// §4.2 `userSyncRoles`).
pub enum RoleSelector {
    IdIn(Vec<Uuid>),
    IdentifierIn(Vec<String>),
}

pub struct PermissionEngine<R: PermissionRepository> {
    repository: Arc<R>,
}

impl<R: PermissionRepository> PermissionEngine<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    fn require_manage_permission(&self, caller_permissions: &[String]) -> Result<(), AppError> {
        if caller_permissions.iter().any(|p| p == MANAGE_PERMISSION) {
            Ok(())
        } else {
            Err(AppError::forbidden("authPermission.require.missingPermission"))
        }
    }

    /// Startup synchronization (spec §4.2 steps 1-4). Must run inside the
    /// advisory-lock-guarded transaction described in §5; the caller is
    /// responsible for acquiring that lock before invoking this.
    pub async fn sync_startup(
        &self,
        permission_identifiers: &[String],
        mandatory_roles: &[MandatoryRoleConfig],
    ) -> Result<(), AppError> {
        let mut seen = HashSet::new();
        for identifier in permission_identifiers {
            if !seen.insert(identifier) {
                return Err(AppError::server_key("authPermission.sync.duplicatePermission"));
            }
        }

        self.repository.delete_permissions_not_in(permission_identifiers).await?;
        let existing = self.repository.list_permissions().await?;
        let existing_identifiers: HashSet<&str> =
            existing.iter().map(|p| p.identifier.as_str()).collect();
        for identifier in permission_identifiers {
            if !existing_identifiers.contains(identifier.as_str()) {
                self.repository.insert_permission(identifier).await?;
            }
        }

        let mut seen_global = HashSet::new();
        let mut seen_per_tenant: std::collections::HashMap<Uuid, HashSet<String>> = Default::default();
        for mandatory in mandatory_roles {
            let unique_ok = match mandatory.tenant_id {
                None => seen_global.insert(mandatory.identifier.clone()),
                Some(tenant_id) => seen_per_tenant
                    .entry(tenant_id)
                    .or_default()
                    .insert(mandatory.identifier.clone()),
            };
            if !unique_ok {
                return Err(AppError::server_key("authPermission.sync.duplicateMandatoryRole"));
            }

            let role = match self
                .repository
                .find_role_by_identifier(&mandatory.identifier, mandatory.tenant_id)
                .await?
            {
                Some(role) => {
                    self.repository.clear_role_permissions(role.id).await?;
                    role
                },
                None => {
                    self.repository
                        .insert_role(&mandatory.identifier, mandatory.tenant_id, true)
                        .await?
                },
            };

            let permissions = self
                .repository
                .permissions_by_identifiers(&mandatory.permission_identifiers)
                .await?;
            if permissions.len() < mandatory.permission_identifiers.len() {
                return Err(AppError::server_key("authPermission.sync.missingPermissionCatalogEntry"));
            }
            let permission_ids: Vec<Uuid> = permissions.iter().map(|p| p.id).collect();
            self.repository.add_role_permissions(role.id, &permission_ids).await?;
        }

        Ok(())
    }

    pub async fn list_permissions(&self) -> Result<Vec<String>, AppError> {
        Ok(self.repository.list_permissions().await?.into_iter().map(|p| p.identifier).collect())
    }

    pub async fn list_roles_for_tenant(
        &self,
        caller_permissions: &[String],
        tenant_id: Uuid,
    ) -> Result<Vec<(Role, bool)>, AppError> {
        self.require_manage_permission(caller_permissions)?;
        let roles = self.repository.list_roles_for_tenant(tenant_id).await?;
        Ok(roles.into_iter().map(|r| (r.clone(), r.is_editable())).collect())
    }

    pub async fn create_role(
        &self,
        caller_permissions: &[String],
        tenant_id: Uuid,
        identifier: &str,
    ) -> Result<Role, AppError> {
        self.require_manage_permission(caller_permissions)?;
        if self.repository.find_role_by_identifier(identifier, Some(tenant_id)).await?.is_some() {
            return Err(AppError::validation("authPermission.createRole.duplicateIdentifier"));
        }
        self.repository.insert_role(identifier, Some(tenant_id), false).await
    }

    pub async fn delete_role(&self, caller_permissions: &[String], role_id: Uuid) -> Result<(), AppError> {
        self.require_manage_permission(caller_permissions)?;
        let role = self
            .repository
            .find_role_by_id(role_id)
            .await?
            .ok_or_else(|| AppError::not_found("authPermission.deleteRole.unknownRole"))?;
        if role.is_static {
            return Err(AppError::validation("authPermission.deleteRole.staticRole"));
        }
        self.repository.delete_role(role_id).await
    }

    pub async fn add_permissions(
        &self,
        caller_permissions: &[String],
        role_id: Uuid,
        permission_identifiers: &[String],
    ) -> Result<(), AppError> {
        self.require_manage_permission(caller_permissions)?;
        let permissions = self.repository.permissions_by_identifiers(permission_identifiers).await?;
        let existing: HashSet<Uuid> =
            self.repository.role_permissions(role_id).await?.into_iter().map(|rp| rp.permission_id).collect();
        let new_ids: Vec<Uuid> =
            permissions.into_iter().map(|p| p.id).filter(|id| !existing.contains(id)).collect();
        if new_ids.is_empty() {
            return Ok(());
        }
        self.repository.add_role_permissions(role_id, &new_ids).await
    }

    pub async fn remove_permissions(
        &self,
        caller_permissions: &[String],
        role_id: Uuid,
        permission_identifiers: &[String],
    ) -> Result<(), AppError> {
        self.require_manage_permission(caller_permissions)?;
        let permissions = self.repository.permissions_by_identifiers(permission_identifiers).await?;
        let existing: HashSet<Uuid> =
            self.repository.role_permissions(role_id).await?.into_iter().map(|rp| rp.permission_id).collect();
        let mut remove_ids = Vec::new();
        for permission in &permissions {
            if !existing.contains(&permission.id) {
                return Err(AppError::validation("authPermission.removePermission.notAssigned"));
            }
            remove_ids.push(permission.id);
        }
        self.repository.remove_role_permissions(role_id, &remove_ids).await
    }

    pub async fn assign_role(
        &self,
        caller_permissions: &[String],
        user_id: Uuid,
        role_id: Uuid,
    ) -> Result<(), AppError> {
        self.require_manage_permission(caller_permissions)?;
        if self.repository.user_has_role(user_id, role_id).await? {
            return Err(AppError::validation("authPermission.assignRole.userHasRole"));
        }
        self.repository.assign_role(user_id, role_id).await
    }

    pub async fn remove_role(
        &self,
        caller_permissions: &[String],
        user_id: Uuid,
        role_id: Uuid,
    ) -> Result<(), AppError> {
        self.require_manage_permission(caller_permissions)?;
        if !self.repository.user_has_role(user_id, role_id).await? {
            return Err(AppError::validation("authPermission.removeRole.userLacksRole"));
        }
        self.repository.remove_role(user_id, role_id).await
    }

    /// `userSyncRoles`: compute the add/remove delta for a user against
    /// either an id set or an identifier set (mutually exclusive).
    pub async fn user_sync_roles(
        &self,
        caller_permissions: &[String],
        user_id: Uuid,
        tenant_id: Uuid,
        selector: RoleSelector,
    ) -> Result<RoleSyncDelta, AppError> {
        self.require_manage_permission(caller_permissions)?;

        let desired_ids: Vec<Uuid> = match selector {
            RoleSelector::IdIn(ids) => ids,
            RoleSelector::IdentifierIn(identifiers) => {
                let mut ids = Vec::with_capacity(identifiers.len());
                for identifier in &identifiers {
                    let role = self
                        .repository
                        .find_role_by_identifier(identifier, Some(tenant_id))
                        .await?
                        .or(self.repository.find_role_by_identifier(identifier, None).await?)
                        .ok_or_else(|| AppError::validation("authPermission.userSyncRoles.unknownIdentifier"))?;
                    ids.push(role.id);
                }
                ids
            },
        };

        let current: HashSet<Uuid> =
            self.repository.user_roles(user_id).await?.into_iter().map(|ur| ur.role_id).collect();
        let desired: HashSet<Uuid> = desired_ids.into_iter().collect();

        let mut delta = RoleSyncDelta::default();
        for role_id in desired.difference(&current) {
            delta.to_add.push(*role_id);
        }
        for role_id in current.difference(&desired) {
            delta.to_remove.push(*role_id);
        }

        for role_id in &delta.to_add {
            self.repository.assign_role(user_id, *role_id).await?;
        }
        for role_id in &delta.to_remove {
            self.repository.remove_role(user_id, *role_id).await?;
        }

        Ok(delta)
    }

    /// Assembles the user's permission/role summary (spec §4.2).
    pub async fn user_summary(
        &self,
        user_id: Uuid,
        tenant_id: Uuid,
    ) -> Result<UserPermissionSummary, AppError> {
        let mut permissions = self.repository.user_permission_identifiers(user_id, tenant_id).await?;
        let mut roles = self.repository.user_role_identifiers(user_id, tenant_id).await?;
        permissions.sort();
        permissions.dedup();
        roles.sort();
        roles.dedup();
        Ok(UserPermissionSummary { roles, permissions })
    }

}

/// Superset check used by User Directory's `RequireUser` (spec §4.4).
pub fn has_all_permissions(held: &[String], required: &[String]) -> bool {
    let held_set: HashSet<&str> = held.iter().map(|s| s.as_str()).collect();
    required.iter().all(|p| held_set.contains(p.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn superset_check_passes_when_all_required_are_held() {
        let held = vec!["auth:user:list".to_string(), "auth:user:manage".to_string()];
        let required = vec!["auth:user:list".to_string()];
        assert!(has_all_permissions(&held, &required));
    }

    #[test]
    fn superset_check_fails_when_missing_one() {
        let held = vec!["auth:user:list".to_string()];
        let required = vec!["auth:user:manage".to_string()];
        assert!(!has_all_permissions(&held, &required));
    }

    proptest::proptest! {
        /// `has_all_permissions` is exactly the subset relation: it must
        /// hold for any `required` drawn from `held`, no matter how `held`
        /// is padded with unrelated identifiers or reordered.
        #[test]
        fn held_superset_of_required_always_passes(
            held in proptest::collection::vec("[a-z:]{3,12}", 0..10),
            extra in proptest::collection::vec("[a-z:]{3,12}", 0..10),
        ) {
            let mut all_held = held.clone();
            all_held.extend(extra);
            proptest::prop_assert!(has_all_permissions(&all_held, &held));
        }

        /// A required permission absent from every held permission must
        /// fail the check, regardless of how many other permissions are
        /// held alongside it.
        #[test]
        fn missing_required_permission_always_fails(
            held in proptest::collection::vec("[a-z:]{3,12}", 0..10),
            missing in "[a-z:]{3,12}",
        ) {
            proptest::prop_assume!(!held.contains(&missing));
            proptest::prop_assert!(!has_all_permissions(&held, &[missing]));
        }
    }
}
