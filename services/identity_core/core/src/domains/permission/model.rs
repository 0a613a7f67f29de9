//! Permission Engine data model (spec §3, §4.2).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Global permission catalog entry. `identifier` is unique and the catalog
/// is kept in exact lockstep with configuration at every startup.
#[derive(Debug, Clone, FromRow)]
pub struct Permission {
    pub id: Uuid,
    pub identifier: String,
    pub created_at: DateTime<Utc>,
}

/// A role, global (`tenant = None`) or tenant-scoped. `is_static` marks a
/// mandatory role created by startup synchronization — such roles cannot
/// be deleted or hand-edited at runtime.
#[derive(Debug, Clone, FromRow)]
pub struct Role {
    pub id: Uuid,
    pub identifier: String,
    pub tenant_id: Option<Uuid>,
    pub is_static: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Role {
    /// Spec §4.2: `isEditable = ¬isStatic ∧ role.tenant ≠ null`.
    pub fn is_editable(&self) -> bool {
        !self.is_static && self.tenant_id.is_some()
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct RolePermission {
    pub role_id: Uuid,
    pub permission_id: Uuid,
}

#[derive(Debug, Clone, FromRow)]
pub struct UserRole {
    pub user_id: Uuid,
    pub role_id: Uuid,
}

/// A mandatory role declared in configuration, synchronized at startup
/// (spec §4.2 step 3).
#[derive(Debug, Clone)]
pub struct MandatoryRoleConfig {
    pub identifier: String,
    pub tenant_id: Option<Uuid>,
    pub permission_identifiers: Vec<String>,
}

/// Result of `userSyncRoles`: the add/remove delta against a user's
/// current role set.
#[derive(Debug, Clone, Default)]
pub struct RoleSyncDelta {
    pub to_add: Vec<Uuid>,
    pub to_remove: Vec<Uuid>,
}

/// The aggregated view of a user's effective permissions (spec §4.2
/// "User summary").
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct UserPermissionSummary {
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(is_static: bool, tenant_id: Option<Uuid>) -> Role {
        Role {
            id: Uuid::new_v4(),
            identifier: "editor".to_string(),
            tenant_id,
            is_static,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn global_roles_are_never_editable() {
        assert!(!role(false, None).is_editable());
    }

    #[test]
    fn static_tenant_roles_are_not_editable() {
        assert!(!role(true, Some(Uuid::new_v4())).is_editable());
    }

    #[test]
    fn non_static_tenant_roles_are_editable() {
        assert!(role(false, Some(Uuid::new_v4())).is_editable());
    }
}
