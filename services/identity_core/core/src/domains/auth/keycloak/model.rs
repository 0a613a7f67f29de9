//! Federated OIDC ("Keycloak-based") Provider data model (spec §3, §4.5.4).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct KeycloakLogin {
    pub user_id: Uuid,
    pub tenant_id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Governs the implicit-creation and tenant-membership rules (spec
/// §4.5.4).
#[derive(Debug, Clone)]
pub struct TenantSettings {
    pub implicitly_create_users: bool,
    /// New implicitly-created users are scoped globally (member of every
    /// tenant) rather than just the current one.
    pub create_users_globally: bool,
    /// When set, an existing user may belong to at most this one tenant;
    /// implicit membership grants are refused if it would violate that.
    pub single_tenant: bool,
}
