//! Per-tenant security toggles read out of the opaque `tenant.data` JSON
//! blob (spec §4.1's configuration document). Each provider picks its
//! own shape out of that blob; defaults are the conservative choice so a
//! tenant that never configured the field still behaves safely.

use identity_core_core::domains::auth::keycloak::TenantSettings as KeycloakTenantSettings;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PasswordTenantSettings {
    pub reduce_error_info: bool,
    pub rolling_attempt_blocking_enabled: bool,
    pub force_rotate_enabled: bool,
}

impl Default for PasswordTenantSettings {
    fn default() -> Self {
        Self { reduce_error_info: true, rolling_attempt_blocking_enabled: true, force_rotate_enabled: false }
    }
}

pub fn password_settings(data: &Value) -> PasswordTenantSettings {
    serde_json::from_value(data.clone()).unwrap_or_default()
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct RawKeycloakTenantSettings {
    implicitly_create_users: bool,
    create_users_globally: bool,
    single_tenant: bool,
}

pub fn keycloak_settings(data: &Value) -> KeycloakTenantSettings {
    let raw: RawKeycloakTenantSettings = serde_json::from_value(data.clone()).unwrap_or_default();
    KeycloakTenantSettings {
        implicitly_create_users: raw.implicitly_create_users,
        create_users_globally: raw.create_users_globally,
        single_tenant: raw.single_tenant,
    }
}
