//! Tenant Resolver data model (spec §3, §4.1).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;
use uuid::Uuid;

/// The deployment environment the process is running in. Drives which
/// `urlConfig` entries survive startup filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Production,
    Acceptance,
    Development,
}

/// One entry of a tenant's `urlConfig` map, keyed by public URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlConfigEntry {
    pub environment: Environment,
    pub api_url: String,
}

/// The `Tenant` entity (spec §3). `url_config` and `data` are persisted as
/// JSONB; the validated, environment-filtered view used for request
/// resolution lives in [`ResolvedTenant`], not on this row directly.
#[derive(Debug, Clone, FromRow)]
pub struct Tenant {
    pub id: Uuid,
    pub name: String,
    pub data: sqlx::types::Json<serde_json::Value>,
    pub url_config: sqlx::types::Json<HashMap<String, UrlConfigEntry>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tenant {
    /// A tenant is active iff at least one `urlConfig` entry matches the
    /// deployment environment (spec §3 invariant).
    pub fn is_active_in(&self, environment: Environment) -> bool {
        self.url_config.0.values().any(|entry| entry.environment == environment)
    }

    /// The `urlConfig` entries surviving environment filtering.
    pub fn enabled_url_config(&self, environment: Environment) -> HashMap<String, &UrlConfigEntry> {
        self.url_config
            .0
            .iter()
            .filter(|(_, entry)| entry.environment == environment)
            .map(|(public_url, entry)| (public_url.clone(), entry))
            .collect()
    }
}

/// The static configuration document driving §4.1, parsed once at startup:
/// `tenants: { <name>: { data, urlConfig: { <publicUrl>: {...} } } }`.
#[derive(Debug, Clone, Deserialize)]
pub struct TenantConfigDocument {
    pub tenants: HashMap<String, TenantConfigEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TenantConfigEntry {
    pub data: serde_json::Value,
    pub url_config: HashMap<String, UrlConfigEntry>,
}

/// Resolved tenant context returned to request handlers: the matched
/// tenant plus the public/api URL pair that satisfied the resolution
/// algorithm (spec §4.1).
#[derive(Debug, Clone)]
pub struct ResolvedTenantContext {
    pub tenant: Tenant,
    pub public_url: String,
    pub api_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(env: Environment, api_url: &str) -> UrlConfigEntry {
        UrlConfigEntry { environment: env, api_url: api_url.to_string() }
    }

    fn tenant_with(url_config: HashMap<String, UrlConfigEntry>) -> Tenant {
        Tenant {
            id: Uuid::new_v4(),
            name: "acme".to_string(),
            data: sqlx::types::Json(serde_json::json!({})),
            url_config: sqlx::types::Json(url_config),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn active_when_any_entry_matches_environment() {
        let mut cfg = HashMap::new();
        cfg.insert("https://acme.example.com".to_string(), entry(Environment::Production, "https://api.acme.example.com"));
        let tenant = tenant_with(cfg);

        assert!(tenant.is_active_in(Environment::Production));
        assert!(!tenant.is_active_in(Environment::Development));
    }

    #[test]
    fn inactive_with_no_matching_environment_entries() {
        let mut cfg = HashMap::new();
        cfg.insert("https://acme.example.com".to_string(), entry(Environment::Acceptance, "https://api.acme.example.com"));
        let tenant = tenant_with(cfg);

        assert!(!tenant.is_active_in(Environment::Production));
    }
}
