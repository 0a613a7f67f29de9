//! Tenant Resolver (spec §4.1): resolves `(tenant, publicUrl, apiUrl)` from
//! request headers against the validated static configuration, backed by a
//! pull-through cache.

use super::model::{Environment, ResolvedTenantContext, Tenant, TenantConfigDocument};
use super::repository::TenantRepository;
use async_trait::async_trait;
use shared_error::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Request headers the resolution algorithm consumes.
#[derive(Debug, Clone, Default)]
pub struct TenantResolutionHeaders {
    pub host: Option<String>,
    pub origin: Option<String>,
    pub x_lpc_tenant_origin: Option<String>,
}

/// Pull-through cache keyed by id-or-name. Freshness sampling (join
/// `updatedAt` re-checks) is the infra implementation's concern; this
/// trait only exposes the get/put/invalidate surface the resolver needs.
#[async_trait]
pub trait TenantCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<Tenant>;
    async fn put(&self, key: &str, tenant: Tenant);
    async fn invalidate(&self, key: &str);
}

/// One precomputed index entry: which tenant a public/api URL belongs to,
/// and what its counterpart URL is.
#[derive(Debug, Clone)]
struct IndexEntry {
    tenant_name: String,
    public_url: String,
    api_url: String,
}

/// Precomputed by-public-url / by-api-url indexes over the enabled tenant
/// configuration, plus the `hasUniqueApiUrls` derived property.
#[derive(Debug, Clone)]
pub struct TenantIndex {
    by_public_url: HashMap<String, IndexEntry>,
    by_api_url: HashMap<String, Vec<IndexEntry>>,
    has_unique_api_urls: bool,
}

impl TenantIndex {
    /// Builds the index from the validated configuration document,
    /// dropping `urlConfig` entries whose `environment` doesn't match the
    /// deployment environment. Fails if zero tenants remain enabled.
    pub fn build(document: &TenantConfigDocument, environment: Environment) -> Result<Self, AppError> {
        let mut by_public_url = HashMap::new();
        let mut by_api_url: HashMap<String, Vec<IndexEntry>> = HashMap::new();
        let mut enabled_tenants = 0;

        for (tenant_name, tenant_cfg) in &document.tenants {
            let mut tenant_has_entry = false;
            for (public_url, entry) in &tenant_cfg.url_config {
                if entry.environment != environment {
                    continue;
                }
                tenant_has_entry = true;
                let index_entry = IndexEntry {
                    tenant_name: tenant_name.clone(),
                    public_url: public_url.clone(),
                    api_url: entry.api_url.clone(),
                };
                by_public_url.insert(public_url.clone(), index_entry.clone());
                by_api_url.entry(entry.api_url.clone()).or_default().push(index_entry);
            }
            if tenant_has_entry {
                enabled_tenants += 1;
            }
        }

        if enabled_tenants == 0 {
            return Err(AppError::server_key("multitenant.startup.noActiveTenants"));
        }

        let has_unique_api_urls = by_api_url.values().all(|entries| entries.len() == 1);

        Ok(Self { by_public_url, by_api_url, has_unique_api_urls })
    }

    pub fn has_unique_api_urls(&self) -> bool {
        self.has_unique_api_urls
    }
}

pub struct TenantResolver<R: TenantRepository, C: TenantCache> {
    repository: Arc<R>,
    cache: Arc<C>,
    index: TenantIndex,
    environment: Environment,
}

impl<R: TenantRepository, C: TenantCache> TenantResolver<R, C> {
    pub fn new(repository: Arc<R>, cache: Arc<C>, index: TenantIndex, environment: Environment) -> Self {
        Self { repository, cache, index, environment }
    }

    async fn load_tenant(&self, name: &str) -> Result<Tenant, AppError> {
        if let Some(cached) = self.cache.get(name).await {
            return Ok(cached);
        }
        let tenant = self
            .repository
            .find_by_name(name)
            .await?
            .ok_or_else(|| AppError::validation("multitenant.require.invalidTenant"))?;
        self.cache.put(name, tenant.clone()).await;
        Ok(tenant)
    }

    /// By-id/by-name variant for background contexts (job workers, etc.)
    /// that have no request headers to resolve from.
    pub async fn load_by_name(&self, name: &str) -> Result<Tenant, AppError> {
        self.load_tenant(name).await
    }

    pub async fn load_by_id(&self, id: Uuid) -> Result<Tenant, AppError> {
        if let Some(found) = self.repository.find_by_id(id).await? {
            return Ok(found);
        }
        Err(AppError::validation("multitenant.require.invalidTenant"))
    }

    /// The full resolution algorithm (spec §4.1 steps 1-5).
    pub async fn resolve(&self, headers: &TenantResolutionHeaders) -> Result<ResolvedTenantContext, AppError> {
        let host = headers
            .host
            .as_deref()
            .ok_or_else(|| AppError::validation("multitenant.require.invalidTenant"))?;

        let dev_or_acceptance =
            matches!(self.environment, Environment::Development | Environment::Acceptance);

        if dev_or_acceptance {
            if let Some(origin_override) = &headers.x_lpc_tenant_origin {
                let entry = self
                    .by_public_url(origin_override)
                    .ok_or_else(|| AppError::validation("multitenant.require.invalidTenant"))?;
                let tenant = self.load_tenant(&entry.tenant_name).await?;
                return Ok(ResolvedTenantContext {
                    tenant,
                    public_url: entry.public_url.clone(),
                    api_url: host.to_string(),
                });
            }
        }

        if self.index.has_unique_api_urls {
            let entry = self
                .by_api_url_unique(host)
                .ok_or_else(|| AppError::validation("multitenant.require.invalidTenant"))?;
            let tenant = self.load_tenant(&entry.tenant_name).await?;
            let public_url = headers.origin.clone().unwrap_or_else(|| entry.public_url.clone());
            return Ok(ResolvedTenantContext { tenant, public_url, api_url: entry.api_url.clone() });
        }

        let public_url = headers
            .origin
            .as_deref()
            .or(headers.x_lpc_tenant_origin.as_deref())
            .ok_or_else(|| AppError::validation("multitenant.require.invalidTenant"))?;
        let entry = self
            .by_public_url(public_url)
            .ok_or_else(|| AppError::validation("multitenant.require.invalidTenant"))?;
        let tenant = self.load_tenant(&entry.tenant_name).await?;
        Ok(ResolvedTenantContext {
            tenant,
            public_url: entry.public_url.clone(),
            api_url: entry.api_url.clone(),
        })
    }

    fn by_public_url(&self, public_url: &str) -> Option<&IndexEntry> {
        self.index.by_public_url.get(public_url)
    }

    fn by_api_url_unique(&self, api_url: &str) -> Option<&IndexEntry> {
        self.index.by_api_url.get(api_url).and_then(|entries| entries.first())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tenant::model::{TenantConfigEntry, UrlConfigEntry};

    fn document() -> TenantConfigDocument {
        let mut tenants = HashMap::new();
        let mut url_config = HashMap::new();
        url_config.insert(
            "https://acme.example.com".to_string(),
            UrlConfigEntry { environment: Environment::Production, api_url: "https://api.acme.example.com".to_string() },
        );
        tenants.insert("acme".to_string(), TenantConfigEntry { data: serde_json::json!({}), url_config });
        TenantConfigDocument { tenants }
    }

    #[test]
    fn index_reports_unique_api_urls_when_no_collisions() {
        let index = TenantIndex::build(&document(), Environment::Production).unwrap();
        assert!(index.has_unique_api_urls());
    }

    #[test]
    fn index_build_fails_with_zero_enabled_tenants() {
        let err = TenantIndex::build(&document(), Environment::Development).unwrap_err();
        assert_eq!(err.key(), "multitenant.startup.noActiveTenants");
    }

    #[test]
    fn index_detects_shared_api_urls_as_non_unique() {
        let mut tenants = HashMap::new();
        for name in ["acme", "globex"] {
            let mut url_config = HashMap::new();
            url_config.insert(
                format!("https://{name}.example.com"),
                UrlConfigEntry { environment: Environment::Production, api_url: "https://api.shared.example.com".to_string() },
            );
            tenants.insert(name.to_string(), TenantConfigEntry { data: serde_json::json!({}), url_config });
        }
        let index = TenantIndex::build(&TenantConfigDocument { tenants }, Environment::Production).unwrap();
        assert!(!index.has_unique_api_urls());
    }
}
