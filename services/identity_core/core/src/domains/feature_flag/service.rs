//! Feature Flag Engine (spec §4.6): declaration sync, per-tenant
//! resolution, and a short-TTL pull-through cache.

use super::model::{is_reserved, FeatureFlag, EXAMPLE_FLAG_NAME};
use super::repository::FeatureFlagRepository;
use async_trait::async_trait;
use shared_error::AppError;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// 5-second pull-through cache over the full flag set (spec §4.6). A
/// miss primes every flag at once — "fetching one known key warms
/// all" — never just the one requested.
#[async_trait]
pub trait FlagCache: Send + Sync {
    async fn get_all(&self) -> Option<Vec<FeatureFlag>>;
    async fn put_all(&self, flags: Vec<FeatureFlag>);
    async fn invalidate(&self);
}

pub struct FeatureFlagEngine<R: FeatureFlagRepository, C: FlagCache> {
    repository: Arc<R>,
    cache: Arc<C>,
}

impl<R: FeatureFlagRepository, C: FlagCache> FeatureFlagEngine<R, C> {
    pub fn new(repository: Arc<R>, cache: Arc<C>) -> Self {
        Self { repository, cache }
    }

    /// Startup sync (spec §4.6): removes stored flags no longer
    /// declared, inserts missing declarations, always keeps reserved
    /// flags, and seeds `__FEATURE_LPC_EXAMPLE_FLAG` if the effective
    /// declared set would otherwise be empty.
    pub async fn sync_startup(&self, declared: &[String]) -> Result<(), AppError> {
        let stored = self.repository.list_stored_names().await?;

        let mut effective: HashSet<String> = declared.iter().cloned().collect();
        for name in &stored {
            if is_reserved(name) {
                effective.insert(name.clone());
            }
        }
        if effective.is_empty() {
            effective.insert(EXAMPLE_FLAG_NAME.to_string());
        }

        for name in &stored {
            if !effective.contains(name) {
                self.repository.delete_by_name(name).await?;
            }
        }
        for name in &effective {
            if !stored.contains(name) {
                self.repository.insert_declaration(name).await?;
            }
        }

        self.cache.invalidate().await;
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<FeatureFlag>, AppError> {
        if let Some(cached) = self.cache.get_all().await {
            return Ok(cached);
        }
        let flags = self.repository.list_all().await?;
        self.cache.put_all(flags.clone()).await;
        Ok(flags)
    }

    /// Resolve current set (spec §4.6): per declared name, the
    /// per-tenant value, defaulting to `false` for names declared but
    /// absent from storage.
    pub async fn resolve_current_set(
        &self,
        tenant_name: &str,
        declared: &[String],
    ) -> Result<HashMap<String, bool>, AppError> {
        let all = self.load_all().await?;
        let mut resolved = HashMap::new();
        for name in declared {
            let value = all
                .iter()
                .find(|flag| &flag.name == name)
                .map(|flag| flag.resolve_for_tenant(tenant_name))
                .unwrap_or(false);
            resolved.insert(name.clone(), value);
        }
        Ok(resolved)
    }

    /// `getDynamic` (spec §4.6): unknown identifier is a server error,
    /// not a validation error, since the caller is expected to only ask
    /// for flags it already knows exist.
    pub async fn resolve_dynamic(&self, tenant_name: &str, name: &str) -> Result<bool, AppError> {
        let all = self.load_all().await?;
        let flag = all
            .iter()
            .find(|flag| flag.name == name)
            .ok_or_else(|| AppError::server_key("featureFlag.getDynamic.unknownFlag"))?;
        Ok(flag.resolve_for_tenant(tenant_name))
    }

    pub async fn set_dynamic(
        &self,
        name: &str,
        global_value: Option<bool>,
        tenant_value: Option<(&str, bool)>,
    ) -> Result<(), AppError> {
        if let Some(value) = global_value {
            self.repository.set_global_value(name, value).await?;
        }
        if let Some((tenant_name, value)) = tenant_value {
            self.repository.set_tenant_value(name, tenant_name, value).await?;
        }
        self.cache.invalidate().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn example_flag_name_is_reserved() {
        assert!(is_reserved(EXAMPLE_FLAG_NAME));
    }
}
