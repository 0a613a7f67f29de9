use async_trait::async_trait;
use identity_core_core::domains::feature_flag::{FeatureFlag, FlagCache};
use identity_core_core::domains::tenant::{Tenant, TenantCache};
use moka::future::Cache;
use std::time::Duration;

/// `moka`-backed [`TenantCache`]: freshness sampling itself (re-checking
/// `updatedAt`) is out of scope for this pull-through cache — it's a
/// plain TTL'd key/value store, matching the trait's minimal surface.
pub struct MokaTenantCache {
    cache: Cache<String, Tenant>,
}

impl MokaTenantCache {
    pub fn new(ttl: Duration) -> Self {
        Self { cache: Cache::builder().time_to_live(ttl).build() }
    }
}

#[async_trait]
impl TenantCache for MokaTenantCache {
    async fn get(&self, key: &str) -> Option<Tenant> {
        self.cache.get(key).await
    }

    async fn put(&self, key: &str, tenant: Tenant) {
        self.cache.insert(key.to_string(), tenant).await;
    }

    async fn invalidate(&self, key: &str) {
        self.cache.invalidate(key).await;
    }
}

const FLAG_SET_KEY: &str = "__all__";

/// `moka`-backed [`FlagCache`]: the whole flag set lives under one key so
/// a miss always re-primes everything, matching spec §4.6's "fetching
/// one known key warms all" rule.
pub struct MokaFlagCache {
    cache: Cache<&'static str, Vec<FeatureFlag>>,
}

impl MokaFlagCache {
    pub fn new(ttl: Duration) -> Self {
        Self { cache: Cache::builder().time_to_live(ttl).max_capacity(1).build() }
    }
}

#[async_trait]
impl FlagCache for MokaFlagCache {
    async fn get_all(&self) -> Option<Vec<FeatureFlag>> {
        self.cache.get(FLAG_SET_KEY).await
    }

    async fn put_all(&self, flags: Vec<FeatureFlag>) {
        self.cache.insert(FLAG_SET_KEY, flags).await;
    }

    async fn invalidate(&self) {
        self.cache.invalidate(FLAG_SET_KEY).await;
    }
}
