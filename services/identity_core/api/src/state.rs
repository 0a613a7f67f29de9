//! Application state: every concrete repository and infra client wired
//! against the generic core services (spec §9 — a single context object
//! handed to every handler instead of ambient global state).

use identity_core_core::domains::auth::anonymous::AnonymousProvider;
use identity_core_core::domains::auth::digid::DigidProvider;
use identity_core_core::domains::auth::keycloak::KeycloakProvider;
use identity_core_core::domains::auth::password::PasswordProvider;
use identity_core_core::domains::auth::totp::TotpProvider;
use identity_core_core::domains::common::EventSink;
use identity_core_core::domains::feature_flag::FeatureFlagEngine;
use identity_core_core::domains::management::ManagementInterface;
use identity_core_core::domains::permission::PermissionEngine;
use identity_core_core::domains::session::{SessionStore, SessionStoreConfig};
use identity_core_core::domains::tenant::{TenantIndex, TenantResolver};
use identity_core_core::domains::user::UserDirectory;
use identity_core_infra::domains::auth::{
    PgAnonymousLoginRepository, PgDigidLoginRepository, PgKeycloakLoginRepository, PgPasswordLoginRepository,
    PgTotpRepository,
};
use identity_core_infra::domains::{
    PgFeatureFlagRepository, PgManagementRepository, PgPermissionRepository, PgSessionRepository, PgTenantRepository,
    PgUserRepository,
};
use identity_core_infra::{
    BcryptHasher, HmacTokenSigner, MokaFlagCache, MokaTenantCache, PendingEventSink, SamaelSamlClient, SlackClient,
    TotpRsVerifier,
};
use shared_config::Config;
use shared_events::{EventBus, PendingEvents};
use shared_oidc_client::OidcClient;
use shared_rate_limit::RateLimitState;
use std::future::Future;
use std::sync::Arc;
use uuid::Uuid;

pub type UserDirectoryT = UserDirectory<PgUserRepository>;
pub type SessionStoreT = SessionStore<PgSessionRepository, HmacTokenSigner>;
pub type PasswordProviderT =
    PasswordProvider<PgPasswordLoginRepository, PgSessionRepository, BcryptHasher, TotpRsVerifier, PgUserRepository>;
pub type AnonymousProviderT = AnonymousProvider<PgAnonymousLoginRepository, PgUserRepository>;
pub type DigidProviderT = DigidProvider<PgDigidLoginRepository, PgUserRepository, SamaelSamlClient>;
pub type KeycloakProviderT = KeycloakProvider<PgKeycloakLoginRepository, PgUserRepository, OidcClient>;
pub type TotpProviderT = TotpProvider<PgTotpRepository, TotpRsVerifier>;
pub type TenantResolverT = TenantResolver<PgTenantRepository, MokaTenantCache>;
pub type PermissionEngineT = PermissionEngine<PgPermissionRepository>;
pub type FeatureFlagEngineT = FeatureFlagEngine<PgFeatureFlagRepository, MokaFlagCache>;
pub type ManagementInterfaceT =
    ManagementInterface<PgManagementRepository, PgAnonymousLoginRepository, PgUserRepository, SlackClient, SlackClient>;

/// Everything a handler needs, cheap to clone (every field is an `Arc`).
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub event_bus: Arc<dyn EventBus>,

    pub user_repo: Arc<PgUserRepository>,
    pub session_repo: Arc<PgSessionRepository>,
    pub password_repo: Arc<PgPasswordLoginRepository>,
    pub anonymous_repo: Arc<PgAnonymousLoginRepository>,
    pub digid_repo: Arc<PgDigidLoginRepository>,
    pub keycloak_repo: Arc<PgKeycloakLoginRepository>,
    pub totp_repo: Arc<PgTotpRepository>,
    pub management_repo: Arc<PgManagementRepository>,

    pub hasher: Arc<BcryptHasher>,
    pub totp_verifier: Arc<TotpRsVerifier>,
    pub saml_client: Option<Arc<SamaelSamlClient>>,
    pub oidc_client: Option<Arc<OidcClient>>,
    pub slack: Option<Arc<SlackClient>>,

    /// Services with no event-emitting surface: constructed once and
    /// reused for the life of the process.
    pub session_store: Arc<SessionStoreT>,
    pub tenant_resolver: Arc<TenantResolverT>,
    pub permission_engine: Arc<PermissionEngineT>,
    pub feature_flag_engine: Arc<FeatureFlagEngineT>,
    pub totp_provider: Arc<TotpProviderT>,
    pub digid_provider: Option<Arc<DigidProviderT>>,

    pub rate_limit: RateLimitState,

    pub management_tenant_id: Uuid,
    pub management_environment: identity_core_core::domains::tenant::Environment,
}

impl AppState {
    /// Runs `f` against a fresh, request-scoped commit-deferred event
    /// queue (spec §5: enqueued jobs must not surface if the operation
    /// they describe ultimately fails), flushing it to the real event
    /// bus on success and discarding it otherwise.
    pub async fn with_events<T, F, Fut>(&self, f: F) -> Result<T, shared_error::AppError>
    where
        F: FnOnce(Arc<dyn EventSink>) -> Fut,
        Fut: Future<Output = Result<T, shared_error::AppError>>,
    {
        let pending = Arc::new(PendingEvents::new());
        let sink: Arc<dyn EventSink> = Arc::new(PendingEventSink::new(pending.clone()));
        match f(sink).await {
            Ok(value) => {
                pending.flush(self.event_bus.as_ref()).await?;
                Ok(value)
            },
            Err(err) => {
                pending.discard();
                Err(err)
            },
        }
    }

    pub fn user_directory(&self, events: Arc<dyn EventSink>) -> UserDirectoryT {
        UserDirectory::new(self.user_repo.clone(), events)
    }

    pub fn password_provider(&self, events: Arc<dyn EventSink>) -> PasswordProviderT {
        PasswordProvider::new(
            self.password_repo.clone(),
            self.session_repo.clone(),
            self.hasher.clone(),
            self.totp_verifier.clone(),
            self.user_repo.clone(),
            events,
        )
    }

    pub fn anonymous_provider(&self, events: Arc<dyn EventSink>) -> AnonymousProviderT {
        AnonymousProvider::new(self.anonymous_repo.clone(), self.user_repo.clone(), events)
    }

    pub fn keycloak_provider(&self, events: Arc<dyn EventSink>) -> Option<KeycloakProviderT> {
        let oidc = self.oidc_client.clone()?;
        let directory = Arc::new(self.user_directory(events.clone()));
        Some(KeycloakProvider::new(self.keycloak_repo.clone(), self.user_repo.clone(), directory, oidc, events))
    }

    pub fn management_interface(&self, events: Arc<dyn EventSink>) -> Option<ManagementInterfaceT> {
        let workspace = self.slack.clone()?;
        let messaging = workspace.clone();
        let anonymous = Arc::new(self.anonymous_provider(events.clone()));
        let directory = Arc::new(self.user_directory(events));
        Some(ManagementInterface::new(
            self.management_repo.clone(),
            anonymous,
            directory,
            self.user_repo.clone(),
            workspace,
            messaging,
            self.management_environment,
            self.config.public_url.clone(),
            chrono::Duration::days(30),
            self.management_tenant_id,
        ))
    }
}

#[allow(clippy::too_many_arguments)]
pub fn session_store_config(config: &Config) -> SessionStoreConfig {
    SessionStoreConfig {
        access_token_ttl_seconds: config.access_token_ttl_seconds,
        refresh_token_ttl_seconds: config.refresh_token_ttl_seconds,
        max_concurrent_mobile_sessions: Some(5),
        require_device: config.require_device,
    }
}

pub fn tenant_index(config: &Config, environment: identity_core_core::domains::tenant::Environment) -> Result<TenantIndex, shared_error::AppError> {
    use identity_core_core::domains::tenant::{TenantConfigDocument, TenantConfigEntry, UrlConfigEntry};
    use std::collections::HashMap;

    let mut tenants = HashMap::new();
    for (name, raw) in &config.tenants {
        let mut url_config = HashMap::new();
        for (public_url, entry) in &raw.url_config {
            url_config.insert(
                public_url.clone(),
                UrlConfigEntry { environment: map_environment(entry.environment), api_url: entry.api_url.clone() },
            );
        }
        tenants.insert(name.clone(), TenantConfigEntry { data: raw.data.clone(), url_config });
    }
    TenantIndex::build(&TenantConfigDocument { tenants }, environment)
}

pub fn map_environment(env: shared_config::DeploymentEnvironment) -> identity_core_core::domains::tenant::Environment {
    use identity_core_core::domains::tenant::Environment;
    match env {
        shared_config::DeploymentEnvironment::Production => Environment::Production,
        shared_config::DeploymentEnvironment::Acceptance => Environment::Acceptance,
        shared_config::DeploymentEnvironment::Development => Environment::Development,
    }
}
