use identity_core_api::state::{map_environment, session_store_config, tenant_index, AppState};
use identity_core_core::domains::auth::digid::DigidProvider;
use identity_core_core::domains::auth::totp::TotpProvider;
use identity_core_core::domains::feature_flag::FeatureFlagEngine;
use identity_core_core::domains::permission::{MandatoryRoleConfig, PermissionEngine};
use identity_core_core::domains::session::SessionStore;
use identity_core_core::domains::tenant::TenantResolver;
use identity_core_infra::domains::auth::{
    PgAnonymousLoginRepository, PgDigidLoginRepository, PgKeycloakLoginRepository, PgPasswordLoginRepository,
    PgTotpRepository,
};
use identity_core_infra::domains::{
    PgFeatureFlagRepository, PgManagementRepository, PgPermissionRepository, PgSessionRepository, PgTenantRepository,
    PgUserRepository,
};
use identity_core_infra::{
    BcryptHasher, HmacTokenSigner, MokaFlagCache, MokaTenantCache, SamaelSamlClient, SamlConfig, SlackClient,
    TotpRsVerifier,
};
use shared_config::Config;
use shared_events::NatsClient;
use shared_oidc_client::{OidcClient, OidcConfig};
use shared_rate_limit::{RateLimitConfig, RateLimitState};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use uuid::Uuid;

const PASSWORD_HASH_COST: u32 = 13;
const TENANT_CACHE_TTL: Duration = Duration::from_secs(60);
const FLAG_CACHE_TTL: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    #[cfg(feature = "export-spec")]
    {
        identity_core_api::openapi::export_spec().expect("failed to export OpenAPI spec");
        tracing::info!("OpenAPI spec exported to shared/openapi/identity_core.yaml");
    }

    let config = Arc::new(Config::from_env().expect("failed to load configuration"));
    tracing::info!("configuration loaded");

    let db_pool = shared_db::init_pool(&config.database_url, 10).await.expect("failed to connect to database");
    tracing::info!("database connected");

    let environment = map_environment(config.deployment_environment);

    let event_bus = Arc::new(
        NatsClient::connect(&std::env::var("NATS_URL").unwrap_or_else(|_| "nats://localhost:4222".to_string()))
            .await
            .expect("failed to connect to NATS"),
    );

    let user_repo = Arc::new(PgUserRepository::new(db_pool.clone()));
    let session_repo = Arc::new(PgSessionRepository::new(db_pool.clone()));
    let password_repo = Arc::new(PgPasswordLoginRepository::new(db_pool.clone()));
    let anonymous_repo = Arc::new(PgAnonymousLoginRepository::new(db_pool.clone()));
    let digid_repo = Arc::new(PgDigidLoginRepository::new(db_pool.clone()));
    let keycloak_repo = Arc::new(PgKeycloakLoginRepository::new(db_pool.clone()));
    let totp_repo = Arc::new(PgTotpRepository::new(db_pool.clone()));
    let management_repo = Arc::new(PgManagementRepository::new(db_pool.clone()));
    let tenant_repo = Arc::new(PgTenantRepository::new(db_pool.clone()));
    let permission_repo = Arc::new(PgPermissionRepository::new(db_pool.clone()));
    let feature_flag_repo = Arc::new(PgFeatureFlagRepository::new(db_pool.clone()));

    let hasher = Arc::new(BcryptHasher::new(PASSWORD_HASH_COST));
    let totp_verifier = Arc::new(TotpRsVerifier::new("LightbaseIdentityCore".to_string()));
    let signer = Arc::new(HmacTokenSigner::new(config.token_signing_key.clone()));

    let saml_client = saml_client_from_config(&config);
    let oidc_client = oidc_client_from_config(&config);
    let slack = std::env::var("SLACK_BOT_TOKEN").ok().map(|token| Arc::new(SlackClient::new(reqwest::Client::new(), token)));

    let tenant_cache = Arc::new(MokaTenantCache::new(TENANT_CACHE_TTL));
    let index = tenant_index(&config, environment).expect("failed to build tenant index");
    let tenant_resolver =
        Arc::new(TenantResolver::new(tenant_repo.clone(), tenant_cache, index, environment));

    let permission_engine = Arc::new(PermissionEngine::new(permission_repo));
    let feature_flag_engine = Arc::new(FeatureFlagEngine::new(feature_flag_repo, Arc::new(MokaFlagCache::new(FLAG_CACHE_TTL))));
    let totp_provider = Arc::new(TotpProvider::new(totp_repo.clone(), totp_verifier.clone()));

    let digid_provider = saml_client.clone().map(|client| {
        Arc::new(DigidProvider::new(
            digid_repo.clone(),
            user_repo.clone(),
            client,
            config.saml_issuer.clone().unwrap_or_default(),
        ))
    });

    run_startup_sync(&db_pool, &config, &tenant_resolver, &permission_engine, &feature_flag_engine).await;

    let management_tenant_name = std::env::var("MANAGEMENT_TENANT_NAME").unwrap_or_else(|_| "lightbase".to_string());
    let management_tenant_id = tenant_resolver
        .load_by_name(&management_tenant_name)
        .await
        .map(|tenant| tenant.id)
        .unwrap_or_else(|_| Uuid::nil());

    let state = AppState {
        config: config.clone(),
        event_bus,
        user_repo,
        session_repo: session_repo.clone(),
        password_repo,
        anonymous_repo,
        digid_repo,
        keycloak_repo,
        totp_repo,
        management_repo,
        hasher,
        totp_verifier,
        saml_client,
        oidc_client,
        slack,
        session_store: Arc::new(SessionStore::new(session_repo, signer, session_store_config(&config))),
        tenant_resolver,
        permission_engine,
        feature_flag_engine,
        totp_provider,
        digid_provider,
        rate_limit: RateLimitState::new(RateLimitConfig::default(), config.ssr_ip_verification_key.clone()),
        management_tenant_id,
        management_environment: environment,
    };

    tracing::info!("services initialized");

    let app = identity_core_api::build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("identity core listening on http://{addr}");
    tracing::info!("swagger ui available at http://{addr}/docs");

    let listener = TcpListener::bind(addr).await.expect("failed to bind listener");
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await.expect("server error");
}

/// Builds the DigiD SAML client from PEM-encoded key material, if
/// configured. Absent configuration disables the provider entirely
/// rather than failing startup (spec §4.5.3's "not every tenant deploys
/// DigiD" deployment shape). The back-channel `ArtifactResolve` call
/// requires the IdP's verification certificate and this SP's mutual-TLS
/// client identity; either missing is treated the same as no DigiD
/// deployment at all.
fn saml_client_from_config(config: &Config) -> Option<Arc<SamaelSamlClient>> {
    let cert_pem = config.saml_signing_cert_pem.as_ref()?;
    let key_pem = config.saml_signing_key_pem.as_ref()?;
    let idp_cert_pem = config.saml_idp_cert_pem.as_ref()?;
    let issuer = config.saml_issuer.clone()?;
    let mtls_cert_pem = config.saml_mtls_client_cert_pem.as_ref()?;
    let mtls_key_pem = config.saml_mtls_client_key_pem.as_ref()?;

    let signing_key = openssl::pkey::PKey::private_key_from_pem(key_pem.as_bytes())
        .expect("invalid SAML_SIGNING_KEY_PEM");
    let signing_cert = openssl::x509::X509::from_pem(cert_pem.as_bytes()).expect("invalid SAML_SIGNING_CERT_PEM");
    let idp_cert = openssl::x509::X509::from_pem(idp_cert_pem.as_bytes()).expect("invalid SAML_IDP_CERT_PEM");

    let idp_artifact_resolve_url = if config.deployment_environment.is_dev_or_acceptance() {
        config.saml_idp_artifact_resolve_url_staging.clone()
    } else {
        config.saml_idp_artifact_resolve_url_production.clone()
    }
    .expect("SAML_IDP_ARTIFACT_RESOLVE_URL not configured for this environment");

    let sp_acs_url = format!("{}/auth/digid-based/login", config.public_url);
    let idp_sso_url = std::env::var("SAML_IDP_SSO_URL").expect("SAML_IDP_SSO_URL not set");

    let mut mtls_identity_pem = mtls_cert_pem.clone();
    mtls_identity_pem.push('\n');
    mtls_identity_pem.push_str(mtls_key_pem);
    let identity = reqwest::Identity::from_pem(mtls_identity_pem.as_bytes())
        .expect("invalid SAML mTLS client certificate/key");
    let http = reqwest::Client::builder()
        .identity(identity)
        .build()
        .expect("failed to build SAML back-channel mTLS client");

    Some(Arc::new(SamaelSamlClient::new(
        SamlConfig { issuer, sp_acs_url, idp_sso_url, idp_artifact_resolve_url, signing_key, signing_cert, idp_cert },
        http,
    )))
}

/// Builds the federated OIDC client, if configured. Absent configuration
/// disables the Keycloak-based provider (spec §4.5.4).
fn oidc_client_from_config(config: &Config) -> Option<Arc<OidcClient>> {
    let issuer = config.oidc_issuer.clone()?;
    let client_id = config.oidc_client_id.clone()?;
    let client_secret = config.oidc_client_secret.clone()?;
    let redirect_uri = std::env::var("OIDC_REDIRECT_URI").expect("OIDC_REDIRECT_URI not set");

    Some(Arc::new(
        OidcClient::new(OidcConfig { issuer, client_id, client_secret, redirect_uri, scopes: default_oidc_scopes() })
            .expect("invalid OIDC configuration"),
    ))
}

fn default_oidc_scopes() -> Vec<String> {
    vec!["openid".to_string(), "profile".to_string(), "email".to_string()]
}

/// Runs every startup-synchronization routine inside its own
/// advisory-lock-guarded transaction (spec §5), so concurrent instances
/// serialize on each routine without blocking unrelated startup work.
async fn run_startup_sync(
    db_pool: &sqlx::PgPool,
    config: &Config,
    tenant_resolver: &TenantResolver<PgTenantRepository, MokaTenantCache>,
    permission_engine: &PermissionEngine<PgPermissionRepository>,
    feature_flag_engine: &FeatureFlagEngine<PgFeatureFlagRepository, MokaFlagCache>,
) {
    let mut mandatory_roles = Vec::with_capacity(config.mandatory_roles.len());
    for role in &config.mandatory_roles {
        let tenant_id = match &role.tenant {
            Some(name) => Some(tenant_resolver.load_by_name(name).await.expect("mandatory role references an unknown tenant").id),
            None => None,
        };
        mandatory_roles.push(MandatoryRoleConfig {
            identifier: role.identifier.clone(),
            tenant_id,
            permission_identifiers: role.permissions.clone(),
        });
    }

    let mut tx = db_pool.begin().await.expect("failed to start startup-sync transaction");
    shared_db::advisory_lock::acquire_advisory_lock(&mut tx, shared_db::advisory_lock::PERMISSIONS_AND_ROLES)
        .await
        .expect("failed to acquire permissions advisory lock");
    permission_engine.sync_startup(&config.permissions, &mandatory_roles).await.expect("permission sync failed");
    tx.commit().await.expect("failed to commit permission sync");
    tracing::info!("permission catalog synced");

    let mut tx = db_pool.begin().await.expect("failed to start startup-sync transaction");
    shared_db::advisory_lock::acquire_advisory_lock(&mut tx, shared_db::advisory_lock::FEATURE_FLAGS)
        .await
        .expect("failed to acquire feature-flag advisory lock");
    let declared: Vec<String> = config.feature_flags.iter().map(|f| f.name.clone()).collect();
    feature_flag_engine.sync_startup(&declared).await.expect("feature flag sync failed");
    tx.commit().await.expect("failed to commit feature flag sync");
    tracing::info!("feature flag catalog synced");
}
