use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Deployment environment marker, read from `DEPLOYMENT_ENVIRONMENT`.
///
/// Drives tenant urlConfig filtering (§4.1) and the DigiD backchannel
/// endpoint selection (§4.5.3 — staging vs production).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentEnvironment {
    Development,
    Acceptance,
    Production,
}

impl DeploymentEnvironment {
    pub fn is_dev_or_acceptance(&self) -> bool {
        matches!(self, DeploymentEnvironment::Development | DeploymentEnvironment::Acceptance)
    }
}

/// One `urlConfig` entry for a tenant: a public URL mapped to the
/// environment it serves and the api URL used in that environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantUrlConfigEntry {
    pub environment: DeploymentEnvironment,
    pub api_url: String,
}

/// Raw per-tenant configuration as read from the static document (§4.1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTenantConfig {
    #[serde(default)]
    pub data: serde_json::Value,
    pub url_config: HashMap<String, TenantUrlConfigEntry>,
}

/// A mandatory role declaration (§4.2): identifier, optional tenant scope
/// (`None` = global), and the permission identifiers it grants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MandatoryRoleConfig {
    pub identifier: String,
    #[serde(default)]
    pub tenant: Option<String>,
    pub permissions: Vec<String>,
}

/// A declared feature flag default (§4.6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureFlagConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub global_value: bool,
}

/// Application configuration loaded once at startup and shared behind an
/// `Arc` for the lifetime of the process (spec §9 — "global mutable
/// services" replaced by an explicit context object).
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Deployment environment marker (production/acceptance/development)
    pub deployment_environment: DeploymentEnvironment,

    /// HMAC signing secret for access/refresh bearer tokens (`APP_KEYS` in
    /// production; a fixed development string elsewhere).
    pub token_signing_key: String,

    /// Access token lifetime in seconds (default: 900 = 15 minutes)
    #[serde(default = "default_access_token_ttl")]
    pub access_token_ttl_seconds: i64,

    /// Refresh token lifetime in seconds (default: 604800 = 7 days)
    #[serde(default = "default_refresh_token_ttl")]
    pub refresh_token_ttl_seconds: i64,

    /// Shared secret used to verify the `X-SSR-Ip-Verification` HMAC over
    /// the `X-SSR-Ip` header (§4.7). `None` disables the override path.
    pub ssr_ip_verification_key: Option<String>,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Public-facing base URL (no trailing slash) used to build
    /// outward-facing links: the DigiD SAML assertion-consumer-service
    /// URL and magic links sent through the management interface (§4.5.3,
    /// §4.8). Distinct from `host`, which is only the bind address.
    #[serde(default = "default_public_url")]
    pub public_url: String,

    /// Static tenant configuration document (§4.1)
    pub tenants: HashMap<String, RawTenantConfig>,

    /// Declared permission catalog (§4.2)
    #[serde(default)]
    pub permissions: Vec<String>,

    /// Declared mandatory roles (§4.2)
    #[serde(default)]
    pub mandatory_roles: Vec<MandatoryRoleConfig>,

    /// Declared feature flags (§4.6)
    #[serde(default)]
    pub feature_flags: Vec<FeatureFlagConfig>,

    /// Federated OIDC issuer base URL (optional — absent disables the provider)
    pub oidc_issuer: Option<String>,
    pub oidc_client_id: Option<String>,
    pub oidc_client_secret: Option<String>,

    /// DigiD/SAML signing key pair and IdP metadata, PEM-encoded (optional)
    pub saml_signing_cert_pem: Option<String>,
    pub saml_signing_key_pem: Option<String>,
    pub saml_idp_cert_pem: Option<String>,
    pub saml_issuer: Option<String>,
    pub saml_idp_artifact_resolve_url_staging: Option<String>,
    pub saml_idp_artifact_resolve_url_production: Option<String>,

    /// Client certificate/key pair presented on the `ArtifactResolve`
    /// back-channel, PEM-encoded (spec §4.5.3: the back-channel call runs
    /// over mutual TLS).
    pub saml_mtls_client_cert_pem: Option<String>,
    pub saml_mtls_client_key_pem: Option<String>,

    /// httpOnly `Set-Cookie` attributes for the bearer-cookie delivery
    /// mode (spec §4.3's SSR integration: tokens are also mirrored into
    /// cookies so server-rendered requests can authenticate without
    /// touching `localStorage`).
    #[serde(default = "default_cookie_path")]
    pub cookie_path: String,
    #[serde(default = "default_cookie_same_site")]
    pub cookie_same_site: String,
    #[serde(default)]
    pub cookie_secure: bool,
    pub cookie_domain: Option<String>,

    /// Reject logins carrying no `device` object (spec §4.5.6). Off by
    /// default since not every deployment collects device info.
    #[serde(default)]
    pub require_device: bool,
}

fn default_access_token_ttl() -> i64 {
    900
}

fn default_refresh_token_ttl() -> i64 {
    604_800
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_public_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_cookie_path() -> String {
    "/".to_string()
}

fn default_cookie_same_site() -> String {
    "Strict".to_string()
}

impl Config {
    /// Load configuration from a config file (`CONFIG_FILE`, default
    /// `config/default.yaml`) layered with environment variable overrides.
    ///
    /// The enumerated set of environment variables this core consumes is:
    /// `DATABASE_URL`, `DEPLOYMENT_ENVIRONMENT`, `TOKEN_SIGNING_KEY`,
    /// `SSR_IP_VERIFICATION_KEY`, `HOST`, `PORT`, `PUBLIC_URL`, `OIDC_*`,
    /// `SAML_*`.
    /// Any required variable missing at startup aborts with a clear error
    /// (spec §6).
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let _ = dotenvy::dotenv();

        let config_file = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config/default".into());

        let builder = config::Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 3000)?
            .set_default("public_url", "http://localhost:3000")?
            .set_default("access_token_ttl_seconds", 900)?
            .set_default("refresh_token_ttl_seconds", 604_800)?
            .add_source(config::File::with_name(&config_file).required(false))
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(true),
            );

        let built = builder.build()?;
        let deserialized = built.try_deserialize::<Config>()?;

        if deserialized.database_url.is_empty() {
            return Err(config::ConfigError::NotFound("DATABASE_URL".into()));
        }
        if deserialized.token_signing_key.is_empty() {
            return Err(config::ConfigError::NotFound("TOKEN_SIGNING_KEY".into()));
        }
        if deserialized.tenants.is_empty() {
            return Err(config::ConfigError::Message(
                "tenants configuration must declare at least one tenant".into(),
            ));
        }

        Ok(deserialized)
    }
}
