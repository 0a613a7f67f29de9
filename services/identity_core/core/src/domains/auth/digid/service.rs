//! BSN/SAML Provider (spec §4.5.3). The XML-DSig signing/verification,
//! SOAP-over-mTLS transport, and DEFLATE/base64 redirect-binding
//! encoding are delegated to [`SamlClient`], implemented in infra via
//! `openssl`, `quick-xml`, and `flate2` — this crate only runs the
//! status and conditions business rules against the already-parsed
//! assertion.

use super::model::{extract_bsn, ResolvedAssertion, SamlStatusCode};
use super::repository::DigidLoginRepository;
use crate::domains::auth::LoginOutcome;
use crate::domains::common::LoginType;
use crate::domains::user::UserRepository;
use chrono::Utc;
use shared_error::AppError;
use std::sync::Arc;
use uuid::Uuid;

#[async_trait::async_trait]
pub trait SamlClient: Send + Sync {
    /// Signed SAML metadata document for the configured key pair/issuer.
    fn metadata_xml(&self) -> Result<String, AppError>;
    /// IdP redirect URL carrying a signed, deflated, base64, URL-encoded
    /// `AuthnRequest` (spec §4.5.3 step 2).
    fn build_redirect_url(&self, relay_state: Option<&str>) -> Result<String, AppError>;
    /// POSTs a signed SOAP `ArtifactResolve` over mutual TLS to the IdP's
    /// back-channel and verifies every `Signature` in the response
    /// before returning the parsed assertion (spec §4.5.3 step 3).
    async fn resolve_artifact(&self, artifact: &str) -> Result<ResolvedAssertion, AppError>;
}

pub struct DigidProvider<R: DigidLoginRepository, U: UserRepository, C: SamlClient> {
    repository: Arc<R>,
    users: Arc<U>,
    client: Arc<C>,
    issuer: String,
}

impl<R: DigidLoginRepository, U: UserRepository, C: SamlClient> DigidProvider<R, U, C> {
    pub fn new(repository: Arc<R>, users: Arc<U>, client: Arc<C>, issuer: String) -> Self {
        Self { repository, users, client, issuer }
    }

    pub fn metadata(&self) -> Result<String, AppError> {
        self.client.metadata_xml()
    }

    pub fn redirect_url(&self, relay_state: Option<&str>) -> Result<String, AppError> {
        self.client.build_redirect_url(relay_state)
    }

    /// Resolves an IdP artifact into a BSN, enforcing the business
    /// rules of spec §4.5.3 step 4 on top of the already-verified
    /// assertion.
    pub async fn resolve_bsn(&self, artifact: &str) -> Result<String, AppError> {
        let assertion = self.client.resolve_artifact(artifact).await?;

        match assertion.status_code {
            SamlStatusCode::Success => {},
            SamlStatusCode::AuthnFailed => return Err(AppError::unauthorized("authDigidBased.resolveArtifact.aborted")),
            SamlStatusCode::NoAuthnContext => {
                return Err(AppError::unauthorized("authDigidBased.resolveArtifact.insufficientSecurityLevel"))
            },
            SamlStatusCode::RequestDenied => {
                return Err(AppError::unauthorized("authDigidBased.resolveArtifact.invalidSAMLArt"))
            },
            SamlStatusCode::Other(_) => return Err(AppError::server_key("authDigidBased.resolveArtifact.unexpectedStatus")),
        }

        if assertion.audience != self.issuer {
            return Err(AppError::unauthorized("authDigidBased.resolveArtifact.audienceMismatch"));
        }

        let now = Utc::now();
        if now < assertion.not_before || now >= assertion.not_on_or_after {
            return Err(AppError::unauthorized("authDigidBased.resolveArtifact.conditionsNotMet"));
        }

        extract_bsn(&assertion.name_id).ok_or_else(|| AppError::unauthorized("authDigidBased.resolveArtifact.invalidNameId"))
    }

    pub async fn login(&self, tenant_id: Uuid, bsn: &str) -> Result<LoginOutcome, AppError> {
        let login = self
            .repository
            .find_by_bsn(tenant_id, bsn)
            .await?
            .ok_or_else(|| AppError::validation("authDigidBased.login.unknownBsn"))?;
        self.users.update_last_login(login.user_id).await?;
        Ok(LoginOutcome { user_id: login.user_id, login_type: LoginType::DigidBased, two_step_type: None })
    }
}
