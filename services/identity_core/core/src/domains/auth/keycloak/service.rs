//! Federated OIDC Provider (spec §4.5.4). The authorization-code
//! redirect, code exchange, and `/userinfo` lookup are delegated to
//! [`OidcOAuth2Client`] (`shared_oidc_client`); this module owns the
//! lookup/implicit-creation/tenant-membership business rules.

use super::model::{KeycloakLogin, TenantSettings};
use super::repository::KeycloakLoginRepository;
use crate::domains::auth::LoginOutcome;
use crate::domains::common::{EventSink, LoginType};
use crate::domains::user::{CreateUserOptions, UserDirectory, UserRepository};
use shared_error::AppError;
use shared_oidc_client::OidcOAuth2Client;
use std::sync::Arc;
use uuid::Uuid;

pub const KEYCLOAK_BASED_USER_REGISTERED: &str = "auth.keycloakBased.userRegistered";

pub struct KeycloakProvider<R, U, C>
where
    R: KeycloakLoginRepository,
    U: UserRepository,
    C: OidcOAuth2Client,
{
    repository: Arc<R>,
    users: Arc<U>,
    directory: Arc<UserDirectory<U>>,
    client: Arc<C>,
    events: Arc<dyn EventSink>,
}

impl<R, U, C> KeycloakProvider<R, U, C>
where
    R: KeycloakLoginRepository,
    U: UserRepository,
    C: OidcOAuth2Client,
{
    pub fn new(
        repository: Arc<R>,
        users: Arc<U>,
        directory: Arc<UserDirectory<U>>,
        client: Arc<C>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self { repository, users, directory, client, events }
    }

    pub fn redirect_url(&self, state: &str) -> Result<String, AppError> {
        self.client
            .authorization_url(state)
            .map(|url| url.to_string())
            .map_err(|e| AppError::server("authKeycloakBased.redirect.providerError", e))
    }

    pub async fn login(
        &self,
        tenant_id: Uuid,
        code: &str,
        settings: &TenantSettings,
    ) -> Result<LoginOutcome, AppError> {
        let token = self
            .client
            .exchange_code(code)
            .await
            .map_err(|_| AppError::unauthorized("authKeycloakBased.login.codeExchangeFailed"))?;
        let userinfo = self
            .client
            .get_userinfo(&token.access_token)
            .await
            .map_err(|_| AppError::unauthorized("authKeycloakBased.login.userinfoFailed"))?;

        let email = userinfo
            .email
            .ok_or_else(|| AppError::unauthorized("authKeycloakBased.login.missingEmail"))?;

        let login = match self.repository.find_by_email(tenant_id, &email).await? {
            Some(login) => {
                if let Some(name) = &userinfo.name {
                    let existing = self
                        .users
                        .find_by_id(login.user_id)
                        .await?
                        .ok_or_else(|| AppError::server_key("authKeycloakBased.login.danglingUser"))?;
                    if existing.display_name.is_none() {
                        self.users.update_display_name(login.user_id, name).await?;
                    }
                }

                if !self.users.is_member_of_tenant(login.user_id, tenant_id).await? {
                    if !settings.implicitly_create_users {
                        return Err(AppError::unauthorized("authKeycloakBased.login.notAMember"));
                    }
                    if settings.single_tenant {
                        return Err(AppError::unauthorized("authKeycloakBased.login.singleTenantViolation"));
                    }
                    self.users.add_tenant(login.user_id, tenant_id).await?;
                }

                login
            },
            None => {
                if !settings.implicitly_create_users {
                    return Err(AppError::unauthorized("authKeycloakBased.login.unknownEmail"));
                }
                self.create_user(tenant_id, &email, userinfo.name.as_deref(), settings).await?
            },
        };

        self.users.update_last_login(login.user_id).await?;
        Ok(LoginOutcome { user_id: login.user_id, login_type: LoginType::KeycloakBased, two_step_type: None })
    }

    async fn create_user(
        &self,
        tenant_id: Uuid,
        email: &str,
        display_name: Option<&str>,
        settings: &TenantSettings,
    ) -> Result<KeycloakLogin, AppError> {
        let options = CreateUserOptions {
            display_name: display_name.map(str::to_string),
            sync_across_all_tenants: settings.create_users_globally,
            initial_tenant_id: if settings.create_users_globally { None } else { Some(tenant_id) },
            initial_role_ids: Vec::new(),
        };
        let (user, _tenant_ids) = self.directory.create_bare(&options).await?;
        let login = self.repository.insert(user.id, tenant_id, email).await?;
        self.events.enqueue(
            KEYCLOAK_BASED_USER_REGISTERED,
            serde_json::json!({ "userId": user.id, "tenantId": tenant_id, "email": email }),
        )?;
        Ok(login)
    }
}
