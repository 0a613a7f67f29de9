use crate::dto::*;
use utoipa::OpenApi;

/// OpenAPI documentation for the identity core service (spec §4, §6).
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::health_check,
        crate::handlers::account::me,
        crate::handlers::account::refresh_tokens,
        crate::handlers::account::logout,
        crate::handlers::account::impersonate_stop_session,
        crate::handlers::account::list_users,
        crate::handlers::account::get_user,
        crate::handlers::account::update_user,
        crate::handlers::account::set_active,
        crate::handlers::password::login,
        crate::handlers::password::verify_otp,
        crate::handlers::password::verify_email,
        crate::handlers::password::forgot_password,
        crate::handlers::password::reset_password,
        crate::handlers::password::list_emails,
        crate::handlers::password::update_email,
        crate::handlers::password::update_password,
        crate::handlers::anonymous::login,
        crate::handlers::digid::metadata,
        crate::handlers::digid::redirect,
        crate::handlers::digid::login,
        crate::handlers::keycloak::redirect,
        crate::handlers::keycloak::login,
        crate::handlers::keycloak::user_update,
        crate::handlers::keycloak::create,
        crate::handlers::totp::info,
        crate::handlers::totp::setup,
        crate::handlers::totp::setup_verify,
        crate::handlers::totp::verify,
        crate::handlers::totp::remove,
        crate::handlers::totp::remove_for_user,
        crate::handlers::session::list,
        crate::handlers::session::logout,
        crate::handlers::session::set_notification_token,
        crate::handlers::permission::summary,
        crate::handlers::permission::list_permissions,
        crate::handlers::permission::list_roles,
        crate::handlers::permission::create_role,
        crate::handlers::permission::delete_role,
        crate::handlers::permission::add_permissions,
        crate::handlers::permission::remove_permissions,
        crate::handlers::permission::assign_role,
        crate::handlers::permission::remove_role,
        crate::handlers::permission::sync_roles,
        crate::handlers::permission::user_summary,
        crate::handlers::tenant::current,
        crate::handlers::feature_flag::current,
        crate::handlers::feature_flag::get_dynamic,
        crate::handlers::feature_flag::set_dynamic,
        crate::handlers::management::request_magic_link,
    ),
    components(
        schemas(
            HealthResp,
            DevicePlatformDto,
            DeviceReq,
            DeviceResp,
            SessionTypeDto,
            TwoStepTypeDto,
            LoginTypeDto,
            SessionResp,
            TokenPairResp,
            UserSummaryResp,
            MeResp,
            RefreshTokensReq,
            PasswordLoginReq,
            SuccessResp,
            PasswordVerifyOtpReq,
            PasswordVerifyEmailReq,
            PasswordForgotReq,
            PasswordResetReq,
            PasswordUpdateEmailReq,
            PasswordUpdatePasswordReq,
            PasswordListEmailsResp,
            AnonymousLoginReq,
            DigidMetadataResp,
            RedirectResp,
            DigidLoginReq,
            KeycloakLoginReq,
            KeycloakUserUpdateReq,
            KeycloakCreateReq,
            TotpSetupReq,
            TotpSetupResp,
            TotpInfoResp,
            TotpCodeReq,
            TotpVerifyResp,
            SessionListResp,
            SetNotificationTokenReq,
            ListUsersReq,
            ListUsersResp,
            UserResp,
            UpdateUserReq,
            SetActiveReq,
            CreateRoleReq,
            RoleResp,
            PermissionsReq,
            RoleIdReq,
            RoleSyncReq,
            RoleSyncResp,
            UserPermissionSummaryResp,
            TenantCurrentResp,
            FeatureFlagSetResp,
            SetFeatureFlagReq,
            MagicLinkReq,
            MagicLinkResp,
        )
    ),
    tags(
        (name = "health", description = "Health check"),
        (name = "account", description = "Session, impersonation, and user admin endpoints"),
        (name = "password-based", description = "Password authentication and self-service account management"),
        (name = "anonymous-based", description = "Anonymous token login"),
        (name = "digid-based", description = "DigiD SAML login"),
        (name = "keycloak-based", description = "Keycloak OIDC login"),
        (name = "totp-provider", description = "TOTP second-factor management"),
        (name = "session", description = "Session listing and device management"),
        (name = "permission", description = "Role and permission administration"),
        (name = "multitenant", description = "Tenant resolution"),
        (name = "feature-flag", description = "Feature flag resolution and administration"),
        (name = "management", description = "Internal management tooling"),
    ),
    info(
        title = "Identity Core API",
        version = "0.1.0",
        description = "Multi-tenant authentication, session, and permission service",
        contact(
            name = "Identity Core Team",
        ),
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server"),
    ),
)]
pub struct ApiDoc;

/// Export the OpenAPI spec to YAML (only with `--features export-spec`).
#[cfg(feature = "export-spec")]
#[allow(dead_code)]
pub fn export_spec() -> std::io::Result<()> {
    use std::path::Path;

    let openapi = ApiDoc::openapi();
    let yaml = serde_yaml::to_string(&openapi).expect("Failed to serialize OpenAPI to YAML");

    let path = Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/../../../shared/openapi/identity_core.yaml"));

    std::fs::create_dir_all(path.parent().unwrap())?;
    std::fs::write(path, yaml)?;

    println!("cargo:warning=OpenAPI spec exported to {:?}", path);
    Ok(())
}
