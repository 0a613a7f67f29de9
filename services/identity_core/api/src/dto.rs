//! Request/response DTOs for the HTTP surface (spec §6). Deserialization
//! happens at this layer only — every handler hands plain values down
//! into the core services, which never see `axum`/`serde_json` shapes.

use chrono::{DateTime, Utc};
use identity_core_core::domains::common::{DevicePlatform, LoginType, SessionType, TwoStepType};
use identity_core_core::domains::session::{Device, DeviceInput, Session, TokenPair};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResp {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DevicePlatformDto {
    Apple,
    Android,
    Desktop,
    Other,
}

impl From<DevicePlatformDto> for DevicePlatform {
    fn from(platform: DevicePlatformDto) -> Self {
        match platform {
            DevicePlatformDto::Apple => DevicePlatform::Apple,
            DevicePlatformDto::Android => DevicePlatform::Android,
            DevicePlatformDto::Desktop => DevicePlatform::Desktop,
            DevicePlatformDto::Other => DevicePlatform::Other,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DeviceReq {
    pub platform: DevicePlatformDto,
    #[validate(length(min = 1))]
    pub name: String,
    pub notification_token: Option<String>,
    pub web_push_subscription: Option<serde_json::Value>,
}

impl From<DeviceReq> for DeviceInput {
    fn from(req: DeviceReq) -> Self {
        DeviceInput {
            platform: req.platform.into(),
            name: req.name,
            notification_token: req.notification_token,
            web_push_subscription: req.web_push_subscription,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeviceResp {
    pub platform: String,
    pub name: String,
    pub notification_token: Option<String>,
}

impl From<Device> for DeviceResp {
    fn from(device: Device) -> Self {
        Self { platform: device.platform, name: device.name, notification_token: device.notification_token }
    }
}

#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum SessionTypeDto {
    User,
    CheckTwoStep,
    PasswordBasedUpdatePassword,
}

impl From<SessionType> for SessionTypeDto {
    fn from(value: SessionType) -> Self {
        match value {
            SessionType::User => SessionTypeDto::User,
            SessionType::CheckTwoStep => SessionTypeDto::CheckTwoStep,
            SessionType::PasswordBasedUpdatePassword => SessionTypeDto::PasswordBasedUpdatePassword,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum TwoStepTypeDto {
    PasswordBasedOtp,
}

impl From<TwoStepType> for TwoStepTypeDto {
    fn from(value: TwoStepType) -> Self {
        match value {
            TwoStepType::PasswordBasedOtp => TwoStepTypeDto::PasswordBasedOtp,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum LoginTypeDto {
    PasswordBased,
    AnonymousBased,
    DigidBased,
    KeycloakBased,
}

impl From<LoginType> for LoginTypeDto {
    fn from(value: LoginType) -> Self {
        match value {
            LoginType::PasswordBased => LoginTypeDto::PasswordBased,
            LoginType::AnonymousBased => LoginTypeDto::AnonymousBased,
            LoginType::DigidBased => LoginTypeDto::DigidBased,
            LoginType::KeycloakBased => LoginTypeDto::KeycloakBased,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResp {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub session_type: SessionTypeDto,
    pub two_step_type: Option<TwoStepTypeDto>,
    pub login_type: Option<LoginTypeDto>,
    pub impersonator_user_id: Option<Uuid>,
}

impl From<&Session> for SessionResp {
    fn from(session: &Session) -> Self {
        let data = &session.data.0;
        Self {
            id: session.id,
            session_type: data.session_type.into(),
            two_step_type: data.two_step_type.map(Into::into),
            login_type: data.login_type.map(Into::into),
            impersonator_user_id: data.impersonator_user_id,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenPairResp {
    pub access_token: String,
    pub refresh_token: String,
}

impl From<TokenPair> for TokenPairResp {
    fn from(pair: TokenPair) -> Self {
        Self { access_token: pair.access_token, refresh_token: pair.refresh_token }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserSummaryResp {
    pub id: Uuid,
    pub display_name: Option<String>,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MeResp {
    pub session: SessionResp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserSummaryResp>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RefreshTokensReq {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PasswordLoginReq {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
    #[serde(default)]
    pub device: Option<DeviceReq>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SuccessResp {
    pub success: bool,
}

impl SuccessResp {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PasswordVerifyOtpReq {
    #[validate(length(min = 1))]
    pub otp: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PasswordVerifyEmailReq {
    #[validate(length(min = 1))]
    pub token: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PasswordForgotReq {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PasswordResetReq {
    #[validate(length(min = 1))]
    pub token: String,
    #[validate(length(min = 8))]
    pub new_password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PasswordUpdateEmailReq {
    #[validate(email)]
    pub new_email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PasswordUpdatePasswordReq {
    #[validate(length(min = 8))]
    pub new_password: String,
    #[serde(default)]
    pub remove_other_sessions_only: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PasswordListEmailsResp {
    pub emails: Vec<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AnonymousLoginReq {
    #[validate(length(min = 1))]
    pub token: String,
    #[serde(default)]
    pub device: Option<DeviceReq>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DigidMetadataResp {
    pub metadata_xml: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RedirectResp {
    pub redirect_url: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DigidLoginReq {
    #[validate(length(min = 1))]
    pub artifact: String,
    #[serde(default)]
    pub device: Option<DeviceReq>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct KeycloakLoginReq {
    #[validate(length(min = 1))]
    pub code: String,
    #[serde(default)]
    pub device: Option<DeviceReq>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct KeycloakUserUpdateReq {
    pub display_name: Option<String>,
}

/// Admin-linked Keycloak identity, bypassing the implicit-creation path
/// a real OIDC login would take.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct KeycloakCreateReq {
    pub user_id: Uuid,
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TotpSetupReq {
    #[validate(length(min = 1))]
    pub account_name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TotpSetupResp {
    pub otpauth_url: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TotpInfoResp {
    pub enabled: bool,
    pub verified: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TotpCodeReq {
    #[validate(length(min = 1))]
    pub code: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TotpVerifyResp {
    pub verified: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionListResp {
    pub sessions: Vec<SessionResp>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SetNotificationTokenReq {
    #[validate(length(min = 1))]
    pub notification_token: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ListUsersReq {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    50
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListUsersResp {
    pub users: Vec<UserResp>,
    pub total: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResp {
    pub id: Uuid,
    pub display_name: Option<String>,
    pub last_login: Option<DateTime<Utc>>,
}

impl From<identity_core_core::domains::user::User> for UserResp {
    fn from(user: identity_core_core::domains::user::User) -> Self {
        Self { id: user.id, display_name: user.display_name, last_login: user.last_login }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserReq {
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SetActiveReq {
    pub active: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRoleReq {
    #[validate(length(min = 1))]
    pub identifier: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RoleResp {
    pub id: Uuid,
    pub identifier: String,
    pub is_editable: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PermissionsReq {
    #[validate(length(min = 1))]
    pub permission_identifiers: Vec<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RoleIdReq {
    pub role_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RoleSyncReq {
    pub id_in: Option<Vec<Uuid>>,
    pub identifier_in: Option<Vec<String>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RoleSyncResp {
    pub added: Vec<Uuid>,
    pub removed: Vec<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserPermissionSummaryResp {
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TenantCurrentResp {
    pub tenant_id: Uuid,
    pub tenant_name: String,
    pub public_url: String,
    pub api_url: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FeatureFlagSetResp {
    pub flags: std::collections::HashMap<String, bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SetFeatureFlagReq {
    pub global_value: Option<bool>,
    pub tenant_value: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct MagicLinkReq {
    #[validate(length(min = 1))]
    pub messaging_user_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MagicLinkResp {
    pub delivered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_url: Option<String>,
}
