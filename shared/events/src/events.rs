//! Event catalog for the identity/session core's Event/Job Bus (spec §4.9).
//!
//! Every provider operation the specification marks "enqueue an event"
//! produces one of these payloads, wrapped in an [`EventEnvelope`] before
//! being handed to the bus. Job names match the spec's dotted convention
//! (`auth.passwordBased.requestOtp`, ...) exactly, so downstream consumers
//! (mailers, SMS senders) can dispatch on `event_type` without translation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const USER_SOFT_DELETED: &str = "auth.user.softDeleted";

pub const PASSWORD_BASED_REQUEST_OTP: &str = "auth.passwordBased.requestOtp";
pub const PASSWORD_BASED_USER_REGISTERED: &str = "auth.passwordBased.userRegistered";
pub const PASSWORD_BASED_LOGIN_VERIFIED: &str = "auth.passwordBased.loginVerified";
pub const PASSWORD_BASED_PASSWORD_RESET: &str = "auth.passwordBased.passwordReset";
pub const PASSWORD_BASED_FORGOT_PASSWORD: &str = "auth.passwordBased.forgotPassword";
pub const PASSWORD_BASED_EMAIL_UPDATED: &str = "auth.passwordBased.emailUpdated";
pub const PASSWORD_BASED_PASSWORD_UPDATED: &str = "auth.passwordBased.passwordUpdated";

pub const ANONYMOUS_BASED_USER_REGISTERED: &str = "auth.anonymousBased.userRegistered";

pub const KEYCLOAK_BASED_USER_REGISTERED: &str = "auth.keycloakBased.userRegistered";

/// Payload shared by every event that refers to a single user within a
/// tenant — the common case for this catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEvent {
    pub user_id: Uuid,
    pub tenant_id: Uuid,
    pub email: Option<String>,
}

/// `auth.passwordBased.requestOtp` payload: the TOTP token the recipient
/// should receive over their configured channel, not the secret itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestOtpEvent {
    pub user_id: Uuid,
    pub tenant_id: Uuid,
    pub email: String,
    pub otp_token: String,
}

/// `auth.passwordBased.userRegistered` / `...forgotPassword` /
/// `...loginVerified` payload: carries the single-use token the mailer
/// must embed in a link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenEvent {
    pub user_id: Uuid,
    pub tenant_id: Uuid,
    pub email: String,
    pub token: String,
}

/// Envelope wrapping every event published on the bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope<T> {
    pub event_type: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: String,
    pub data: T,
}

impl<T> EventEnvelope<T> {
    pub fn new(event_type: &str, data: T) -> Self {
        Self {
            event_type: event_type.to_string(),
            timestamp: chrono::Utc::now(),
            version: "1.0".to_string(),
            data,
        }
    }
}
