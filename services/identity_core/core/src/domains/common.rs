//! Enumerations shared across domains: the session's `type`/`twoStepType`,
//! the provider that authenticated a user, and the device platforms a
//! session can be bound to.

use serde::{Deserialize, Serialize};
use shared_error::AppError;

/// The side-effect surface every domain service enqueues jobs through.
/// Implemented by the infra layer's commit-deferred event queue; kept as
/// a sync call so committing the enclosing transaction and flushing the
/// queue stay the caller's responsibility, not this trait's (spec §5:
/// "enqueued jobs from a rolled-back transaction must not be visible").
pub trait EventSink: Send + Sync {
    fn enqueue(&self, job_name: &str, payload: serde_json::Value) -> Result<(), AppError>;
}

/// `Session.data.type` (spec §3, §4.5's shared tail protocol).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionType {
    /// Fully authenticated.
    User,
    /// Password login succeeded but a second factor is outstanding.
    CheckTwoStep,
    /// Force-rotate window (spec §4.5.1): only the update-password route
    /// is reachable until the user sets a new password.
    PasswordBasedUpdatePassword,
}

/// `Session.data.twoStepType`, set alongside `SessionType::CheckTwoStep`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TwoStepType {
    PasswordBasedOtp,
}

/// `Session.data.loginType`: which provider produced this session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LoginType {
    PasswordBased,
    AnonymousBased,
    DigidBased,
    KeycloakBased,
}

impl LoginType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoginType::PasswordBased => "passwordBased",
            LoginType::AnonymousBased => "anonymousBased",
            LoginType::DigidBased => "digidBased",
            LoginType::KeycloakBased => "keycloakBased",
        }
    }
}

/// `Device.platform` (spec §4.5.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DevicePlatform {
    Apple,
    Android,
    Desktop,
    Other,
}

impl DevicePlatform {
    /// Mobile platforms are the ones a concurrent-session cap and
    /// notification token apply to.
    pub fn is_mobile(&self) -> bool {
        matches!(self, DevicePlatform::Apple | DevicePlatform::Android)
    }

    /// Web-push subscriptions are only meaningful for desktop sessions.
    pub fn is_desktop(&self) -> bool {
        matches!(self, DevicePlatform::Desktop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_apple_and_android_are_mobile() {
        assert!(DevicePlatform::Apple.is_mobile());
        assert!(DevicePlatform::Android.is_mobile());
        assert!(!DevicePlatform::Desktop.is_mobile());
        assert!(!DevicePlatform::Other.is_mobile());
    }
}
