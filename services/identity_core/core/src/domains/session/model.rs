//! Session Store data model (spec §3, §4.3).

use crate::domains::common::{DevicePlatform, LoginType, SessionType, TwoStepType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::FromRow;
use uuid::Uuid;

/// The opaque blob a `Session` row carries (spec §3: "contains userId,
/// loginType, type, twoStepType, impersonatorUserId").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionData {
    pub user_id: Option<Uuid>,
    pub login_type: Option<LoginType>,
    pub session_type: SessionType,
    pub two_step_type: Option<TwoStepType>,
    pub impersonator_user_id: Option<Uuid>,
}

impl SessionData {
    /// `data.userId` required when `type == user` (spec §3 invariant).
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.session_type == SessionType::User && self.user_id.is_none() {
            return Err("session.data.userIdRequiredForUserType");
        }
        Ok(())
    }

    /// Content hash over the canonical JSON encoding; the stored checksum
    /// must match this at load time (spec §4.3).
    pub fn checksum(&self) -> String {
        let canonical = serde_json::to_vec(self).expect("SessionData always serializes");
        let digest = Sha256::digest(&canonical);
        hex::encode(digest)
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: Uuid,
    pub checksum: String,
    pub data: sqlx::types::Json<SessionData>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// Tamper/stale-update detection: a mismatch denotes the row was
    /// written by something that didn't go through `checksum()`.
    pub fn checksum_matches(&self) -> bool {
        self.checksum == self.data.0.checksum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// One row in the access/refresh token chain. Access tokens point
/// directly at a session; refresh tokens additionally link to the prior
/// refresh token they replace, forming a strictly linear chain.
#[derive(Debug, Clone, FromRow)]
pub struct SessionToken {
    pub id: Uuid,
    pub session_id: Uuid,
    pub kind: String,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub parent_refresh_token_id: Option<Uuid>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl SessionToken {
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        self.revoked_at.is_none() && self.expires_at > now
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Device {
    pub session_id: Uuid,
    pub platform: String,
    pub name: String,
    pub notification_token: Option<String>,
    pub web_push_subscription: Option<sqlx::types::Json<serde_json::Value>>,
    pub created_at: DateTime<Utc>,
}

/// Input to attach a device at session creation (spec §4.5.6).
#[derive(Debug, Clone)]
pub struct DeviceInput {
    pub platform: DevicePlatform,
    pub name: String,
    pub notification_token: Option<String>,
    pub web_push_subscription: Option<serde_json::Value>,
}

impl DeviceInput {
    /// Notification token is mobile-only, web-push is desktop-only
    /// (spec §3 invariant).
    pub fn normalized(mut self) -> Self {
        if !self.platform.is_mobile() {
            self.notification_token = None;
        }
        if !self.platform.is_desktop() {
            self.web_push_subscription = None;
        }
        self
    }
}

pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_changes_when_data_changes() {
        let data = SessionData {
            user_id: Some(Uuid::new_v4()),
            login_type: Some(LoginType::PasswordBased),
            session_type: SessionType::User,
            two_step_type: None,
            impersonator_user_id: None,
        };
        let mut other = data.clone();
        other.impersonator_user_id = Some(Uuid::new_v4());
        assert_ne!(data.checksum(), other.checksum());
    }

    #[test]
    fn user_type_without_user_id_is_invalid() {
        let data = SessionData {
            user_id: None,
            login_type: None,
            session_type: SessionType::User,
            two_step_type: None,
            impersonator_user_id: None,
        };
        assert!(data.validate().is_err());
    }

    #[test]
    fn device_input_strips_mismatched_fields() {
        let input = DeviceInput {
            platform: DevicePlatform::Desktop,
            name: "MacBook".to_string(),
            notification_token: Some("should be dropped".to_string()),
            web_push_subscription: Some(serde_json::json!({"endpoint": "https://push"})),
        }
        .normalized();
        assert!(input.notification_token.is_none());
        assert!(input.web_push_subscription.is_some());
    }
}
