//! Password Provider data model (spec §3, §4.5.1).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct PasswordLogin {
    pub user_id: Uuid,
    pub tenant_id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub verified_at: Option<DateTime<Utc>>,
    pub otp_enabled_at: Option<DateTime<Utc>>,
    pub otp_secret: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PasswordLogin {
    pub fn is_verified(&self) -> bool {
        self.verified_at.is_some()
    }

    pub fn otp_required(&self) -> bool {
        self.otp_enabled_at.is_some()
    }

    /// Force-rotate check (spec §4.5.1): `updatedAt` older than 6 months.
    pub fn needs_force_rotate(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.updated_at) > chrono::Duration::days(182)
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct PasswordLoginReset {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub should_set_password: bool,
    pub created_at: DateTime<Utc>,
}

impl PasswordLoginReset {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct PasswordLoginAttempt {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

pub const RESET_TOKEN_TTL_SECONDS: i64 = 24 * 60 * 60;
pub const ROLLING_ATTEMPT_WINDOW_SECONDS: i64 = 5 * 60;
pub const MAX_ROLLING_ATTEMPTS: i64 = 10;
pub const BCRYPT_COST: u32 = 13;
pub const PASSWORD_OTP_WINDOW_STEPS: u8 = 11;

#[cfg(test)]
mod tests {
    use super::*;

    fn login(updated_at: DateTime<Utc>) -> PasswordLogin {
        PasswordLogin {
            user_id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            email: "alice@example.com".to_string(),
            password_hash: "hash".to_string(),
            verified_at: Some(Utc::now()),
            otp_enabled_at: None,
            otp_secret: None,
            created_at: updated_at,
            updated_at,
        }
    }

    #[test]
    fn force_rotate_triggers_past_six_months() {
        let stale = login(Utc::now() - chrono::Duration::days(200));
        assert!(stale.needs_force_rotate(Utc::now()));
    }

    #[test]
    fn force_rotate_not_triggered_for_recent_password() {
        let fresh = login(Utc::now() - chrono::Duration::days(5));
        assert!(!fresh.needs_force_rotate(Utc::now()));
    }
}
