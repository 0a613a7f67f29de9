//! TOTP second factor data model (spec §3, §4.5.5).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct TotpSettings {
    pub user_id: Uuid,
    pub secret: String,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TotpSettings {
    pub fn is_verified(&self) -> bool {
        self.verified_at.is_some()
    }
}

/// Runtime second-factor window: one step (~30s).
pub const VERIFY_WINDOW_STEPS: u8 = 1;
