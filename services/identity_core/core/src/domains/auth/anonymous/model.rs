//! Anonymous Provider data model (spec §3, §4.5.2).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct AnonymousLogin {
    pub user_id: Uuid,
    pub tenant_id: Uuid,
    pub login_token: String,
    pub is_allowed_to_login: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub fn new_login_token() -> String {
    format!("auth-anonymous-{}", Uuid::new_v4())
}
