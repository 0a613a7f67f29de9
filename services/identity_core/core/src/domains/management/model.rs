//! Management Interface data model (spec §3, §4.8).
//!
//! A magic link embeds an anonymous-login token (spec glossary): the
//! management flow never issues sessions itself, it provisions a
//! transient user with an `AnonymousLogin` and hands the caller a URL
//! the anonymous provider's own login endpoint will accept.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct ManagementProvisioning {
    pub user_id: Uuid,
    pub messaging_user_id: String,
    pub thread_id: String,
    pub created_at: DateTime<Utc>,
}

/// A workspace member resolved from the external messaging platform's
/// directory (spec §4.8: "one user id is checked against a workspace
/// directory").
#[derive(Debug, Clone)]
pub struct WorkspaceMember {
    pub messaging_user_id: String,
    pub display_name: Option<String>,
}
