//! Management Interface (spec §4.8): operator self-provisioning of a
//! short-lived elevated session via an external messaging platform, and
//! the daily transient-user cleanup job.

use super::model::WorkspaceMember;
use super::repository::ManagementRepository;
use crate::domains::auth::anonymous::AnonymousProvider;
use crate::domains::auth::anonymous::AnonymousLoginRepository;
use crate::domains::tenant::Environment;
use crate::domains::user::{CreateUserOptions, UserDirectory, UserRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared_error::AppError;
use std::sync::Arc;
use uuid::Uuid;

#[async_trait]
pub trait WorkspaceDirectory: Send + Sync {
    async fn lookup_member(&self, messaging_user_id: &str) -> Result<Option<WorkspaceMember>, AppError>;
}

#[async_trait]
pub trait MessagingClient: Send + Sync {
    /// Delivers the magic link as a direct message, returning the
    /// thread id so the cleanup job can later purge it.
    async fn send_magic_link(&self, messaging_user_id: &str, link: &str) -> Result<String, AppError>;
    async fn purge_thread(&self, thread_id: &str) -> Result<(), AppError>;
}

/// Either the link was delivered out of band, or (development only)
/// it's returned inline for the caller to use directly.
pub enum MagicLinkDelivery {
    Sent,
    Inline(String),
}

pub struct ManagementInterface<R, AR, UR, W, M>
where
    R: ManagementRepository,
    AR: AnonymousLoginRepository,
    UR: UserRepository,
    W: WorkspaceDirectory,
    M: MessagingClient,
{
    repository: Arc<R>,
    anonymous: Arc<AnonymousProvider<AR, UR>>,
    directory: Arc<UserDirectory<UR>>,
    users: Arc<UR>,
    workspace: Arc<W>,
    messaging: Arc<M>,
    environment: Environment,
    public_url: String,
    retention: chrono::Duration,
    /// The tenant a transient management user is registered under.
    /// Management access is operator-level, not tenant data access, so
    /// any tenant the deployment designates for this purpose will do.
    management_tenant_id: Uuid,
}

impl<R, AR, UR, W, M> ManagementInterface<R, AR, UR, W, M>
where
    R: ManagementRepository,
    AR: AnonymousLoginRepository,
    UR: UserRepository,
    W: WorkspaceDirectory,
    M: MessagingClient,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        repository: Arc<R>,
        anonymous: Arc<AnonymousProvider<AR, UR>>,
        directory: Arc<UserDirectory<UR>>,
        users: Arc<UR>,
        workspace: Arc<W>,
        messaging: Arc<M>,
        environment: Environment,
        public_url: String,
        retention: chrono::Duration,
        management_tenant_id: Uuid,
    ) -> Self {
        Self {
            repository,
            anonymous,
            directory,
            users,
            workspace,
            messaging,
            environment,
            public_url,
            retention,
            management_tenant_id,
        }
    }

    /// Request a magic link (spec §4.8). Fails closed if the messaging
    /// user id isn't in the workspace directory.
    pub async fn request_magic_link(&self, messaging_user_id: &str) -> Result<MagicLinkDelivery, AppError> {
        let member = self
            .workspace
            .lookup_member(messaging_user_id)
            .await?
            .ok_or_else(|| AppError::validation("management.requestMagicLink.unknownMember"))?;

        let options = CreateUserOptions {
            display_name: member.display_name,
            sync_across_all_tenants: false,
            initial_tenant_id: Some(self.management_tenant_id),
            initial_role_ids: Vec::new(),
        };
        let (user, _tenant_ids) = self.directory.create_bare(&options).await?;
        let login = self.anonymous.register(user.id, self.management_tenant_id).await?;

        let link = format!("{}/auth/anonymous-based/login?token={}", self.public_url, login.login_token);

        if matches!(self.environment, Environment::Development) {
            self.repository.insert(user.id, messaging_user_id, "inline").await?;
            return Ok(MagicLinkDelivery::Inline(link));
        }

        let thread_id = self.messaging.send_magic_link(messaging_user_id, &link).await?;
        self.repository.insert(user.id, messaging_user_id, &thread_id).await?;
        Ok(MagicLinkDelivery::Sent)
    }

    /// Daily cleanup job (spec §4.8): deletes transient management
    /// users past retention and purges their chat threads.
    pub async fn cleanup(&self, now: DateTime<Utc>) -> Result<usize, AppError> {
        let cutoff = now - self.retention;
        let expired = self.repository.list_older_than(cutoff).await?;
        let count = expired.len();
        for row in expired {
            if row.thread_id != "inline" {
                self.messaging.purge_thread(&row.thread_id).await?;
            }
            self.users.delete(row.user_id).await?;
            self.repository.delete(row.user_id).await?;
        }
        Ok(count)
    }
}
