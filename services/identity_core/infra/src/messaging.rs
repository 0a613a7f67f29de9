//! [`WorkspaceDirectory`] and [`MessagingClient`] implementations backed
//! by the Slack Web API: `users.info` for directory lookups,
//! `conversations.open` + `chat.postMessage` to deliver a magic link as
//! a direct message, `conversations.history` + `chat.delete` to purge a
//! thread during cleanup.

use async_trait::async_trait;
use identity_core_core::domains::management::{MessagingClient, WorkspaceDirectory, WorkspaceMember};
use serde::Deserialize;
use shared_error::AppError;

pub struct SlackClient {
    http: reqwest::Client,
    bot_token: String,
}

impl SlackClient {
    pub fn new(http: reqwest::Client, bot_token: String) -> Self {
        Self { http, bot_token }
    }

    async fn post<T: for<'de> Deserialize<'de>>(
        &self,
        method: &str,
        form: &[(&str, &str)],
    ) -> Result<T, AppError> {
        let response = self
            .http
            .post(format!("https://slack.com/api/{method}"))
            .bearer_auth(&self.bot_token)
            .form(form)
            .send()
            .await
            .map_err(|e| AppError::server("server.internal.slackTransport", e))?;
        response.json::<T>().await.map_err(|e| AppError::server("server.internal.slackTransport", e))
    }
}

#[derive(Debug, Deserialize)]
struct SlackUserInfoResponse {
    ok: bool,
    user: Option<SlackUser>,
}

#[derive(Debug, Deserialize)]
struct SlackUser {
    profile: SlackProfile,
}

#[derive(Debug, Deserialize)]
struct SlackProfile {
    real_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SlackOpenConversationResponse {
    ok: bool,
    channel: Option<SlackChannel>,
}

#[derive(Debug, Deserialize)]
struct SlackChannel {
    id: String,
}

#[derive(Debug, Deserialize)]
struct SlackPostMessageResponse {
    ok: bool,
    ts: Option<String>,
}

#[async_trait]
impl WorkspaceDirectory for SlackClient {
    async fn lookup_member(&self, messaging_user_id: &str) -> Result<Option<WorkspaceMember>, AppError> {
        let response: SlackUserInfoResponse = self.post("users.info", &[("user", messaging_user_id)]).await?;
        if !response.ok {
            return Ok(None);
        }
        Ok(response.user.map(|user| WorkspaceMember {
            messaging_user_id: messaging_user_id.to_string(),
            display_name: user.profile.real_name,
        }))
    }
}

#[async_trait]
impl MessagingClient for SlackClient {
    async fn send_magic_link(&self, messaging_user_id: &str, link: &str) -> Result<String, AppError> {
        let open: SlackOpenConversationResponse =
            self.post("conversations.open", &[("users", messaging_user_id)]).await?;
        let channel = open
            .channel
            .filter(|_| open.ok)
            .ok_or_else(|| AppError::server_key("server.internal.slackOpenConversation"))?;

        let text = format!("Here is your management sign-in link: {link}");
        let posted: SlackPostMessageResponse =
            self.post("chat.postMessage", &[("channel", channel.id.as_str()), ("text", text.as_str())]).await?;
        if !posted.ok {
            return Err(AppError::server_key("server.internal.slackPostMessage"));
        }
        Ok(channel.id)
    }

    async fn purge_thread(&self, thread_id: &str) -> Result<(), AppError> {
        #[derive(Debug, Deserialize)]
        struct HistoryResponse {
            ok: bool,
            messages: Vec<HistoryMessage>,
        }
        #[derive(Debug, Deserialize)]
        struct HistoryMessage {
            ts: String,
        }

        let history: HistoryResponse = self.post("conversations.history", &[("channel", thread_id)]).await?;
        if !history.ok {
            return Ok(());
        }
        for message in history.messages {
            let _: SlackPostMessageResponse =
                self.post("chat.delete", &[("channel", thread_id), ("ts", message.ts.as_str())]).await?;
        }
        Ok(())
    }
}
