//! Discord REST client and the notification-sink adapter built on it.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::embeds;
use super::types::{ChannelRef, CreateMessage, StartForumThread};
use crate::application::tracker::Notification;
use crate::application::service::NotificationSink;
use crate::domain::MatchSnapshot;

pub const API_BASE_URL: &str = "https://discord.com/api/v10";

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Discord API error ({0}): {1}")]
    ApiError(reqwest::StatusCode, String),

    #[error("malformed API response: {0}")]
    DecodeFailed(String),

    #[error("no announcement destination configured")]
    NoDestination,
}

pub type Result<T> = std::result::Result<T, SinkError>;

/// Minimal Discord REST client: thread creation and message sends, nothing
/// else. Rate limiting and delivery guarantees stay Discord's problem.
pub struct DiscordClient {
    base_url: String,
    token: String,
    client: Client,
}

impl DiscordClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(token, API_BASE_URL)
    }

    /// Test hook: point the client at a stand-in server.
    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            client: Client::new(),
        }
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "POST");
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bot {}", self.token))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SinkError::ApiError(status, body));
        }

        response
            .json()
            .await
            .map_err(|e| SinkError::DecodeFailed(e.to_string()))
    }

    /// Start a thread in a forum channel; returns the new thread id.
    pub async fn create_forum_thread(
        &self,
        forum_channel_id: u64,
        name: &str,
        message: CreateMessage,
    ) -> Result<u64> {
        let body = StartForumThread {
            name: name.to_string(),
            message,
        };
        let channel: ChannelRef = self
            .post_json(&format!("/channels/{}/threads", forum_channel_id), &body)
            .await?;
        channel
            .id
            .parse()
            .map_err(|_| SinkError::DecodeFailed(format!("non-numeric thread id: {}", channel.id)))
    }

    /// Post a message to a channel or thread.
    pub async fn send_message(&self, channel_id: u64, message: &CreateMessage) -> Result<()> {
        let _: serde_json::Value = self
            .post_json(&format!("/channels/{}/messages", channel_id), message)
            .await?;
        Ok(())
    }
}

/// Sink adapter: renders tracker notifications into embeds/messages and
/// owns the forum-vs-fallback-channel destination decision.
pub struct DiscordNotifier {
    client: DiscordClient,
    forum_channel_id: Option<u64>,
    fallback_channel_id: Option<u64>,
}

impl DiscordNotifier {
    pub fn new(
        client: DiscordClient,
        forum_channel_id: Option<u64>,
        fallback_channel_id: Option<u64>,
    ) -> Self {
        Self {
            client,
            forum_channel_id,
            fallback_channel_id,
        }
    }
}

#[async_trait]
impl NotificationSink for DiscordNotifier {
    /// Create the match destination: a fresh forum thread when a forum is
    /// configured, otherwise the plain announcement channel (which then
    /// receives the pre-match embed directly).
    async fn ensure_destination(&self, snapshot: &MatchSnapshot) -> anyhow::Result<u64> {
        let opener = CreateMessage {
            content: Some(embeds::THREAD_OPENER.to_string()),
            embeds: vec![embeds::prematch(snapshot)],
        };

        if let Some(forum_channel_id) = self.forum_channel_id {
            let title = embeds::thread_title(snapshot);
            match self
                .client
                .create_forum_thread(forum_channel_id, &title, opener.clone())
                .await
            {
                Ok(thread_id) => {
                    info!(thread_id, title = %title, "created forum thread");
                    return Ok(thread_id);
                }
                Err(err) => {
                    warn!(error = %err, "forum thread creation failed, using fallback channel");
                }
            }
        }

        let channel_id = self.fallback_channel_id.ok_or(SinkError::NoDestination)?;
        self.client.send_message(channel_id, &opener).await?;
        Ok(channel_id)
    }

    async fn publish(&self, destination: u64, notification: &Notification) -> anyhow::Result<()> {
        let message = embeds::render(notification);
        self.client.send_message(destination, &message).await?;
        Ok(())
    }
}
