//! Discord REST payload types — the small subset the bot sends and reads.

use serde::{Deserialize, Serialize};

pub const COLOR_BLURPLE: u32 = 0x5865F2;
pub const COLOR_GREEN: u32 = 0x57F287;
pub const COLOR_YELLOW: u32 = 0xFFCC00;
pub const COLOR_RED: u32 = 0xFF0000;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    pub fn new(name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbedFooter {
    pub text: String,
}

/// Body for `POST /channels/{id}/messages`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
}

impl CreateMessage {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            embeds: Vec::new(),
        }
    }

    pub fn embed(embed: Embed) -> Self {
        Self {
            content: None,
            embeds: vec![embed],
        }
    }
}

/// Body for `POST /channels/{id}/threads` against a forum channel.
#[derive(Debug, Serialize)]
pub struct StartForumThread {
    pub name: String,
    pub message: CreateMessage,
}

/// The slice of a channel/thread object the bot cares about. Discord
/// serializes snowflakes as strings.
#[derive(Debug, Deserialize)]
pub struct ChannelRef {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_serialization_omits_empty_parts() {
        let message = CreateMessage::text("hello");
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json, serde_json::json!({"content": "hello"}));

        let message = CreateMessage::embed(Embed {
            title: Some("Pre-match".to_string()),
            color: Some(COLOR_BLURPLE),
            ..Default::default()
        });
        let json = serde_json::to_value(&message).unwrap();
        assert!(json.get("content").is_none());
        assert_eq!(json["embeds"][0]["title"], "Pre-match");
    }

    #[test]
    fn test_forum_thread_body_shape() {
        let body = StartForumThread {
            name: "Away @ Home - February 18, 2026".to_string(),
            message: CreateMessage::text("Match day!"),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["name"], "Away @ Home - February 18, 2026");
        assert_eq!(json["message"]["content"], "Match day!");
    }
}
