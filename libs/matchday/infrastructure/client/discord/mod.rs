//! Discord notification-sink adapter: REST client, payload types, and the
//! embed builders that render tracker notifications.

mod client;
pub mod embeds;
pub mod types;

pub use client::{DiscordClient, DiscordNotifier, SinkError};
