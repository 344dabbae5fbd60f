pub mod client;
pub mod config;
pub mod logging;

pub use client::discord::{DiscordClient, DiscordNotifier, SinkError};
pub use client::espn::{EspnClient, ProviderError};
pub use config::{BotConfig, ConfigError};
pub use logging::{init_tracing, init_tracing_with_level};
