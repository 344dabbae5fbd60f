//! Bot configuration: YAML file plus .env overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config file: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Environment variable not found: {0}")]
    EnvVarMissing(String),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Main bot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    #[serde(default)]
    pub discord: DiscordConfig,
    pub provider: ProviderConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Bot token from .env (not in YAML)
    #[serde(skip)]
    pub discord_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DiscordConfig {
    /// Forum channel for per-match threads. When unset, updates go
    /// straight to `channel_id`.
    #[serde(default)]
    pub forum_channel_id: Option<u64>,
    /// Plain announcement channel, also the fallback when thread creation
    /// fails.
    #[serde(default)]
    pub channel_id: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_standings_url")]
    pub standings_url: String,
    /// Provider-side team id; the name is the fallback matcher.
    pub team_id: String,
    pub team_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default = "default_live_interval")]
    pub live_interval_secs: u64,
    #[serde(default = "default_scheduled_interval")]
    pub scheduled_interval_secs: u64,
    #[serde(default = "default_idle_interval")]
    pub idle_interval_secs: u64,
    /// Create the match thread once kickoff is at most this close.
    #[serde(default = "default_thread_window")]
    pub thread_window_hours: i64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            live_interval_secs: default_live_interval(),
            scheduled_interval_secs: default_scheduled_interval(),
            idle_interval_secs: default_idle_interval(),
            thread_window_hours: default_thread_window(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_backoff_secs")]
    pub backoff_secs: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_secs: default_backoff_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://site.api.espn.com/apis/site/v2/sports/soccer/usa.1".to_string()
}

fn default_standings_url() -> String {
    "https://site.api.espn.com/apis/v2/sports/soccer/usa.1/standings".to_string()
}

fn default_live_interval() -> u64 {
    30
}

fn default_scheduled_interval() -> u64 {
    60
}

fn default_idle_interval() -> u64 {
    300
}

fn default_thread_window() -> i64 {
    24
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_secs() -> f64 {
    1.0
}

fn default_log_level() -> String {
    "info".to_string()
}

impl BotConfig {
    /// Load configuration from YAML file and .env
    pub fn load(config_path: impl AsRef<Path>) -> Result<Self> {
        let yaml_content = std::fs::read_to_string(config_path)?;
        let mut config: BotConfig = serde_yaml::from_str(&yaml_content)?;

        // Load .env file; fine if it doesn't exist
        dotenv::dotenv().ok();

        config.discord_token = std::env::var("DISCORD_BOT_TOKEN")
            .map_err(|_| ConfigError::EnvVarMissing("DISCORD_BOT_TOKEN".to_string()))?;

        // Channel ids can be overridden from the environment
        if let Ok(raw) = std::env::var("FORUM_CHANNEL_ID") {
            config.discord.forum_channel_id = Some(parse_channel_id("FORUM_CHANNEL_ID", &raw)?);
        }
        if let Ok(raw) = std::env::var("CHANNEL_ID") {
            config.discord.channel_id = Some(parse_channel_id("CHANNEL_ID", &raw)?);
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.discord_token.is_empty() {
            return Err(ConfigError::ValidationError(
                "DISCORD_BOT_TOKEN must not be empty".to_string(),
            ));
        }

        if self.discord.forum_channel_id.is_none() && self.discord.channel_id.is_none() {
            return Err(ConfigError::ValidationError(
                "at least one of discord.forum_channel_id or discord.channel_id is required"
                    .to_string(),
            ));
        }

        if self.provider.base_url.is_empty() {
            return Err(ConfigError::ValidationError(
                "provider.base_url cannot be empty".to_string(),
            ));
        }

        if self.provider.team_id.is_empty() && self.provider.team_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "provider.team_id or provider.team_name must be set".to_string(),
            ));
        }

        if self.tracker.live_interval_secs == 0
            || self.tracker.scheduled_interval_secs == 0
            || self.tracker.idle_interval_secs == 0
        {
            return Err(ConfigError::ValidationError(
                "poll intervals must be greater than 0".to_string(),
            ));
        }

        if self.tracker.thread_window_hours <= 0 {
            return Err(ConfigError::ValidationError(
                "thread_window_hours must be greater than 0".to_string(),
            ));
        }

        if self.retry.max_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }

        if self.retry.backoff_secs < 0.0 {
            return Err(ConfigError::ValidationError(
                "retry.backoff_secs must not be negative".to_string(),
            ));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "log_level must be one of: {}",
                valid_levels.join(", ")
            )));
        }

        Ok(())
    }

    /// Log configuration summary
    pub fn log(&self) {
        info!("Configuration loaded:");
        info!("  Team: {} (id {})", self.provider.team_name, self.provider.team_id);
        info!("  Provider URL: {}", self.provider.base_url);
        info!(
            "  Forum channel: {}",
            self.discord
                .forum_channel_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "unset".to_string())
        );
        info!(
            "  Fallback channel: {}",
            self.discord
                .channel_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "unset".to_string())
        );
        info!(
            "  Intervals: live {}s, scheduled {}s, idle {}s",
            self.tracker.live_interval_secs,
            self.tracker.scheduled_interval_secs,
            self.tracker.idle_interval_secs
        );
        info!("  Thread window: {}h", self.tracker.thread_window_hours);
        info!("  Log level: {}", self.log_level);
    }
}

fn parse_channel_id(var: &str, raw: &str) -> Result<u64> {
    raw.parse()
        .map_err(|_| ConfigError::ValidationError(format!("{} must be a numeric channel id", var)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> BotConfig {
        BotConfig {
            discord: DiscordConfig {
                forum_channel_id: Some(111),
                channel_id: Some(222),
            },
            provider: ProviderConfig {
                base_url: default_base_url(),
                standings_url: default_standings_url(),
                team_id: "9727".to_string(),
                team_name: "Vancouver Whitecaps".to_string(),
            },
            tracker: TrackerConfig::default(),
            retry: RetryConfig::default(),
            log_level: "info".to_string(),
            discord_token: "test-token".to_string(),
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_missing_token_rejected() {
        let mut config = valid_config();
        config.discord_token = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_requires_some_destination() {
        let mut config = valid_config();
        config.discord.forum_channel_id = None;
        config.discord.channel_id = None;
        assert!(config.validate().is_err());

        config.discord.channel_id = Some(222);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut config = valid_config();
        config.tracker.live_interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_log_level_rejected() {
        let mut config = valid_config();
        config.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_retry_attempts_rejected() {
        let mut config = valid_config();
        config.retry.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_yaml_defaults() {
        let yaml = r#"
discord:
  channel_id: 123456789
provider:
  team_id: "9727"
  team_name: "Vancouver Whitecaps"
"#;
        let config: BotConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.tracker.live_interval_secs, 30);
        assert_eq!(config.tracker.scheduled_interval_secs, 60);
        assert_eq!(config.tracker.idle_interval_secs, 300);
        assert_eq!(config.tracker.thread_window_hours, 24);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.log_level, "info");
        assert!(config.provider.base_url.contains("espn.com"));
    }
}
