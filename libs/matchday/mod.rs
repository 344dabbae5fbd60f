//! Matchday Notification Bot
//!
//! Polls a public sports-data API for one team's fixtures and relays live
//! match updates (goals, cards, substitutions, kickoff, halftime, full
//! time) to Discord.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod utils;

// Re-export commonly used items
pub use application::{
    BotApp, FixtureProvider, LiveMatchService, MatchTracker, MatchdayApp, Notification,
    NotificationSink, PollCadence, PollIntervals, TickReport,
};
pub use domain::{CardKind, DiscreteEvent, MatchPhase, MatchSnapshot, StandingsEntry};
pub use infrastructure::{
    init_tracing, init_tracing_with_level, BotConfig, ConfigError, DiscordClient, DiscordNotifier,
    EspnClient, ProviderError, SinkError,
};
pub use utils::{Heartbeat, RetryPolicy, Shutdown};
