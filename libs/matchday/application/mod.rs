pub mod facade;
pub mod service;
pub mod tracker;

pub use facade::{BotApp, MatchdayApp};
pub use service::{FixtureProvider, LiveMatchService, NotificationSink, PollIntervals};
pub use tracker::{MatchTracker, Notification, PollCadence, TickReport};
