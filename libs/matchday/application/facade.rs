//! Application facade.
//!
//! Owns the tracker and exposes the control surface the hosting process
//! uses: start/stop for the polling loop and ad-hoc status queries. Safe to
//! call while the loop task is mid-tick.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::info;

use super::service::{FixtureProvider, LiveMatchService, NotificationSink, PollIntervals};
use super::tracker::MatchTracker;
use crate::domain::{MatchSnapshot, StandingsEntry};
use crate::infrastructure::client::discord::{DiscordClient, DiscordNotifier};
use crate::infrastructure::client::espn::EspnClient;
use crate::infrastructure::config::BotConfig;
use crate::utils::{RetryPolicy, Shutdown};

struct LoopTask {
    handle: JoinHandle<()>,
    shutdown: Shutdown,
}

pub struct BotApp<P, S> {
    provider: Arc<P>,
    sink: Arc<S>,
    tracker: Arc<Mutex<MatchTracker>>,
    intervals: PollIntervals,
    retry: RetryPolicy,
    running: Mutex<Option<LoopTask>>,
}

impl<P, S> BotApp<P, S>
where
    P: FixtureProvider + 'static,
    S: NotificationSink + 'static,
{
    pub fn new(
        provider: Arc<P>,
        sink: Arc<S>,
        intervals: PollIntervals,
        retry: RetryPolicy,
        thread_window_hours: i64,
    ) -> Self {
        Self {
            provider,
            sink,
            tracker: Arc::new(Mutex::new(MatchTracker::new(thread_window_hours))),
            intervals,
            retry,
            running: Mutex::new(None),
        }
    }

    /// Spawn the polling loop. No-op (returns false) when a loop is already
    /// running. The tracker is shared, so announcement history survives a
    /// stop/start cycle.
    pub fn start(&self) -> bool {
        let mut slot = self.running.lock();
        if let Some(task) = slot.as_ref() {
            if !task.handle.is_finished() {
                return false;
            }
        }

        let service = LiveMatchService::new(
            Arc::clone(&self.provider),
            Arc::clone(&self.sink),
            Arc::clone(&self.tracker),
            self.intervals.clone(),
            self.retry.clone(),
        );
        let shutdown = Shutdown::new();
        let handle = tokio::spawn(service.run(shutdown.clone()));
        *slot = Some(LoopTask { handle, shutdown });
        info!("live update loop started");
        true
    }

    /// Cancel the running loop and clear the handle. Returns false when no
    /// loop was running.
    pub fn stop(&self) -> bool {
        match self.running.lock().take() {
            Some(task) => {
                task.shutdown.trigger();
                info!("live update loop stopped");
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
            .lock()
            .as_ref()
            .map(|task| !task.handle.is_finished())
            .unwrap_or(false)
    }

    /// Current snapshot straight from the provider, for status queries.
    pub async fn status(&self) -> anyhow::Result<Option<MatchSnapshot>> {
        self.provider.current_or_next_fixture().await
    }
}

/// The production wiring: ESPN provider, Discord sink.
pub type MatchdayApp = BotApp<EspnClient, DiscordNotifier>;

impl MatchdayApp {
    /// Wire the app from loaded configuration.
    pub fn from_config(config: &BotConfig) -> Self {
        let provider = Arc::new(EspnClient::new(&config.provider));
        let client = DiscordClient::new(&config.discord_token);
        let sink = Arc::new(DiscordNotifier::new(
            client,
            config.discord.forum_channel_id,
            config.discord.channel_id,
        ));
        let intervals = PollIntervals {
            live: Duration::from_secs(config.tracker.live_interval_secs),
            scheduled: Duration::from_secs(config.tracker.scheduled_interval_secs),
            idle: Duration::from_secs(config.tracker.idle_interval_secs),
        };
        let retry = RetryPolicy::new(
            config.retry.max_attempts,
            Duration::from_secs_f64(config.retry.backoff_secs),
        );
        BotApp::new(
            provider,
            sink,
            intervals,
            retry,
            config.tracker.thread_window_hours,
        )
    }

    /// Next scheduled fixtures for the configured team. Display only.
    pub async fn upcoming(&self) -> anyhow::Result<Vec<MatchSnapshot>> {
        Ok(self.provider.upcoming_fixtures().await?)
    }

    /// Current league table. Display only.
    pub async fn standings(&self) -> anyhow::Result<Vec<StandingsEntry>> {
        Ok(self.provider.standings().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct EmptyProvider;

    #[async_trait]
    impl FixtureProvider for EmptyProvider {
        async fn current_or_next_fixture(&self) -> anyhow::Result<Option<MatchSnapshot>> {
            Ok(None)
        }

        async fn detail_events(
            &self,
            _snapshot: &MatchSnapshot,
        ) -> anyhow::Result<Vec<crate::domain::DiscreteEvent>> {
            Ok(Vec::new())
        }
    }

    struct NullSink;

    #[async_trait]
    impl NotificationSink for NullSink {
        async fn ensure_destination(&self, _snapshot: &MatchSnapshot) -> anyhow::Result<u64> {
            Ok(1)
        }

        async fn publish(
            &self,
            _destination: u64,
            _notification: &super::super::tracker::Notification,
        ) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn test_app() -> BotApp<EmptyProvider, NullSink> {
        BotApp::new(
            Arc::new(EmptyProvider),
            Arc::new(NullSink),
            PollIntervals {
                live: Duration::from_secs(30),
                scheduled: Duration::from_secs(60),
                idle: Duration::from_secs(300),
            },
            RetryPolicy::new(1, Duration::ZERO),
            24,
        )
    }

    #[tokio::test]
    async fn test_start_is_noop_while_running() {
        let app = test_app();
        assert!(app.start());
        assert!(app.is_running());
        assert!(!app.start());
        app.stop();
    }

    #[tokio::test]
    async fn test_stop_clears_handle() {
        let app = test_app();
        app.start();
        assert!(app.stop());
        assert!(!app.is_running());
        assert!(!app.stop());
    }

    #[tokio::test]
    async fn test_restart_after_stop() {
        let app = test_app();
        assert!(app.start());
        assert!(app.stop());
        assert!(app.start());
        app.stop();
    }

    #[tokio::test]
    async fn test_status_queries_provider() {
        let app = test_app();
        let status = app.status().await.unwrap();
        assert!(status.is_none());
    }
}
