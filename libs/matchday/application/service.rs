//! Polling loop: drives the tracker against the provider and sink ports.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use super::tracker::{MatchTracker, Notification, PollCadence, TickReport};
use crate::domain::{DiscreteEvent, MatchPhase, MatchSnapshot};
use crate::utils::{RetryPolicy, Shutdown};

/// Data-provider port: one fixture snapshot per poll plus the per-match
/// detail feed. Implementations must treat their own transient failures as
/// errors; the service decides how to recover.
#[async_trait]
pub trait FixtureProvider: Send + Sync {
    async fn current_or_next_fixture(&self) -> anyhow::Result<Option<MatchSnapshot>>;

    /// Detail events for a live fixture. Only called while in progress.
    async fn detail_events(&self, snapshot: &MatchSnapshot) -> anyhow::Result<Vec<DiscreteEvent>>;
}

/// Notification-sink port. `publish` is fire-and-forget from the tracker's
/// perspective: failures are logged by the service and never retried.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Create (or recover) the destination updates for this fixture go to.
    async fn ensure_destination(&self, snapshot: &MatchSnapshot) -> anyhow::Result<u64>;

    async fn publish(&self, destination: u64, notification: &Notification) -> anyhow::Result<()>;
}

/// Sleep intervals per poll cadence.
#[derive(Debug, Clone)]
pub struct PollIntervals {
    pub live: Duration,
    pub scheduled: Duration,
    pub idle: Duration,
}

impl PollIntervals {
    fn for_cadence(&self, cadence: PollCadence) -> Duration {
        match cadence {
            PollCadence::Live => self.live,
            PollCadence::Scheduled => self.scheduled,
            PollCadence::Idle => self.idle,
        }
    }
}

/// One polling worker. Owns no state of its own; the tracker is shared with
/// the control surface so announcement history survives stop/start.
pub struct LiveMatchService<P, S> {
    provider: Arc<P>,
    sink: Arc<S>,
    tracker: Arc<Mutex<MatchTracker>>,
    intervals: PollIntervals,
    retry: RetryPolicy,
}

impl<P, S> LiveMatchService<P, S>
where
    P: FixtureProvider,
    S: NotificationSink,
{
    pub fn new(
        provider: Arc<P>,
        sink: Arc<S>,
        tracker: Arc<Mutex<MatchTracker>>,
        intervals: PollIntervals,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            provider,
            sink,
            tracker,
            intervals,
            retry,
        }
    }

    /// One poll cycle. Never fails: an errored tick is logged and mapped to
    /// the idle interval so the loop keeps going.
    pub async fn tick(&self) -> Duration {
        match self.poll_once().await {
            Ok(cadence) => self.intervals.for_cadence(cadence),
            Err(err) => {
                error!(error = %err, "tick failed, backing off to idle cadence");
                self.intervals.idle
            }
        }
    }

    async fn poll_once(&self) -> anyhow::Result<PollCadence> {
        let snapshot = self
            .retry
            .run(|| self.provider.current_or_next_fixture())
            .await?;

        let events = match &snapshot {
            Some(s) if s.phase == MatchPhase::InProgress => {
                match self.provider.detail_events(s).await {
                    Ok(events) => events,
                    Err(err) => {
                        // A missing detail payload means no new events this
                        // poll, not a failed tick.
                        warn!(error = %err, "detail fetch failed, no events this poll");
                        Vec::new()
                    }
                }
            }
            _ => Vec::new(),
        };

        let (report, wants_thread) = {
            let mut tracker = self.tracker.lock();
            let report = tracker.apply(snapshot.as_ref(), &events);
            let wants_thread = match &snapshot {
                Some(s) => tracker.destination().is_none() && tracker.should_create_thread(s),
                None => false,
            };
            (report, wants_thread)
        };

        if let Some(s) = snapshot.as_ref().filter(|_| wants_thread) {
            // Checked every poll until it succeeds or the policy says no;
            // a far-future fixture simply fails the window check for now.
            match self.sink.ensure_destination(s).await {
                Ok(destination) => {
                    info!(fixture_id = s.fixture_id, destination, "destination ready");
                    self.tracker.lock().attach_destination(s.fixture_id, destination);
                }
                Err(err) => {
                    warn!(error = %err, "destination setup failed, will retry next poll");
                }
            }
        }

        self.dispatch(&report).await;
        Ok(report.cadence)
    }

    /// Send everything the tracker decided to announce. The announcement
    /// state is already recorded, so a failed send is dropped, not retried.
    async fn dispatch(&self, report: &TickReport) {
        if report.notifications.is_empty() {
            return;
        }
        let Some(destination) = self.tracker.lock().destination() else {
            debug!(
                count = report.notifications.len(),
                "no destination attached, dropping notifications"
            );
            return;
        };
        for notification in &report.notifications {
            if let Err(err) = self.sink.publish(destination, notification).await {
                warn!(error = %err, "notification send failed, not retried");
            }
        }
    }

    /// Run until `shutdown` triggers. Tick failures never end the loop;
    /// cancellation always does.
    pub async fn run(self, shutdown: Shutdown) {
        info!("live match loop running");
        while !shutdown.is_triggered() {
            let interval = self.tick().await;
            shutdown.sleep(interval).await;
        }
        info!("live match loop stopped");
    }
}
