//! Per-match announcement state machine.
//!
//! Holds everything the bot has already told users about the fixture it is
//! tracking, and decides on each poll which updates to surface. All methods
//! are synchronous; network side effects belong to the service driving it.

use std::collections::{HashMap, HashSet};

use chrono::{Duration, Utc};
use tracing::{debug, info};

use crate::domain::{DiscreteEvent, MatchPhase, MatchSnapshot};

/// A logical update the tracker decided to surface. Rendering and delivery
/// are the notification sink's problem.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    Kickoff(MatchSnapshot),
    /// Score pair changed (covers every goal, including catch-up after a
    /// mid-match restart; two goals between polls collapse into one update).
    Score(MatchSnapshot),
    Event(DiscreteEvent),
    Halftime(MatchSnapshot),
    FullTime(MatchSnapshot),
}

/// Poll cadence requested for the sleep after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollCadence {
    Idle,
    Scheduled,
    Live,
}

/// Everything one tick decided.
#[derive(Debug)]
pub struct TickReport {
    pub notifications: Vec<Notification>,
    pub cadence: PollCadence,
    pub fixture_changed: bool,
}

pub struct MatchTracker {
    current_fixture_id: Option<u64>,
    /// Last announced score pair; `None` until the first live observation.
    last_score: Option<(u32, u32)>,
    announced_event_keys: HashSet<String>,
    /// Destination for the fixture currently tracked.
    thread_id: Option<u64>,
    /// Every destination created this process lifetime, by fixture id.
    /// Survives fixture changes so a fixture seen again never gets a
    /// second thread; the stored handle is reattached instead.
    created_threads: HashMap<u64, u64>,
    kickoff_posted: bool,
    halftime_posted: bool,
    fulltime_posted: bool,
    thread_window: Duration,
}

impl MatchTracker {
    pub fn new(thread_window_hours: i64) -> Self {
        Self {
            current_fixture_id: None,
            last_score: None,
            announced_event_keys: HashSet::new(),
            thread_id: None,
            created_threads: HashMap::new(),
            kickoff_posted: false,
            halftime_posted: false,
            fulltime_posted: false,
            thread_window: Duration::hours(thread_window_hours),
        }
    }

    pub fn current_fixture_id(&self) -> Option<u64> {
        self.current_fixture_id
    }

    /// Destination handle for the tracked fixture, when one is attached.
    pub fn destination(&self) -> Option<u64> {
        self.thread_id
    }

    /// Record a freshly created (or recovered) destination for a fixture.
    pub fn attach_destination(&mut self, fixture_id: u64, destination: u64) {
        self.created_threads.insert(fixture_id, destination);
        if self.current_fixture_id == Some(fixture_id) {
            self.thread_id = Some(destination);
        }
    }

    /// Destination policy: never twice for the same fixture; immediately for
    /// anything already underway or finished (catch-up after a restart);
    /// for scheduled fixtures only once kickoff is inside the window.
    pub fn should_create_thread(&self, snapshot: &MatchSnapshot) -> bool {
        if self.created_threads.contains_key(&snapshot.fixture_id) {
            return false;
        }
        match snapshot.phase {
            MatchPhase::InProgress | MatchPhase::Halftime | MatchPhase::Finished => true,
            MatchPhase::Scheduled => match snapshot.starts_at {
                Some(starts_at) => starts_at - Utc::now() <= self.thread_window,
                None => false,
            },
        }
    }

    /// Fold one poll into the state and report what to announce.
    ///
    /// Announcement state (flags, keys, score) is recorded here, before any
    /// send is attempted, which is what makes every emission at-most-once
    /// per process lifetime.
    pub fn apply(&mut self, poll: Option<&MatchSnapshot>, events: &[DiscreteEvent]) -> TickReport {
        let Some(snapshot) = poll else {
            if let Some(fixture_id) = self.current_fixture_id.take() {
                info!(fixture_id, "tracked fixture left the feed, returning to idle");
                self.clear_match_state();
            }
            return TickReport {
                notifications: Vec::new(),
                cadence: PollCadence::Idle,
                fixture_changed: false,
            };
        };

        let fixture_changed = self.current_fixture_id != Some(snapshot.fixture_id);
        if fixture_changed {
            self.clear_match_state();
            self.current_fixture_id = Some(snapshot.fixture_id);
            // Reuse a destination created for this fixture earlier in the
            // process lifetime instead of opening a duplicate.
            self.thread_id = self.created_threads.get(&snapshot.fixture_id).copied();
            info!(
                fixture_id = snapshot.fixture_id,
                home = %snapshot.home_name,
                away = %snapshot.away_name,
                phase = ?snapshot.phase,
                "now tracking fixture"
            );
        }

        let mut notifications = Vec::new();

        if snapshot.phase == MatchPhase::InProgress && !self.kickoff_posted {
            self.kickoff_posted = true;
            notifications.push(Notification::Kickoff(snapshot.clone()));
        }

        if snapshot.phase.is_live() {
            if let Some(score) = snapshot.score_pair() {
                if self.last_score != Some(score) {
                    self.last_score = Some(score);
                    notifications.push(Notification::Score(snapshot.clone()));
                }
            }
        }

        for event in events {
            let key = event.dedupe_key();
            if self.announced_event_keys.insert(key) {
                notifications.push(Notification::Event(event.clone()));
            } else {
                debug!(key = %event.dedupe_key(), "event already announced, skipping");
            }
        }

        if snapshot.phase == MatchPhase::Halftime && !self.halftime_posted {
            self.halftime_posted = true;
            notifications.push(Notification::Halftime(snapshot.clone()));
        }

        if snapshot.phase == MatchPhase::Finished && !self.fulltime_posted {
            self.fulltime_posted = true;
            notifications.push(Notification::FullTime(snapshot.clone()));
        }

        let cadence = match snapshot.phase {
            MatchPhase::InProgress | MatchPhase::Halftime => PollCadence::Live,
            MatchPhase::Scheduled => PollCadence::Scheduled,
            MatchPhase::Finished => PollCadence::Idle,
        };

        TickReport {
            notifications,
            cadence,
            fixture_changed,
        }
    }

    /// Reset every per-match field. `created_threads` deliberately survives.
    fn clear_match_state(&mut self) {
        self.last_score = None;
        self.announced_event_keys.clear();
        self.thread_id = None;
        self.kickoff_posted = false;
        self.halftime_posted = false;
        self.fulltime_posted = false;
    }
}
