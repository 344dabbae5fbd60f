//! Discrete in-match events extracted from the provider's detail feed.
//!
//! Goals are deliberately absent here: goal announcements are inferred from
//! score transitions between snapshots, because the score numbers are more
//! reliable than the provider's goal-event feed.

/// Card colors the provider distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
    Yellow,
    Red,
}

impl CardKind {
    pub fn label(&self) -> &'static str {
        match self {
            CardKind::Yellow => "Yellow Card",
            CardKind::Red => "Red Card",
        }
    }
}

/// One discrete occurrence in a match, constructed fresh each poll and
/// discarded after dedupe-key comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum DiscreteEvent {
    Card {
        fixture_id: u64,
        elapsed_minutes: Option<u32>,
        team_name: String,
        player_name: String,
        kind: CardKind,
    },
    Substitution {
        fixture_id: u64,
        elapsed_minutes: Option<u32>,
        team_name: String,
        player_in: String,
        player_out: String,
    },
}

impl DiscreteEvent {
    pub fn fixture_id(&self) -> u64 {
        match self {
            DiscreteEvent::Card { fixture_id, .. } => *fixture_id,
            DiscreteEvent::Substitution { fixture_id, .. } => *fixture_id,
        }
    }

    pub fn elapsed_minutes(&self) -> Option<u32> {
        match self {
            DiscreteEvent::Card {
                elapsed_minutes, ..
            } => *elapsed_minutes,
            DiscreteEvent::Substitution {
                elapsed_minutes, ..
            } => *elapsed_minutes,
        }
    }

    /// Deterministic identity for deduplication.
    ///
    /// Two events with equal keys are the same real-world occurrence and
    /// must be announced at most once.
    pub fn dedupe_key(&self) -> String {
        match self {
            DiscreteEvent::Card {
                fixture_id,
                elapsed_minutes,
                team_name,
                player_name,
                kind,
            } => format!(
                "card:{}:{}:{}:{}:{}",
                fixture_id,
                fmt_minute(*elapsed_minutes),
                team_name,
                player_name,
                kind.label()
            ),
            DiscreteEvent::Substitution {
                fixture_id,
                elapsed_minutes,
                team_name,
                player_in,
                player_out,
            } => format!(
                "sub:{}:{}:{}:{}:{}",
                fixture_id,
                fmt_minute(*elapsed_minutes),
                team_name,
                player_in,
                player_out
            ),
        }
    }
}

fn fmt_minute(minute: Option<u32>) -> String {
    match minute {
        Some(m) => m.to_string(),
        None => "-".to_string(),
    }
}
