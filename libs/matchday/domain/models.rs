use chrono::{DateTime, Utc};

/// Coarse lifecycle bucket for a fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchPhase {
    Scheduled,
    InProgress,
    Halftime,
    Finished,
}

impl MatchPhase {
    /// Map an ESPN `status.type` to a phase.
    ///
    /// `name` is the machine status code (e.g. `STATUS_HALFTIME`); `state`
    /// is the coarse `pre`/`in`/`post` bucket the API also carries, used as
    /// fallback for codes not in the table.
    pub fn from_espn_status(name: &str, state: &str) -> Self {
        match name {
            "STATUS_SCHEDULED" | "STATUS_POSTPONED" | "STATUS_CANCELED" | "STATUS_DELAYED" => {
                MatchPhase::Scheduled
            }
            "STATUS_FIRST_HALF"
            | "STATUS_SECOND_HALF"
            | "STATUS_IN_PROGRESS"
            | "STATUS_OVERTIME"
            | "STATUS_SHOOTOUT" => MatchPhase::InProgress,
            "STATUS_HALFTIME" => MatchPhase::Halftime,
            "STATUS_FULL_TIME" | "STATUS_FINAL" | "STATUS_FINAL_PEN" => MatchPhase::Finished,
            _ => match state {
                "in" => MatchPhase::InProgress,
                "post" => MatchPhase::Finished,
                _ => MatchPhase::Scheduled,
            },
        }
    }

    /// True while the clock can still move (goals can still be scored).
    pub fn is_live(&self) -> bool {
        matches!(self, MatchPhase::InProgress | MatchPhase::Halftime)
    }
}

/// One poll's view of a fixture.
///
/// `fixture_id` is the join key across polls; every other field may change
/// between polls for the same id.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchSnapshot {
    pub fixture_id: u64,
    pub home_name: String,
    pub away_name: String,
    pub home_goals: Option<u32>,
    pub away_goals: Option<u32>,
    pub elapsed_minutes: Option<u32>,
    pub phase: MatchPhase,
    pub starts_at: Option<DateTime<Utc>>,
    /// Long status text from the provider ("Halftime", "Full Time", ...).
    pub status_detail: String,
    pub venue: String,
}

impl MatchSnapshot {
    /// Both goal counts, when the provider reports them.
    pub fn score_pair(&self) -> Option<(u32, u32)> {
        Some((self.home_goals?, self.away_goals?))
    }
}

/// One row of the league table. Display only.
#[derive(Debug, Clone, PartialEq)]
pub struct StandingsEntry {
    pub rank: u32,
    pub team_name: String,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i32,
    pub points: u32,
}
