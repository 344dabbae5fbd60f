//! ESPN public API response shapes.
//!
//! Only the fields the bot reads are modeled; everything else in the
//! payloads is ignored. Missing fields default instead of failing, because
//! the feed routinely omits them.

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct Scoreboard {
    #[serde(default)]
    pub events: Vec<ScoreboardEvent>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ScoreboardEvent {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub competitions: Vec<Competition>,
    #[serde(default)]
    pub status: Option<Status>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Competition {
    #[serde(default)]
    pub competitors: Vec<Competitor>,
    #[serde(default)]
    pub venue: Option<Venue>,
    #[serde(default)]
    pub status: Option<Status>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Venue {
    #[serde(rename = "fullName", default)]
    pub full_name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Competitor {
    #[serde(default)]
    pub team: Option<Team>,
    #[serde(rename = "homeAway", default)]
    pub home_away: String,
    #[serde(default)]
    pub score: Option<Score>,
}

/// The scoreboard endpoint reports scores as plain strings, the schedule
/// endpoint as objects. Both shapes appear in the wild.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Score {
    Text(String),
    Detailed {
        #[serde(rename = "displayValue", default)]
        display_value: Option<String>,
        #[serde(default)]
        value: Option<f64>,
    },
}

impl Score {
    pub fn as_goals(&self) -> Option<u32> {
        match self {
            Score::Text(text) => text.trim().parse().ok(),
            Score::Detailed {
                display_value,
                value,
            } => display_value
                .as_deref()
                .and_then(|v| v.trim().parse().ok())
                .or_else(|| value.map(|v| v as u32)),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Team {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "displayName", default)]
    pub display_name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Status {
    #[serde(rename = "displayClock", default)]
    pub display_clock: String,
    #[serde(rename = "type", default)]
    pub status_type: Option<StatusType>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StatusType {
    /// Machine code, e.g. `STATUS_FIRST_HALF`.
    #[serde(default)]
    pub name: String,
    /// Coarse bucket: `pre`, `in`, `post`.
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub detail: String,
    #[serde(rename = "shortDetail", default)]
    pub short_detail: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Summary {
    #[serde(rename = "keyEvents", default)]
    pub key_events: Vec<Play>,
    #[serde(default)]
    pub plays: Vec<Play>,
    #[serde(default)]
    pub commentary: Vec<CommentaryItem>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Play {
    #[serde(rename = "type", default)]
    pub play_type: Option<PlayType>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub team: Option<Team>,
    #[serde(default)]
    pub clock: Option<Clock>,
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(rename = "athletesIn", default)]
    pub athletes_in: Vec<Athlete>,
    #[serde(rename = "athletesOut", default)]
    pub athletes_out: Vec<Athlete>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlayType {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Clock {
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(rename = "displayValue", default)]
    pub display_value: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Participant {
    #[serde(default)]
    pub athlete: Option<Athlete>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Athlete {
    #[serde(rename = "displayName", default)]
    pub display_name: String,
    #[serde(rename = "shortName", default)]
    pub short_name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CommentaryItem {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub time: Option<CommentaryTime>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CommentaryTime {
    #[serde(rename = "displayValue", default)]
    pub display_value: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct StandingsResponse {
    #[serde(default)]
    pub children: Vec<StandingsGroup>,
    #[serde(default)]
    pub standings: Option<StandingsTable>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StandingsGroup {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub standings: Option<StandingsTable>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StandingsTable {
    #[serde(default)]
    pub entries: Vec<StandingsRow>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StandingsRow {
    #[serde(default)]
    pub team: Option<Team>,
    #[serde(default)]
    pub stats: Vec<StandingsStat>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StandingsStat {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_parses_both_wire_shapes() {
        let plain: Score = serde_json::from_str("\"2\"").unwrap();
        assert_eq!(plain.as_goals(), Some(2));

        let detailed: Score =
            serde_json::from_str("{\"value\": 2.0, \"displayValue\": \"2\"}").unwrap();
        assert_eq!(detailed.as_goals(), Some(2));

        let value_only: Score = serde_json::from_str("{\"value\": 3.0}").unwrap();
        assert_eq!(value_only.as_goals(), Some(3));

        let garbage: Score = serde_json::from_str("\"n/a\"").unwrap();
        assert_eq!(garbage.as_goals(), None);
    }

    #[test]
    fn test_scoreboard_tolerates_missing_fields() {
        let scoreboard: Scoreboard = serde_json::from_str("{}").unwrap();
        assert!(scoreboard.events.is_empty());

        let event: ScoreboardEvent =
            serde_json::from_str("{\"id\": \"401\", \"competitions\": [{}]}").unwrap();
        assert_eq!(event.id, "401");
        assert!(event.competitions[0].competitors.is_empty());
    }
}
