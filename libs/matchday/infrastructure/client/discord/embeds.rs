//! Embed and message builders for everything the bot posts.

use chrono::{DateTime, Utc};

use super::types::{
    CreateMessage, Embed, EmbedField, COLOR_BLURPLE, COLOR_GREEN, COLOR_RED, COLOR_YELLOW,
};
use crate::application::tracker::Notification;
use crate::domain::{CardKind, DiscreteEvent, MatchSnapshot, StandingsEntry};

pub const THREAD_OPENER: &str = "Match day! Drop your predictions below.";

fn minute_label(minute: Option<u32>) -> String {
    match minute {
        Some(m) => format!("{}'", m),
        None => "-".to_string(),
    }
}

fn kickoff_date(starts_at: Option<DateTime<Utc>>) -> String {
    match starts_at {
        Some(at) => at.format("%B %d, %Y").to_string(),
        None => "TBD".to_string(),
    }
}

/// Forum thread title: "Away @ Home - February 18, 2026".
pub fn thread_title(snapshot: &MatchSnapshot) -> String {
    format!(
        "{} @ {} - {}",
        snapshot.away_name,
        snapshot.home_name,
        kickoff_date(snapshot.starts_at)
    )
}

pub fn prematch(snapshot: &MatchSnapshot) -> Embed {
    let mut fields = vec![EmbedField::new(
        "Fixture",
        format!("{} vs {}", snapshot.home_name, snapshot.away_name),
        false,
    )];
    if let Some(starts_at) = snapshot.starts_at {
        fields.push(EmbedField::new(
            "Kickoff (UTC)",
            starts_at.format("%Y-%m-%d %H:%M").to_string(),
            true,
        ));
    }
    if !snapshot.venue.is_empty() {
        fields.push(EmbedField::new("Venue", snapshot.venue.clone(), true));
    }
    let status = if snapshot.status_detail.is_empty() {
        "Not started".to_string()
    } else {
        snapshot.status_detail.clone()
    };
    fields.push(EmbedField::new("Status", status, true));

    Embed {
        title: Some("Pre-match".to_string()),
        color: Some(COLOR_BLURPLE),
        fields,
        ..Default::default()
    }
}

pub fn kickoff(snapshot: &MatchSnapshot) -> CreateMessage {
    CreateMessage::text(format!(
        "Kickoff: {} vs {} is underway!",
        snapshot.home_name, snapshot.away_name
    ))
}

pub fn score_update(snapshot: &MatchSnapshot) -> Embed {
    let (home_goals, away_goals) = snapshot.score_pair().unwrap_or((0, 0));
    Embed {
        title: Some("Live Score Update".to_string()),
        description: Some(format!(
            "**{} {} - {} {}**",
            snapshot.home_name, home_goals, away_goals, snapshot.away_name
        )),
        color: Some(COLOR_GREEN),
        fields: vec![
            EmbedField::new("Minute", minute_label(snapshot.elapsed_minutes), true),
            EmbedField::new("Status", snapshot.status_detail.clone(), true),
        ],
        ..Default::default()
    }
}

pub fn card(
    minute: Option<u32>,
    team_name: &str,
    player_name: &str,
    kind: CardKind,
) -> Embed {
    let color = match kind {
        CardKind::Yellow => COLOR_YELLOW,
        CardKind::Red => COLOR_RED,
    };
    Embed {
        title: Some(format!("{} ({})", kind.label(), minute_label(minute))),
        description: Some(format!("**{}** ({})", player_name, team_name)),
        color: Some(color),
        ..Default::default()
    }
}

pub fn substitution(
    minute: Option<u32>,
    team_name: &str,
    player_in: &str,
    player_out: &str,
) -> CreateMessage {
    CreateMessage::text(format!(
        "**Substitution ({})** {}: {} off, {} on",
        minute_label(minute),
        team_name,
        player_out,
        player_in
    ))
}

pub fn halftime(snapshot: &MatchSnapshot) -> Embed {
    let (home_goals, away_goals) = snapshot.score_pair().unwrap_or((0, 0));
    Embed {
        title: Some("Half Time".to_string()),
        description: Some(format!(
            "{} `{}` - `{}` {}",
            snapshot.home_name, home_goals, away_goals, snapshot.away_name
        )),
        color: Some(COLOR_BLURPLE),
        ..Default::default()
    }
}

pub fn fulltime(snapshot: &MatchSnapshot) -> Embed {
    let (home_goals, away_goals) = snapshot.score_pair().unwrap_or((0, 0));
    let status = if snapshot.status_detail.is_empty() {
        "Full Time".to_string()
    } else {
        snapshot.status_detail.clone()
    };
    Embed {
        title: Some("Full Time".to_string()),
        description: Some(format!(
            "**{} {} - {} {}** ({})",
            snapshot.home_name, home_goals, away_goals, snapshot.away_name, status
        )),
        color: Some(COLOR_GREEN),
        ..Default::default()
    }
}

/// Upcoming fixtures, one line each, from the configured team's
/// perspective.
pub fn upcoming(matches: &[MatchSnapshot], team_name: &str) -> Embed {
    let team_lower = team_name.to_lowercase();
    let mut lines = Vec::new();
    for m in matches {
        let at_home = m.home_name.to_lowercase().contains(&team_lower);
        let (opponent, side) = if at_home {
            (&m.away_name, "HOME")
        } else {
            (&m.home_name, "AWAY")
        };
        lines.push(format!(
            "**{}** vs {} ({})",
            kickoff_date(m.starts_at),
            opponent,
            side
        ));
    }
    let description = if lines.is_empty() {
        "No upcoming fixtures found.".to_string()
    } else {
        lines.join("\n")
    };
    Embed {
        title: Some("Upcoming Fixtures".to_string()),
        description: Some(description),
        color: Some(COLOR_BLURPLE),
        ..Default::default()
    }
}

pub fn standings(entries: &[StandingsEntry]) -> Embed {
    let lines: Vec<String> = entries
        .iter()
        .map(|e| {
            format!(
                "`{:>2}.` {} - {} pts ({}W {}D {}L, GD {:+})",
                e.rank, e.team_name, e.points, e.wins, e.draws, e.losses, e.goal_difference
            )
        })
        .collect();
    Embed {
        title: Some("League Standings".to_string()),
        description: Some(if lines.is_empty() {
            "Standings unavailable.".to_string()
        } else {
            lines.join("\n")
        }),
        color: Some(COLOR_BLURPLE),
        ..Default::default()
    }
}

/// Render one tracker notification into a sendable message.
pub fn render(notification: &Notification) -> CreateMessage {
    match notification {
        Notification::Kickoff(snapshot) => kickoff(snapshot),
        Notification::Score(snapshot) => CreateMessage::embed(score_update(snapshot)),
        Notification::Halftime(snapshot) => CreateMessage::embed(halftime(snapshot)),
        Notification::FullTime(snapshot) => CreateMessage::embed(fulltime(snapshot)),
        Notification::Event(DiscreteEvent::Card {
            elapsed_minutes,
            team_name,
            player_name,
            kind,
            ..
        }) => CreateMessage::embed(card(*elapsed_minutes, team_name, player_name, *kind)),
        Notification::Event(DiscreteEvent::Substitution {
            elapsed_minutes,
            team_name,
            player_in,
            player_out,
            ..
        }) => substitution(*elapsed_minutes, team_name, player_in, player_out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MatchPhase;
    use chrono::TimeZone;

    fn snapshot() -> MatchSnapshot {
        MatchSnapshot {
            fixture_id: 1,
            home_name: "Vancouver Whitecaps FC".to_string(),
            away_name: "Seattle Sounders FC".to_string(),
            home_goals: Some(1),
            away_goals: Some(0),
            elapsed_minutes: Some(45),
            phase: MatchPhase::Halftime,
            starts_at: Some(Utc.with_ymd_and_hms(2026, 2, 18, 20, 0, 0).unwrap()),
            status_detail: "Halftime".to_string(),
            venue: "BC Place".to_string(),
        }
    }

    #[test]
    fn test_thread_title_away_at_home() {
        assert_eq!(
            thread_title(&snapshot()),
            "Seattle Sounders FC @ Vancouver Whitecaps FC - February 18, 2026"
        );
    }

    #[test]
    fn test_thread_title_without_kickoff_time() {
        let mut s = snapshot();
        s.starts_at = None;
        assert!(thread_title(&s).ends_with("- TBD"));
    }

    #[test]
    fn test_prematch_fields() {
        let embed = prematch(&snapshot());
        assert_eq!(embed.title.as_deref(), Some("Pre-match"));
        assert_eq!(embed.color, Some(COLOR_BLURPLE));
        assert!(embed
            .fields
            .iter()
            .any(|f| f.name == "Fixture" && f.value.contains("vs")));
        assert!(embed.fields.iter().any(|f| f.name == "Venue"));
    }

    #[test]
    fn test_score_update_embed() {
        let embed = score_update(&snapshot());
        let description = embed.description.unwrap();
        assert!(description.contains("Vancouver Whitecaps FC 1 - 0 Seattle Sounders FC"));
        assert!(embed.fields.iter().any(|f| f.value == "45'"));
    }

    #[test]
    fn test_card_embed_colors() {
        let yellow = card(Some(34), "Vancouver Whitecaps FC", "Ranko Veselinovic", CardKind::Yellow);
        assert!(yellow.title.unwrap().contains("Yellow Card"));
        assert_eq!(yellow.color, Some(0xFFCC00));

        let red = card(Some(67), "Seattle Sounders FC", "Jordan Morris", CardKind::Red);
        assert!(red.title.unwrap().contains("Red Card"));
        assert_eq!(red.color, Some(0xFF0000));
    }

    #[test]
    fn test_halftime_embed() {
        let embed = halftime(&snapshot());
        assert_eq!(embed.title.as_deref(), Some("Half Time"));
        let description = embed.description.unwrap();
        assert!(description.contains("Vancouver Whitecaps FC"));
        assert!(description.contains("`1`"));
        assert!(description.contains("`0`"));
    }

    #[test]
    fn test_fulltime_embed() {
        let mut s = snapshot();
        s.home_goals = Some(1);
        s.away_goals = Some(1);
        s.status_detail = "Full Time".to_string();
        let embed = fulltime(&s);
        assert!(embed.description.unwrap().contains("1 - 1"));
    }

    #[test]
    fn test_substitution_message() {
        let message = substitution(Some(62), "Vancouver Whitecaps FC", "Pedro Vite", "Ryan Gauld");
        let content = message.content.unwrap();
        assert!(content.contains("62'"));
        assert!(content.contains("Ryan Gauld off"));
        assert!(content.contains("Pedro Vite on"));
    }

    #[test]
    fn test_upcoming_marks_home_and_away() {
        let mut home_match = snapshot();
        home_match.away_name = "Toronto FC".to_string();
        let mut away_match = snapshot();
        away_match.home_name = "Portland Timbers".to_string();
        away_match.away_name = "Vancouver Whitecaps FC".to_string();

        let embed = upcoming(&[home_match, away_match], "Vancouver Whitecaps");
        let description = embed.description.unwrap();
        assert!(description.contains("Toronto FC"));
        assert!(description.contains("Portland Timbers"));
        assert!(description.contains("HOME"));
        assert!(description.contains("AWAY"));
    }

    #[test]
    fn test_standings_embed() {
        let entries = vec![
            StandingsEntry {
                rank: 1,
                team_name: "LA Galaxy".to_string(),
                played: 10,
                wins: 7,
                draws: 2,
                losses: 1,
                goals_for: 20,
                goals_against: 8,
                goal_difference: 12,
                points: 23,
            },
            StandingsEntry {
                rank: 2,
                team_name: "Vancouver Whitecaps FC".to_string(),
                played: 10,
                wins: 6,
                draws: 2,
                losses: 2,
                goals_for: 18,
                goals_against: 10,
                goal_difference: 8,
                points: 20,
            },
        ];
        let embed = standings(&entries);
        let description = embed.description.unwrap();
        assert!(description.contains("LA Galaxy"));
        assert!(description.contains("Vancouver Whitecaps FC"));
        assert!(description.contains("23 pts"));
    }

    #[test]
    fn test_render_dispatch() {
        let score = render(&Notification::Score(snapshot()));
        assert_eq!(score.embeds.len(), 1);

        let kickoff_msg = render(&Notification::Kickoff(snapshot()));
        assert!(kickoff_msg.content.unwrap().contains("underway"));

        let sub = render(&Notification::Event(DiscreteEvent::Substitution {
            fixture_id: 1,
            elapsed_minutes: Some(70),
            team_name: "Vancouver Whitecaps FC".to_string(),
            player_in: "A".to_string(),
            player_out: "B".to_string(),
        }));
        assert!(sub.content.is_some());
    }
}
