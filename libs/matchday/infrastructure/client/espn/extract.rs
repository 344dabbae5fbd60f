//! Best-effort extraction of discrete events from the summary feed.
//!
//! Classifies structured plays and free-text commentary into cards and
//! substitutions. Goal-looking entries are recognized and dropped: goal
//! announcements come from score transitions between snapshots, not from
//! this feed. Misclassified commentary is acceptable noise for the caller,
//! which deduplicates by key before announcing anything.

use std::collections::HashSet;

use super::types::{CommentaryItem, Play, Summary};
use crate::domain::{CardKind, DiscreteEvent};

const GOAL_HINTS: &[&str] = &["goal", "scores", "finds the net", "penalty"];
const SUB_HINTS: &[&str] = &["substitution", "substitutes", "comes on", "replaces", "sub"];
const RED_HINTS: &[&str] = &["red card"];
const YELLOW_HINTS: &[&str] = &["yellow card", "booking"];

const UNKNOWN_TEAM: &str = "Unknown team";
const UNKNOWN_PLAYER: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineClass {
    Goal,
    Substitution,
    Card(CardKind),
}

/// Classify one line of play/commentary text.
///
/// Card phrases are checked first: a booking line often also mentions the
/// foul or a "penalty", and the more specific match should win.
fn classify(text: &str) -> Option<LineClass> {
    let lower = text.to_lowercase();
    if RED_HINTS.iter().any(|hint| lower.contains(hint)) {
        return Some(LineClass::Card(CardKind::Red));
    }
    if YELLOW_HINTS.iter().any(|hint| lower.contains(hint)) {
        return Some(LineClass::Card(CardKind::Yellow));
    }
    if SUB_HINTS.iter().any(|hint| lower.contains(hint)) {
        return Some(LineClass::Substitution);
    }
    if GOAL_HINTS.iter().any(|hint| lower.contains(hint)) {
        return Some(LineClass::Goal);
    }
    None
}

/// Extract every card and substitution the summary payload mentions.
///
/// Structured plays are preferred; commentary is a fallback feed for when
/// the plays list is sparse. Duplicates inside one payload are collapsed by
/// dedupe key so the caller sees each occurrence once.
pub fn events_from_summary(summary: &Summary, fixture_id: u64) -> Vec<DiscreteEvent> {
    let mut seen = HashSet::new();
    let mut events = Vec::new();

    for play in summary.key_events.iter().chain(summary.plays.iter()) {
        if let Some(event) = event_from_play(play, fixture_id) {
            if seen.insert(event.dedupe_key()) {
                events.push(event);
            }
        }
    }

    for item in &summary.commentary {
        if let Some(event) = event_from_commentary(item, fixture_id) {
            if seen.insert(event.dedupe_key()) {
                events.push(event);
            }
        }
    }

    events
}

fn event_from_play(play: &Play, fixture_id: u64) -> Option<DiscreteEvent> {
    let type_text = play
        .play_type
        .as_ref()
        .map(|t| t.text.as_str())
        .unwrap_or("");
    let class = classify(type_text).or_else(|| classify(&play.text))?;

    let team_name = play
        .team
        .as_ref()
        .map(|t| t.display_name.clone())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNKNOWN_TEAM.to_string());
    let elapsed_minutes = play_minutes(play);

    match class {
        LineClass::Goal => None,
        LineClass::Substitution => {
            let (player_in, player_out) = substitution_players(play);
            Some(DiscreteEvent::Substitution {
                fixture_id,
                elapsed_minutes,
                team_name,
                player_in,
                player_out,
            })
        }
        LineClass::Card(kind) => Some(DiscreteEvent::Card {
            fixture_id,
            elapsed_minutes,
            team_name,
            player_name: card_player(play),
            kind,
        }),
    }
}

fn event_from_commentary(item: &CommentaryItem, fixture_id: u64) -> Option<DiscreteEvent> {
    let class = classify(&item.text)?;
    let elapsed_minutes = item
        .time
        .as_ref()
        .and_then(|t| leading_minutes(&t.display_value));
    let names = extract_names(&item.text);

    match class {
        LineClass::Goal => None,
        LineClass::Substitution => {
            // Commentary reads "X replaces Y" / "X comes on for Y": the
            // first name is the player coming on.
            Some(DiscreteEvent::Substitution {
                fixture_id,
                elapsed_minutes,
                team_name: UNKNOWN_TEAM.to_string(),
                player_in: names
                    .first()
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_PLAYER.to_string()),
                player_out: names
                    .get(1)
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_PLAYER.to_string()),
            })
        }
        LineClass::Card(kind) => Some(DiscreteEvent::Card {
            fixture_id,
            elapsed_minutes,
            team_name: UNKNOWN_TEAM.to_string(),
            player_name: names
                .first()
                .cloned()
                .unwrap_or_else(|| UNKNOWN_PLAYER.to_string()),
            kind,
        }),
    }
}

fn play_minutes(play: &Play) -> Option<u32> {
    let clock = play.clock.as_ref()?;
    if let Some(value) = clock.value {
        return Some(value as u32);
    }
    leading_minutes(&clock.display_value)
}

/// First run of digits in a clock label like `45'+2` or `23'`.
pub(crate) fn leading_minutes(text: &str) -> Option<u32> {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

fn substitution_players(play: &Play) -> (String, String) {
    let structured_in = play
        .athletes_in
        .first()
        .map(|a| athlete_name(a))
        .filter(|name| !name.is_empty());
    let structured_out = play
        .athletes_out
        .first()
        .map(|a| athlete_name(a))
        .filter(|name| !name.is_empty());

    if let (Some(player_in), Some(player_out)) = (&structured_in, &structured_out) {
        return (player_in.clone(), player_out.clone());
    }

    // Fall back to name extraction from the text when the structured
    // participants are missing.
    let names = extract_names(&play.text);
    (
        structured_in
            .or_else(|| names.first().cloned())
            .unwrap_or_else(|| UNKNOWN_PLAYER.to_string()),
        structured_out
            .or_else(|| names.get(1).cloned())
            .unwrap_or_else(|| UNKNOWN_PLAYER.to_string()),
    )
}

fn card_player(play: &Play) -> String {
    for participant in &play.participants {
        if let Some(athlete) = &participant.athlete {
            let name = athlete_name(athlete);
            if !name.is_empty() {
                return name;
            }
        }
    }

    // Text like "Yellow Card - John Smith (Team)" carries the name after
    // the dash.
    if let Some((_, tail)) = play.text.split_once(" - ") {
        let name = tail.split('(').next().unwrap_or(tail).trim();
        if !name.is_empty() {
            return name.to_string();
        }
    }

    extract_names(&play.text)
        .into_iter()
        .next()
        .unwrap_or_else(|| UNKNOWN_PLAYER.to_string())
}

fn athlete_name(athlete: &super::types::Athlete) -> String {
    if !athlete.display_name.is_empty() {
        athlete.display_name.clone()
    } else {
        athlete.short_name.clone()
    }
}

/// Capitalized multi-word sequences in free text, as player-name
/// candidates. Commentary usually leads with the player ("Ryan Gauld
/// scores..."), so a lightweight scan beats brittle full parsing.
pub(crate) fn extract_names(text: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for token in text.split_whitespace() {
        let word = token.trim_matches(|c: char| !c.is_alphabetic() && c != '\'' && c != '-');
        if is_capitalized_word(word) {
            current.push(word);
        } else {
            flush_name(&mut current, &mut names);
        }
    }
    flush_name(&mut current, &mut names);

    // Preserve order while deduplicating
    let mut seen = HashSet::new();
    names.retain(|name| seen.insert(name.clone()));
    names
}

fn flush_name(current: &mut Vec<&str>, names: &mut Vec<String>) {
    if current.len() >= 2 {
        names.push(current.join(" "));
    }
    current.clear();
}

fn is_capitalized_word(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) if first.is_ascii_uppercase() => {}
        _ => return false,
    }
    word.len() >= 2 && chars.all(|c| c.is_ascii_lowercase() || c == '\'' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::super::types::{Athlete, Clock, CommentaryTime, PlayType, Team};
    use super::*;

    fn play(type_text: &str, text: &str) -> Play {
        Play {
            play_type: Some(PlayType {
                text: type_text.to_string(),
            }),
            text: text.to_string(),
            team: Some(Team {
                id: "9727".to_string(),
                display_name: "Vancouver Whitecaps FC".to_string(),
            }),
            clock: Some(Clock {
                value: Some(62.0),
                display_value: "62'".to_string(),
            }),
            participants: Vec::new(),
            athletes_in: Vec::new(),
            athletes_out: Vec::new(),
        }
    }

    fn commentary(text: &str, time: &str) -> CommentaryItem {
        CommentaryItem {
            text: text.to_string(),
            time: Some(CommentaryTime {
                display_value: time.to_string(),
            }),
        }
    }

    #[test]
    fn test_classify_keyword_set() {
        assert_eq!(classify("Ryan Gauld scores!"), Some(LineClass::Goal));
        assert_eq!(classify("What a goal that was"), Some(LineClass::Goal));
        assert_eq!(classify("He finds the net"), Some(LineClass::Goal));
        assert_eq!(
            classify("Substitution, Vancouver Whitecaps"),
            Some(LineClass::Substitution)
        );
        assert_eq!(
            classify("Pedro Vite replaces Ryan Gauld"),
            Some(LineClass::Substitution)
        );
        assert_eq!(
            classify("Andres Cubas comes on"),
            Some(LineClass::Substitution)
        );
        assert_eq!(
            classify("Yellow Card - Tristan Blackmon"),
            Some(LineClass::Card(CardKind::Yellow))
        );
        assert_eq!(
            classify("Booking for dissent"),
            Some(LineClass::Card(CardKind::Yellow))
        );
        assert_eq!(
            classify("RED CARD! He's off!"),
            Some(LineClass::Card(CardKind::Red))
        );
        assert_eq!(classify("Corner conceded by Tim Parker"), None);
    }

    #[test]
    fn test_card_beats_goal_hints_in_same_line() {
        // A booking for denying a goal must not be dropped as goal noise
        assert_eq!(
            classify("Yellow card after stopping a goal-bound run"),
            Some(LineClass::Card(CardKind::Yellow))
        );
    }

    #[test]
    fn test_extract_names() {
        assert_eq!(
            extract_names("Ryan Gauld scores a penalty"),
            vec!["Ryan Gauld".to_string()]
        );
        assert_eq!(
            extract_names("Pedro Vite replaces Ryan Gauld."),
            vec!["Pedro Vite".to_string(), "Ryan Gauld".to_string()]
        );
        // Single capitalized words are not names
        assert!(extract_names("Substitution incoming").is_empty());
        // Repeats collapse
        assert_eq!(
            extract_names("Ryan Gauld, yes Ryan Gauld again!"),
            vec!["Ryan Gauld".to_string()]
        );
    }

    #[test]
    fn test_leading_minutes() {
        assert_eq!(leading_minutes("62'"), Some(62));
        assert_eq!(leading_minutes("45'+2"), Some(45));
        assert_eq!(leading_minutes("HT"), None);
        assert_eq!(leading_minutes(""), None);
    }

    #[test]
    fn test_structured_substitution_preferred() {
        let mut sub_play = play("Substitution", "Substitution, Vancouver Whitecaps FC.");
        sub_play.athletes_in = vec![Athlete {
            display_name: "Pedro Vite".to_string(),
            short_name: "P. Vite".to_string(),
        }];
        sub_play.athletes_out = vec![Athlete {
            display_name: "Ryan Gauld".to_string(),
            short_name: "R. Gauld".to_string(),
        }];

        let summary = Summary {
            key_events: vec![sub_play],
            plays: Vec::new(),
            commentary: Vec::new(),
        };
        let events = events_from_summary(&summary, 7);
        assert_eq!(events.len(), 1);
        match &events[0] {
            DiscreteEvent::Substitution {
                player_in,
                player_out,
                elapsed_minutes,
                ..
            } => {
                assert_eq!(player_in, "Pedro Vite");
                assert_eq!(player_out, "Ryan Gauld");
                assert_eq!(*elapsed_minutes, Some(62));
            }
            other => panic!("expected substitution, got {:?}", other),
        }
    }

    #[test]
    fn test_substitution_falls_back_to_text_names() {
        let sub_play = play("Substitution", "Pedro Vite replaces Ryan Gauld.");
        let summary = Summary {
            key_events: vec![sub_play],
            plays: Vec::new(),
            commentary: Vec::new(),
        };
        let events = events_from_summary(&summary, 7);
        match &events[0] {
            DiscreteEvent::Substitution {
                player_in,
                player_out,
                ..
            } => {
                assert_eq!(player_in, "Pedro Vite");
                assert_eq!(player_out, "Ryan Gauld");
            }
            other => panic!("expected substitution, got {:?}", other),
        }
    }

    #[test]
    fn test_card_player_from_dash_text() {
        let card = play("", "Yellow Card - Tristan Blackmon (Vancouver Whitecaps FC)");
        let summary = Summary {
            key_events: vec![card],
            plays: Vec::new(),
            commentary: Vec::new(),
        };
        let events = events_from_summary(&summary, 7);
        match &events[0] {
            DiscreteEvent::Card {
                player_name, kind, ..
            } => {
                assert_eq!(player_name, "Tristan Blackmon");
                assert_eq!(*kind, CardKind::Yellow);
            }
            other => panic!("expected card, got {:?}", other),
        }
    }

    #[test]
    fn test_goal_plays_are_dropped() {
        let goal = play("Goal", "Ryan Gauld scores!");
        let summary = Summary {
            key_events: vec![goal],
            plays: Vec::new(),
            commentary: Vec::new(),
        };
        assert!(events_from_summary(&summary, 7).is_empty());
    }

    #[test]
    fn test_duplicates_across_feeds_collapse() {
        let card = play("", "Red Card - Jordan Morris (Seattle Sounders)");
        let duplicate = play("", "Red Card - Jordan Morris (Seattle Sounders)");
        let summary = Summary {
            key_events: vec![card],
            plays: vec![duplicate],
            commentary: Vec::new(),
        };
        assert_eq!(events_from_summary(&summary, 7).len(), 1);
    }

    #[test]
    fn test_commentary_fallback_events() {
        let summary = Summary {
            key_events: Vec::new(),
            plays: Vec::new(),
            commentary: vec![
                commentary("Pedro Vite replaces Ryan Gauld.", "62'"),
                commentary("Dangerous cross cleared away.", "63'"),
            ],
        };
        let events = events_from_summary(&summary, 7);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].elapsed_minutes(), Some(62));
    }
}
