//! ESPN site API client.
//!
//! Unauthenticated public endpoints. The scoreboard is date-bound, so the
//! client sweeps a small window of nearby dates to dodge timezone misses.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use super::extract::{events_from_summary, leading_minutes};
use super::types::{Scoreboard, ScoreboardEvent, StandingsResponse, Summary};
use crate::domain::{DiscreteEvent, MatchPhase, MatchSnapshot, StandingsEntry};
use crate::infrastructure::config::ProviderConfig;

const USER_AGENT: &str = "matchday-bot/0.1";
const REQUEST_TIMEOUT_SECS: u64 = 12;

/// Scoreboard date offsets checked when looking for the current or next
/// fixture: yesterday (late finishes) through three days out.
const SCOREBOARD_OFFSETS: std::ops::RangeInclusive<i64> = -1..=3;

/// How far ahead the upcoming-fixtures sweep looks, and how many rows it
/// returns.
const UPCOMING_DAYS: i64 = 14;
const UPCOMING_LIMIT: usize = 5;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("provider returned status {0}")]
    BadStatus(reqwest::StatusCode),

    #[error("failed to decode payload: {0}")]
    DecodeFailed(String),
}

pub type Result<T> = std::result::Result<T, ProviderError>;

pub struct EspnClient {
    base_url: String,
    standings_url: String,
    team_id: String,
    team_name_lower: String,
    client: Client,
}

impl EspnClient {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            standings_url: config.standings_url.clone(),
            team_id: config.team_id.clone(),
            team_name_lower: config.team_name.to_lowercase(),
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .user_agent(USER_AGENT)
                .build()
                .unwrap_or_default(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, params: &[(&str, String)]) -> Result<T> {
        debug!(url, "GET");
        let response = self.client.get(url).query(params).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::BadStatus(status));
        }
        response
            .json()
            .await
            .map_err(|e| ProviderError::DecodeFailed(e.to_string()))
    }

    /// One scoreboard page, filtered to the configured team.
    async fn scoreboard_day(&self, day_offset: i64) -> Result<Vec<MatchSnapshot>> {
        let day = Utc::now() + Duration::days(day_offset);
        let url = format!("{}/scoreboard", self.base_url);
        let params = [("dates", day.format("%Y%m%d").to_string())];
        let scoreboard: Scoreboard = self.get_json(&url, &params).await?;

        Ok(scoreboard
            .events
            .iter()
            .filter_map(|event| self.snapshot_from_event(event))
            .collect())
    }

    /// The fixture the bot should be watching right now: a live match if
    /// one exists, otherwise the soonest upcoming one, otherwise the most
    /// recently played one still on the board.
    pub async fn current_or_next(&self) -> Result<Option<MatchSnapshot>> {
        let mut candidates: Vec<MatchSnapshot> = Vec::new();
        for offset in SCOREBOARD_OFFSETS {
            for snapshot in self.scoreboard_day(offset).await? {
                if !candidates.iter().any(|c| c.fixture_id == snapshot.fixture_id) {
                    candidates.push(snapshot);
                }
            }
        }
        Ok(choose_fixture(candidates))
    }

    /// Detail feed for one fixture. Only useful while the match is live.
    pub async fn summary(&self, fixture_id: u64) -> Result<Summary> {
        let url = format!("{}/summary", self.base_url);
        let params = [("event", fixture_id.to_string())];
        self.get_json(&url, &params).await
    }

    /// Next few scheduled fixtures for the configured team.
    pub async fn upcoming_fixtures(&self) -> Result<Vec<MatchSnapshot>> {
        let now = Utc::now();
        let mut upcoming: Vec<MatchSnapshot> = Vec::new();

        for offset in 0..=UPCOMING_DAYS {
            for snapshot in self.scoreboard_day(offset).await? {
                let is_future = snapshot.starts_at.map(|t| t > now).unwrap_or(false);
                if snapshot.phase == MatchPhase::Scheduled
                    && is_future
                    && !upcoming.iter().any(|c| c.fixture_id == snapshot.fixture_id)
                {
                    upcoming.push(snapshot);
                }
            }
        }

        upcoming.sort_by_key(|s| s.starts_at);
        upcoming.truncate(UPCOMING_LIMIT);
        Ok(upcoming)
    }

    /// League table, both conferences merged in listed order.
    pub async fn standings(&self) -> Result<Vec<StandingsEntry>> {
        let response: StandingsResponse = self.get_json(&self.standings_url, &[]).await?;

        let tables = if response.children.is_empty() {
            response.standings.into_iter().collect::<Vec<_>>()
        } else {
            response
                .children
                .into_iter()
                .filter_map(|group| group.standings)
                .collect()
        };

        let mut entries = Vec::new();
        for table in tables {
            for row in table.entries {
                let stat = |name: &str| -> f64 {
                    row.stats
                        .iter()
                        .find(|s| s.name == name)
                        .and_then(|s| s.value)
                        .unwrap_or(0.0)
                };
                entries.push(StandingsEntry {
                    rank: entries.len() as u32 + 1,
                    team_name: row
                        .team
                        .as_ref()
                        .map(|t| t.display_name.clone())
                        .unwrap_or_default(),
                    played: stat("gamesPlayed") as u32,
                    wins: stat("wins") as u32,
                    draws: stat("ties") as u32,
                    losses: stat("losses") as u32,
                    goals_for: stat("pointsFor") as u32,
                    goals_against: stat("pointsAgainst") as u32,
                    goal_difference: stat("pointDifferential") as i32,
                    points: stat("points") as u32,
                });
            }
        }
        Ok(entries)
    }

    fn is_target_team(&self, team_id: &str, team_name: &str) -> bool {
        (!self.team_id.is_empty() && team_id == self.team_id)
            || team_name.to_lowercase().contains(&self.team_name_lower)
    }

    /// Typed snapshot from one scoreboard event, or `None` when the event
    /// is malformed or does not involve the configured team.
    fn snapshot_from_event(&self, event: &ScoreboardEvent) -> Option<MatchSnapshot> {
        let fixture_id: u64 = event.id.parse().ok()?;
        let competition = event.competitions.first()?;

        let home = competition
            .competitors
            .iter()
            .find(|c| c.home_away == "home")?;
        let away = competition
            .competitors
            .iter()
            .find(|c| c.home_away == "away")?;

        let home_team = home.team.as_ref()?;
        let away_team = away.team.as_ref()?;

        if !self.is_target_team(&home_team.id, &home_team.display_name)
            && !self.is_target_team(&away_team.id, &away_team.display_name)
        {
            return None;
        }

        let status = event
            .status
            .as_ref()
            .or(competition.status.as_ref());
        let status_type = status.and_then(|s| s.status_type.as_ref());
        let phase = status_type
            .map(|t| MatchPhase::from_espn_status(&t.name, &t.state))
            .unwrap_or(MatchPhase::Scheduled);

        let elapsed_minutes = status.and_then(|s| {
            leading_minutes(&s.display_clock).or_else(|| {
                status_type.and_then(|t| leading_minutes(&t.short_detail))
            })
        });

        // The feed reports "0" before kickoff; the model keeps goals absent
        // until the match has actually started.
        let (home_goals, away_goals) = if phase == MatchPhase::Scheduled {
            (None, None)
        } else {
            (
                Some(home.score.as_ref().and_then(|s| s.as_goals()).unwrap_or(0)),
                Some(away.score.as_ref().and_then(|s| s.as_goals()).unwrap_or(0)),
            )
        };

        Some(MatchSnapshot {
            fixture_id,
            home_name: home_team.display_name.clone(),
            away_name: away_team.display_name.clone(),
            home_goals,
            away_goals,
            elapsed_minutes,
            phase,
            starts_at: parse_kickoff(&event.date),
            status_detail: status_type
                .map(|t| {
                    if t.detail.is_empty() {
                        t.name.clone()
                    } else {
                        t.detail.clone()
                    }
                })
                .unwrap_or_default(),
            venue: competition
                .venue
                .as_ref()
                .map(|v| v.full_name.clone())
                .unwrap_or_default(),
        })
    }
}

/// Pick the fixture to track from a deduplicated candidate set.
fn choose_fixture(candidates: Vec<MatchSnapshot>) -> Option<MatchSnapshot> {
    if candidates.is_empty() {
        return None;
    }

    if let Some(live) = candidates
        .iter()
        .filter(|c| c.phase.is_live())
        .min_by_key(|c| c.elapsed_minutes.unwrap_or(0))
    {
        return Some(live.clone());
    }

    let now = Utc::now();
    if let Some(next) = candidates
        .iter()
        .filter(|c| c.starts_at.map(|t| t >= now).unwrap_or(false))
        .min_by_key(|c| c.starts_at)
    {
        return Some(next.clone());
    }

    candidates.into_iter().max_by_key(|c| c.starts_at)
}

/// ESPN dates come as RFC 3339 or as the truncated `2026-02-18T20:00Z`
/// variant without seconds.
fn parse_kickoff(raw: &str) -> Option<DateTime<Utc>> {
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%MZ")
        .ok()
        .map(|naive| naive.and_utc())
}

#[async_trait::async_trait]
impl crate::application::service::FixtureProvider for EspnClient {
    async fn current_or_next_fixture(&self) -> anyhow::Result<Option<MatchSnapshot>> {
        Ok(self.current_or_next().await?)
    }

    async fn detail_events(&self, snapshot: &MatchSnapshot) -> anyhow::Result<Vec<DiscreteEvent>> {
        let summary = self.summary(snapshot.fixture_id).await?;
        Ok(events_from_summary(&summary, snapshot.fixture_id))
    }
}
