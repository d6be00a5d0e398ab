use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::http_client::http_client;

pub const FOOTBALL_DATA_BASE_URL: &str = "https://api.football-data.org/v4";
const AUTH_HEADER: &str = "X-Auth-Token";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("API request quota exceeded, try selecting fewer leagues")]
    QuotaExceeded,
    #[error("http {status}: {body}")]
    Status { status: StatusCode, body: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Area {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    pub code: Option<String>,
    pub flag: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Competition {
    pub id: u32,
    pub name: String,
    pub code: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub emblem: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    pub id: u32,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    pub current_matchday: Option<u32>,
    pub winner: Option<Team>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: Option<u32>,
    // Undecided cup fixtures carry `"name": null`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    pub short_name: Option<String>,
    pub tla: Option<String>,
    pub crest: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Winner {
    HomeTeam,
    AwayTeam,
    Draw,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScorePair {
    pub home: Option<u32>,
    pub away: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub winner: Option<Winner>,
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub full_time: ScorePair,
    #[serde(default, deserialize_with = "null_as_default")]
    pub half_time: ScorePair,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchStatus {
    Scheduled,
    Timed,
    InPlay,
    Paused,
    Finished,
    Suspended,
    Postponed,
    Cancelled,
    Awarded,
    Other(String),
}

impl MatchStatus {
    /// Not kicked off yet; rows show the kickoff time instead of a score.
    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            MatchStatus::Scheduled | MatchStatus::Timed | MatchStatus::Postponed
        )
    }

    pub fn is_in_progress(&self) -> bool {
        matches!(self, MatchStatus::InPlay | MatchStatus::Paused)
    }

    pub fn as_str(&self) -> &str {
        match self {
            MatchStatus::Scheduled => "SCHEDULED",
            MatchStatus::Timed => "TIMED",
            MatchStatus::InPlay => "IN_PLAY",
            MatchStatus::Paused => "PAUSED",
            MatchStatus::Finished => "FINISHED",
            MatchStatus::Suspended => "SUSPENDED",
            MatchStatus::Postponed => "POSTPONED",
            MatchStatus::Cancelled => "CANCELLED",
            MatchStatus::Awarded => "AWARDED",
            MatchStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for MatchStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "SCHEDULED" => MatchStatus::Scheduled,
            "TIMED" => MatchStatus::Timed,
            "IN_PLAY" | "LIVE" => MatchStatus::InPlay,
            "PAUSED" => MatchStatus::Paused,
            "FINISHED" => MatchStatus::Finished,
            "SUSPENDED" => MatchStatus::Suspended,
            "POSTPONED" => MatchStatus::Postponed,
            "CANCELLED" => MatchStatus::Cancelled,
            "AWARDED" => MatchStatus::Awarded,
            _ => MatchStatus::Other(raw),
        }
    }
}

impl<'de> Deserialize<'de> for MatchStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(MatchStatus::from)
    }
}

/// Round identifier: league matchdays are numbers, cup rounds fall back to the stage name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MatchDay {
    Number(u32),
    Stage(String),
}

impl MatchDay {
    pub fn is_numeric(&self) -> bool {
        matches!(self, MatchDay::Number(_))
    }

    pub fn label(&self) -> String {
        match self {
            MatchDay::Number(n) => n.to_string(),
            MatchDay::Stage(stage) => stage.replace('_', " "),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: u64,
    pub utc_date: String,
    pub status: MatchStatus,
    pub matchday: Option<u32>,
    pub stage: Option<String>,
    pub group: Option<String>,
    pub last_updated: Option<String>,
    pub home_team: Team,
    pub away_team: Team,
    #[serde(default)]
    pub score: Score,
}

impl Match {
    pub fn kickoff(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.utc_date)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn effective_matchday(&self) -> Option<MatchDay> {
        self.matchday
            .map(MatchDay::Number)
            .or_else(|| self.stage.clone().map(MatchDay::Stage))
    }

    pub fn involves(&self, team_name: &str) -> bool {
        self.home_team.name == team_name || self.away_team.name == team_name
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingEntry {
    pub position: u32,
    pub team: Team,
    pub played_games: Option<u32>,
    pub form: Option<String>,
    pub won: u32,
    pub draw: u32,
    pub lost: u32,
    pub points: u32,
    pub goals_for: Option<u32>,
    pub goals_against: Option<u32>,
    pub goal_difference: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StandingType {
    Total,
    Home,
    Away,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Standing {
    pub stage: Option<String>,
    #[serde(rename = "type")]
    pub kind: StandingType,
    pub group: Option<String>,
    #[serde(default)]
    pub table: Vec<StandingEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StandingsResponse {
    pub area: Option<Area>,
    pub competition: Competition,
    #[serde(default)]
    pub season: Season,
    #[serde(default)]
    pub standings: Vec<Standing>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchesResponse {
    pub competition: Competition,
    #[serde(default)]
    pub matches: Vec<Match>,
}

pub fn standings_url(base_url: &str, code: &str) -> String {
    format!("{}/competitions/{code}/standings", base_url.trim_end_matches('/'))
}

pub fn matches_url(base_url: &str, code: &str) -> String {
    format!("{}/competitions/{code}/matches", base_url.trim_end_matches('/'))
}

pub fn fetch_standings(
    base_url: &str,
    code: &str,
    api_key: Option<&str>,
) -> Result<StandingsResponse> {
    let url = standings_url(base_url, code);
    let body = get_json(&url, api_key).with_context(|| format!("GET {url}"))?;
    parse_standings_json(&body)
}

pub fn fetch_matches(base_url: &str, code: &str, api_key: Option<&str>) -> Result<MatchesResponse> {
    let url = matches_url(base_url, code);
    let body = get_json(&url, api_key).with_context(|| format!("GET {url}"))?;
    parse_matches_json(&body)
}

pub fn parse_standings_json(raw: &str) -> Result<StandingsResponse> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(anyhow::anyhow!("empty standings response"));
    }
    serde_json::from_str(trimmed).context("invalid standings json")
}

pub fn parse_matches_json(raw: &str) -> Result<MatchesResponse> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(anyhow::anyhow!("empty matches response"));
    }
    serde_json::from_str(trimmed).context("invalid matches json")
}

/// True when the error chain carries a 429 from the API.
pub fn is_quota_exceeded(err: &anyhow::Error) -> bool {
    err.chain()
        .any(|cause| matches!(cause.downcast_ref::<ApiError>(), Some(ApiError::QuotaExceeded)))
}

fn get_json(url: &str, api_key: Option<&str>) -> Result<String> {
    let client = http_client()?;
    let mut req = client.get(url);
    if let Some(key) = api_key.filter(|key| !key.trim().is_empty()) {
        req = req.header(AUTH_HEADER, key.trim());
    }

    let resp = req.send().context("request failed")?;
    let status = resp.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(ApiError::QuotaExceeded.into());
    }
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(ApiError::Status { status, body }.into());
    }
    Ok(body)
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
