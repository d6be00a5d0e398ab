use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::Config;
use crate::football_data::Match;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LiveStatus {
    pub live: bool,
    pub matches: Vec<u64>,
    pub leagues: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiveEvent {
    MatchStarted {
        id: u64,
        kickoff: Option<DateTime<Utc>>,
        home: String,
    },
    MatchFinished {
        id: u64,
    },
    LeagueAdded {
        code: String,
    },
}

/// A match counts as live while in play, or while its kickoff lies within two poll
/// intervals of `now` so polling speeds up just before kickoff.
pub fn is_live_candidate(m: &Match, now: DateTime<Utc>, api_call_interval: Duration) -> bool {
    if m.status.is_in_progress() {
        return true;
    }
    let Some(kickoff) = m.kickoff() else {
        return false;
    };
    let window = api_call_interval.as_secs().saturating_mul(2) as i64;
    (kickoff - now).num_seconds().abs() < window
}

#[derive(Debug, Clone, Default)]
pub struct LiveTracker {
    api_call_interval: Duration,
    live_matches: Vec<u64>,
    live_leagues: Vec<String>,
    previous_leagues: Vec<String>,
    live_mode: bool,
}

impl LiveTracker {
    pub fn new(api_call_interval: Duration) -> Self {
        Self {
            api_call_interval,
            ..Self::default()
        }
    }

    pub fn live_mode(&self) -> bool {
        self.live_mode
    }

    pub fn live_matches(&self) -> &[u64] {
        &self.live_matches
    }

    pub fn live_leagues(&self) -> &[String] {
        &self.live_leagues
    }

    /// Live leagues are rebuilt from scratch on every matches poll.
    pub fn begin_poll(&mut self) {
        self.previous_leagues = std::mem::take(&mut self.live_leagues);
    }

    pub fn observe(&mut self, code: &str, matches: &[Match], now: DateTime<Utc>) -> Vec<LiveEvent> {
        let mut events = Vec::new();
        for m in matches {
            if is_live_candidate(m, now, self.api_call_interval) {
                if !self.live_matches.contains(&m.id) {
                    self.live_matches.push(m.id);
                    events.push(LiveEvent::MatchStarted {
                        id: m.id,
                        kickoff: m.kickoff(),
                        home: m.home_team.name.clone(),
                    });
                }
                if !self.live_leagues.iter().any(|c| c == code) {
                    self.live_leagues.push(code.to_string());
                    if !self.previous_leagues.iter().any(|c| c == code) {
                        events.push(LiveEvent::LeagueAdded {
                            code: code.to_string(),
                        });
                    }
                }
            } else if let Some(pos) = self.live_matches.iter().position(|id| *id == m.id) {
                self.live_matches.remove(pos);
                events.push(LiveEvent::MatchFinished { id: m.id });
            }
        }
        events
    }

    /// Flips live mode when the set of live matches became (non-)empty and returns the
    /// status to broadcast; `None` while the mode is unchanged.
    pub fn settle(&mut self) -> Option<LiveStatus> {
        let is_live = !self.live_matches.is_empty();
        if is_live == self.live_mode {
            return None;
        }
        self.live_mode = is_live;
        Some(self.status())
    }

    pub fn status(&self) -> LiveStatus {
        LiveStatus {
            live: self.live_mode,
            matches: self.live_matches.clone(),
            leagues: self.live_leagues.clone(),
        }
    }

    pub fn poll_interval(&self, config: &Config) -> Duration {
        if self.live_leagues.is_empty() {
            config.api_call_interval
        } else {
            config.live_poll_interval
        }
    }
}

pub fn describe_event(event: &LiveEvent) -> String {
    match event {
        LiveEvent::MatchStarted { id, kickoff, home } => {
            let at = kickoff
                .map(|k| k.format("%H:%M").to_string())
                .unwrap_or_else(|| "--:--".to_string());
            format!("[INFO] Live match {id} detected (kickoff {at} UTC, home {home})")
        }
        LiveEvent::MatchFinished { id } => format!("[INFO] Live match {id} finished"),
        LiveEvent::LeagueAdded { code } => format!("[INFO] Live league {code} added"),
    }
}
