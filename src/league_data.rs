use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};

use crate::football_data::{
    Competition, Match, MatchDay, MatchesResponse, Season, Standing, StandingsResponse, Team,
};

/// One competition with its table and fixtures joined together.
#[derive(Debug, Clone)]
pub struct LeagueData {
    pub code: String,
    pub competition: Competition,
    pub season: Season,
    pub standings: Vec<Standing>,
    pub matches: Vec<Match>,
    pub match_day: Option<MatchDay>,
}

/// Round of the fixture whose kickoff is closest to `now`.
pub fn current_match_day(matches: &[Match], now: DateTime<Utc>) -> Option<MatchDay> {
    matches
        .iter()
        .filter_map(|m| {
            let kickoff = m.kickoff()?;
            let round = m.effective_matchday()?;
            Some(((kickoff - now).num_seconds().unsigned_abs(), round))
        })
        .min_by_key(|(diff, _)| *diff)
        .map(|(_, round)| round)
}

#[derive(Debug, Clone, Default)]
pub struct LeagueStore {
    pub tables: HashMap<String, StandingsResponse>,
    pub matches: HashMap<String, MatchesResponse>,
    pub teams: HashMap<u32, Team>,
    pub team_names: BTreeSet<String>,
}

impl LeagueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply_tables(&mut self, tables: StandingsResponse) {
        for entry in tables.standings.iter().flat_map(|s| s.table.iter()) {
            if let Some(id) = entry.team.id {
                self.teams.insert(id, entry.team.clone());
            }
            if !entry.team.name.is_empty() {
                self.team_names.insert(entry.team.name.clone());
            }
        }
        self.tables
            .insert(tables.competition.code.clone(), tables);
    }

    pub fn apply_matches(&mut self, matches: MatchesResponse) {
        self.matches
            .insert(matches.competition.code.clone(), matches);
    }

    pub fn has_tables(&self, code: &str) -> bool {
        self.tables.contains_key(code)
    }

    pub fn has_matches(&self, code: &str) -> bool {
        self.matches.contains_key(code)
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.matches.is_empty()
    }

    /// Joins whatever is known for `code`; either half may still be missing.
    pub fn league(&self, code: &str, now: DateTime<Utc>) -> Option<LeagueData> {
        let tables = self.tables.get(code);
        let fixtures = self.matches.get(code);
        let competition = tables
            .map(|t| t.competition.clone())
            .or_else(|| fixtures.map(|m| m.competition.clone()))?;

        Some(LeagueData {
            code: code.to_string(),
            competition,
            season: tables.map(|t| t.season.clone()).unwrap_or_default(),
            standings: tables.map(|t| t.standings.clone()).unwrap_or_default(),
            matches: fixtures.map(|m| m.matches.clone()).unwrap_or_default(),
            match_day: self.match_day(code, now),
        })
    }

    /// Current round of `code` without joining the whole league.
    pub fn match_day(&self, code: &str, now: DateTime<Utc>) -> Option<MatchDay> {
        self.matches
            .get(code)
            .and_then(|m| current_match_day(&m.matches, now))
            .or_else(|| {
                self.tables
                    .get(code)
                    .and_then(|t| t.season.current_matchday)
                    .map(MatchDay::Number)
            })
    }

    pub fn leagues(&self, codes: &[String], now: DateTime<Utc>) -> Vec<LeagueData> {
        codes
            .iter()
            .filter_map(|code| self.league(code, now))
            .collect()
    }
}
