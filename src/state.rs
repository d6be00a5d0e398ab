use std::collections::VecDeque;

use chrono::{DateTime, Local, Utc};

use crate::config::{Config, MatchType};
use crate::football_data::{MatchesResponse, StandingsResponse};
use crate::league_data::{LeagueData, LeagueStore};
use crate::live::LiveStatus;
use crate::matches_view::{MatchView, build_match_views};
use crate::standings_view::{StandingView, build_standings_view, show_table};

const MAX_LOGS: usize = 200;

/// What the dashboard shows; cycled with the arrow keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Standings,
    LeagueMatches,
    NextMatches,
    DailyMatches,
}

impl DisplayMode {
    pub const ALL: [DisplayMode; 4] = [
        DisplayMode::Standings,
        DisplayMode::LeagueMatches,
        DisplayMode::NextMatches,
        DisplayMode::DailyMatches,
    ];

    pub fn match_type(self) -> MatchType {
        match self {
            DisplayMode::Standings | DisplayMode::LeagueMatches => MatchType::League,
            DisplayMode::NextMatches => MatchType::Next,
            DisplayMode::DailyMatches => MatchType::Daily,
        }
    }

    pub fn show_tables(self) -> bool {
        self == DisplayMode::Standings
    }

    pub fn show_matches(self) -> bool {
        self != DisplayMode::Standings
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            DisplayMode::Standings => "STANDINGS",
            DisplayMode::LeagueMatches => "LEAGUE",
            DisplayMode::NextMatches => "NEXT",
            DisplayMode::DailyMatches => "DAILY",
        }
    }
}

#[derive(Debug, Clone)]
pub enum Delta {
    SetTables(StandingsResponse),
    SetMatches(MatchesResponse),
    SetLive(LiveStatus),
    PollFinished { at: DateTime<Utc> },
    Log(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderCommand {
    Refresh,
    Shutdown,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Config,
    pub store: LeagueStore,
    /// Competitions currently rotated through; the live leagues while live mode is on.
    pub leagues: Vec<String>,
    pub competition_index: usize,
    /// `None` means the configured panes (`show_tables`/`show_matches`/`match_type`).
    pub mode: Option<DisplayMode>,
    pub live: LiveStatus,
    pub loading: bool,
    pub last_poll: Option<DateTime<Utc>>,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            leagues: config.show.clone(),
            config,
            store: LeagueStore::new(),
            competition_index: 0,
            mode: None,
            live: LiveStatus::default(),
            loading: true,
            last_poll: None,
            logs: VecDeque::with_capacity(MAX_LOGS),
            help_overlay: false,
        }
    }

    pub fn competition(&self) -> &str {
        self.leagues
            .get(self.competition_index)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn next_league(&mut self) {
        if self.leagues.is_empty() {
            return;
        }
        self.competition_index = (self.competition_index + 1) % self.leagues.len();
        self.refresh_loading();
    }

    pub fn prev_league(&mut self) {
        if self.leagues.is_empty() {
            return;
        }
        self.competition_index =
            (self.competition_index + self.leagues.len() - 1) % self.leagues.len();
        self.refresh_loading();
    }

    pub fn next_mode(&mut self) {
        self.mode = Some(self.mode.map_or(DisplayMode::Standings, DisplayMode::next));
    }

    pub fn prev_mode(&mut self) {
        self.mode = Some(self.mode.map_or(DisplayMode::DailyMatches, DisplayMode::prev));
    }

    pub fn match_type(&self) -> MatchType {
        self.mode
            .map_or(self.config.match_type, DisplayMode::match_type)
    }

    pub fn show_tables_pane(&self) -> bool {
        let wanted = self.mode.map_or(self.config.show_tables, DisplayMode::show_tables);
        let match_day = self.store.match_day(self.competition(), Utc::now());
        wanted && self.match_type() == MatchType::League && show_table(match_day.as_ref())
    }

    /// Header text: the current round for league views, the view name otherwise.
    pub fn header_label(&self, now: DateTime<Utc>) -> String {
        if self.match_type() == MatchType::League {
            if let Some(day) = self.store.match_day(self.competition(), now) {
                return format!("MATCHDAY: {}", day.label());
            }
        }
        match self.mode {
            Some(mode) => mode.label().to_string(),
            None => match_type_label(self.match_type()).to_string(),
        }
    }

    pub fn show_matches_pane(&self) -> bool {
        self.mode
            .map_or(self.config.show_matches, DisplayMode::show_matches)
    }

    /// Every configured competition, independent of the live rotation; the next and
    /// daily views span all of them.
    pub fn league_data(&self, now: DateTime<Utc>) -> Vec<LeagueData> {
        let mut codes = self.config.show.clone();
        for code in &self.leagues {
            if !codes.contains(code) {
                codes.push(code.clone());
            }
        }
        self.store.leagues(&codes, now)
    }

    pub fn standings_view(&self, now: DateTime<Utc>) -> StandingView {
        self.standings_view_for(&self.league_data(now))
    }

    pub fn standings_view_for(&self, leagues: &[LeagueData]) -> StandingView {
        let code = self.competition();
        build_standings_view(
            leagues,
            code,
            self.config.focus_for(code),
            self.config.max_teams,
        )
    }

    pub fn match_views(&self, now: DateTime<Local>) -> Vec<MatchView> {
        self.match_views_for(&self.league_data(now.with_timezone(&Utc)), now)
    }

    pub fn match_views_for(&self, leagues: &[LeagueData], now: DateTime<Local>) -> Vec<MatchView> {
        let mut config = self.config.clone();
        config.match_type = self.match_type();
        build_match_views(leagues, self.competition(), &config, &now)
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    fn refresh_loading(&mut self) {
        if self.loading {
            let code = self.competition().to_string();
            if self.store.has_tables(&code) && self.store.has_matches(&code) {
                self.loading = false;
            }
        }
    }
}

fn match_type_label(match_type: MatchType) -> &'static str {
    match match_type {
        MatchType::League => "LEAGUE",
        MatchType::Next => "NEXT",
        MatchType::Daily => "DAILY",
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SetTables(tables) => {
            state.store.apply_tables(tables);
        }
        Delta::SetMatches(matches) => {
            state.store.apply_matches(matches);
        }
        Delta::SetLive(status) => {
            let current = state.competition().to_string();
            state.leagues = if status.leagues.is_empty() {
                state.config.show.clone()
            } else {
                status.leagues.clone()
            };
            // Stay on the same competition when it survives the swap.
            state.competition_index = state
                .leagues
                .iter()
                .position(|code| *code == current)
                .unwrap_or(0);
            state.push_log(if status.live {
                "[INFO] Live mode activated"
            } else {
                "[INFO] Usual mode active"
            });
            state.live = status;
        }
        Delta::PollFinished { at } => {
            state.last_poll = Some(at);
        }
        Delta::Log(msg) => state.push_log(msg),
    }
    state.refresh_loading();
}
