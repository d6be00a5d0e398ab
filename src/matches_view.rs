use chrono::{DateTime, Datelike, Duration as ChronoDuration, TimeZone, Timelike, Utc};

use crate::config::{Config, MatchType};
use crate::football_data::{Match, MatchStatus, Team, Winner};
use crate::league_data::LeagueData;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewLabel {
    Loading,
    MatchDay,
    NextMatches,
    Daily,
}

impl ViewLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            ViewLabel::Loading => "LOADING",
            ViewLabel::MatchDay => "MATCHDAY",
            ViewLabel::NextMatches => "NEXT MATCHES",
            ViewLabel::Daily => "TODAY'S MATCHES",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamCell {
    pub name: String,
    pub tla: Option<String>,
    pub winner: bool,
}

impl TeamCell {
    fn from_team(team: &Team) -> Self {
        Self {
            name: team.name.clone(),
            tla: team.tla.clone(),
            winner: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MatchRow {
    pub id: u64,
    pub status: MatchStatus,
    pub kickoff: Option<DateTime<Utc>>,
    pub home: TeamCell,
    pub away: TeamCell,
    /// Score for started matches, kickoff time otherwise.
    pub state: String,
    pub focused: bool,
}

#[derive(Debug, Clone)]
pub struct MatchView {
    pub label: ViewLabel,
    pub competition: String,
    pub emblem: Option<String>,
    pub match_day: Option<String>,
    pub matches: Vec<MatchRow>,
}

impl MatchView {
    fn loading() -> Self {
        Self {
            label: ViewLabel::Loading,
            competition: String::new(),
            emblem: None,
            match_day: None,
            matches: Vec::new(),
        }
    }
}

pub fn build_match_views<Tz: TimeZone>(
    leagues: &[LeagueData],
    code: &str,
    config: &Config,
    now: &DateTime<Tz>,
) -> Vec<MatchView> {
    if leagues.is_empty() {
        return vec![MatchView::loading()];
    }

    let focus_team = config.focus_for(code).and_then(|f| f.team_name());
    match config.match_type {
        MatchType::League => build_league_view(leagues, code, focus_team, now)
            .into_iter()
            .collect(),
        MatchType::Next => vec![build_next_view(
            leagues,
            config.next_matches_count,
            &config.focused_teams(),
            now,
        )],
        MatchType::Daily => build_daily_views(leagues, config.days_offset, focus_team, now),
    }
}

/// Fixtures of the competition's current round.
pub fn build_league_view<Tz: TimeZone>(
    leagues: &[LeagueData],
    code: &str,
    focus_team: Option<&str>,
    now: &DateTime<Tz>,
) -> Option<MatchView> {
    let league = leagues.iter().find(|league| league.code == code)?;
    let match_day = league.match_day.as_ref();
    let matches = league
        .matches
        .iter()
        .filter(|m| match_day.is_some() && m.effective_matchday().as_ref() == match_day)
        .map(|m| build_row(m, focus_team, now))
        .collect();

    Some(MatchView {
        label: ViewLabel::MatchDay,
        competition: league.competition.name.clone(),
        emblem: league.competition.emblem.clone(),
        match_day: match_day.map(|day| day.label()),
        matches,
    })
}

/// Upcoming fixtures of any focus team across all competitions, soonest first.
pub fn build_next_view<Tz: TimeZone>(
    leagues: &[LeagueData],
    count: usize,
    focused_teams: &[&str],
    now: &DateTime<Tz>,
) -> MatchView {
    let now_utc = now.with_timezone(&Utc);
    let mut upcoming = leagues
        .iter()
        .flat_map(|league| league.matches.iter())
        .filter(|m| focused_teams.iter().any(|team| m.involves(team)))
        .filter_map(|m| m.kickoff().filter(|k| *k >= now_utc).map(|k| (k, m)))
        .collect::<Vec<_>>();
    upcoming.sort_by_key(|(kickoff, m)| (*kickoff, m.id));

    MatchView {
        label: ViewLabel::NextMatches,
        competition: String::new(),
        emblem: None,
        match_day: None,
        matches: upcoming
            .into_iter()
            .take(count)
            .map(|(_, m)| build_row(m, None, now))
            .collect(),
    }
}

/// One view per competition with fixtures on `today - days_offset` (local calendar day).
pub fn build_daily_views<Tz: TimeZone>(
    leagues: &[LeagueData],
    days_offset: i64,
    focus_team: Option<&str>,
    now: &DateTime<Tz>,
) -> Vec<MatchView> {
    let day = (now.clone() - ChronoDuration::days(days_offset)).date_naive();
    let tz = now.timezone();

    leagues
        .iter()
        .filter_map(|league| {
            let matches = league
                .matches
                .iter()
                .filter(|m| {
                    m.kickoff()
                        .is_some_and(|k| k.with_timezone(&tz).date_naive() == day)
                })
                .map(|m| build_row(m, focus_team, now))
                .collect::<Vec<_>>();
            if matches.is_empty() {
                return None;
            }
            Some(MatchView {
                label: ViewLabel::Daily,
                competition: league.competition.name.clone(),
                emblem: league.competition.emblem.clone(),
                match_day: None,
                matches,
            })
        })
        .collect()
}

pub fn build_row<Tz: TimeZone>(m: &Match, focus_team: Option<&str>, now: &DateTime<Tz>) -> MatchRow {
    let mut home = TeamCell::from_team(&m.home_team);
    let mut away = TeamCell::from_team(&m.away_team);
    if !m.status.is_pending() {
        match m.score.winner {
            Some(Winner::HomeTeam) => home.winner = true,
            Some(Winner::AwayTeam) => away.winner = true,
            _ => {}
        }
    }

    MatchRow {
        id: m.id,
        status: m.status.clone(),
        kickoff: m.kickoff(),
        home,
        away,
        state: match_state(m, now),
        focused: focus_team.is_some_and(|team| m.involves(team)),
    }
}

/// Kickoff label for pending matches (`DD/MM` beyond a week, weekday + time for later
/// days, time today); full-time score otherwise.
pub fn match_state<Tz: TimeZone>(m: &Match, now: &DateTime<Tz>) -> String {
    if !m.status.is_pending() {
        return format!(
            "{} - {}",
            score_side(m.score.full_time.home),
            score_side(m.score.full_time.away)
        );
    }

    let Some(kickoff) = m.kickoff() else {
        return "TBD".to_string();
    };
    let local = kickoff.with_timezone(&now.timezone());
    let remaining_days = (local.clone() - now.clone()).num_days();

    if remaining_days > 7 {
        format!("{:02}/{:02}", local.day(), local.month())
    } else if local.date_naive() > now.date_naive() {
        let weekday = local.weekday().to_string();
        format!(
            "{} {:02}:{:02}",
            &weekday[..2],
            local.hour(),
            local.minute()
        )
    } else {
        format!("{:02}:{:02}", local.hour(), local.minute())
    }
}

fn score_side(goals: Option<u32>) -> String {
    goals.map(|g| g.to_string()).unwrap_or_else(|| "-".to_string())
}
