use crate::config::Focus;
use crate::football_data::{MatchDay, StandingEntry, StandingType};
use crate::league_data::LeagueData;

#[derive(Debug, Clone, Default)]
pub struct StandingView {
    pub focus_team: Option<String>,
    /// Position of the focus team inside `standings`.
    pub focus_index: Option<usize>,
    pub standings: Vec<StandingEntry>,
}

pub fn build_standings_view(
    leagues: &[LeagueData],
    code: &str,
    focus: Option<&Focus>,
    max_teams: Option<usize>,
) -> StandingView {
    if leagues.is_empty() {
        return StandingView::default();
    }

    let table = select_table(leagues, code, focus);
    let Some(max_teams) = max_teams.filter(|n| *n > 0) else {
        return team_view(table, focus);
    };

    match focus {
        None | Some(Focus::Top) => StandingView {
            standings: table.into_iter().take(max_teams).collect(),
            ..StandingView::default()
        },
        Some(Focus::Bottom) => {
            let start = table.len().saturating_sub(max_teams);
            StandingView {
                standings: table[start..].to_vec(),
                ..StandingView::default()
            }
        }
        Some(Focus::Team(name)) => {
            let Some(idx) = table.iter().position(|entry| entry.team.name == *name) else {
                return StandingView {
                    standings: table.into_iter().take(max_teams).collect(),
                    ..StandingView::default()
                };
            };
            let (start, end) = focus_window(idx, table.len(), max_teams);
            StandingView {
                focus_team: Some(name.clone()),
                focus_index: Some(idx - start),
                standings: table[start..=end].to_vec(),
            }
        }
    }
}

/// Inclusive window of `max_teams` rows centred on `idx`, pushed back inside the table.
pub fn focus_window(idx: usize, len: usize, max_teams: usize) -> (usize, usize) {
    if len == 0 {
        return (0, 0);
    }
    let start = idx.saturating_sub(max_teams / 2);
    let end = (start + max_teams - 1).min(len - 1);
    let start = (end + 1).saturating_sub(max_teams);
    (start, end)
}

/// Opacity for a standings row; rows fade with distance from the focus team.
pub fn fade_opacity(
    index: usize,
    focus_index: Option<usize>,
    max_teams: Option<usize>,
    fade: bool,
) -> f32 {
    let (Some(focus), Some(max_teams)) = (focus_index, max_teams) else {
        return 1.0;
    };
    if !fade || max_teams == 0 || index == focus {
        return 1.0;
    }
    let step = index.abs_diff(focus) as f32;
    (1.0 - step / max_teams as f32).max(0.0)
}

/// Cup knockout rounds have no meaningful table.
pub fn show_table(match_day: Option<&MatchDay>) -> bool {
    match_day.is_none_or(MatchDay::is_numeric)
}

fn select_table(leagues: &[LeagueData], code: &str, focus: Option<&Focus>) -> Vec<StandingEntry> {
    let groups = leagues
        .iter()
        .find(|league| league.code == code)
        .map(|league| {
            league
                .standings
                .iter()
                .filter(|standing| standing.kind == StandingType::Total)
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    // Group stages: only the group holding the focus team.
    if groups.len() > 1 {
        if let Some(name) = focus.and_then(Focus::team_name) {
            return groups
                .iter()
                .find(|standing| standing.table.iter().any(|entry| entry.team.name == name))
                .map(|standing| standing.table.clone())
                .unwrap_or_default();
        }
    }

    groups
        .first()
        .map(|standing| standing.table.clone())
        .unwrap_or_default()
}

fn team_view(table: Vec<StandingEntry>, focus: Option<&Focus>) -> StandingView {
    let focus_team = focus.and_then(Focus::team_name);
    let focus_index =
        focus_team.and_then(|name| table.iter().position(|entry| entry.team.name == name));
    StandingView {
        focus_team: focus_index.and(focus_team.map(str::to_string)),
        focus_index,
        standings: table,
    }
}
