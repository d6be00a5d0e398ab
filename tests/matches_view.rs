use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, FixedOffset, TimeZone, Utc};

use soccer_terminal::config::{Config, Focus, MatchType};
use soccer_terminal::football_data::{Match, parse_matches_json, parse_standings_json};
use soccer_terminal::league_data::{LeagueData, LeagueStore};
use soccer_terminal::matches_view::{ViewLabel, build_match_views, match_state};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 11, 2, 15, 30, 0).unwrap()
}

fn leagues() -> Vec<LeagueData> {
    let mut store = LeagueStore::new();
    for code in ["pl", "cl"] {
        store.apply_tables(
            parse_standings_json(&read_fixture(&format!("standings_{code}.json"))).unwrap(),
        );
        store.apply_matches(
            parse_matches_json(&read_fixture(&format!("matches_{code}.json"))).unwrap(),
        );
    }
    store.leagues(&["PL".to_string(), "CL".to_string()], now())
}

fn pl_match(id: u64) -> Match {
    parse_matches_json(&read_fixture("matches_pl.json"))
        .unwrap()
        .matches
        .into_iter()
        .find(|m| m.id == id)
        .expect("fixture match")
}

fn config(match_type: MatchType) -> Config {
    let mut config = Config::default();
    config.match_type = match_type;
    config.show = vec!["PL".to_string(), "CL".to_string()];
    config.focus_on = HashMap::from([
        ("PL".to_string(), Focus::Team("Arsenal FC".to_string())),
        ("CL".to_string(), Focus::Top),
    ]);
    config
}

fn ids(rows: &[soccer_terminal::matches_view::MatchRow]) -> Vec<u64> {
    rows.iter().map(|r| r.id).collect()
}

#[test]
fn empty_data_yields_loading_view() {
    let views = build_match_views(&[], "PL", &config(MatchType::League), &now());
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].label, ViewLabel::Loading);
    assert!(views[0].matches.is_empty());
}

#[test]
fn league_view_shows_current_matchday() {
    let views = build_match_views(&leagues(), "PL", &config(MatchType::League), &now());
    assert_eq!(views.len(), 1);
    let view = &views[0];
    assert_eq!(view.label, ViewLabel::MatchDay);
    assert_eq!(view.competition, "Premier League");
    assert_eq!(view.match_day.as_deref(), Some("10"));
    assert_eq!(
        view.emblem.as_deref(),
        Some("https://crests.football-data.org/PL.png")
    );
    assert_eq!(ids(&view.matches), vec![1003, 1004, 1005]);

    let focused = view
        .matches
        .iter()
        .filter(|r| r.focused)
        .map(|r| r.id)
        .collect::<Vec<_>>();
    assert_eq!(focused, vec![1003]);
}

#[test]
fn league_view_for_cup_round_uses_stage() {
    let views = build_match_views(&leagues(), "CL", &config(MatchType::League), &now());
    let view = &views[0];
    assert_eq!(view.match_day.as_deref(), Some("LAST 16"));
    assert_eq!(ids(&view.matches), vec![2002, 2003]);
    assert!(view.matches.iter().all(|r| !r.focused));
}

#[test]
fn next_view_spans_competitions_in_kickoff_order() {
    let mut cfg = config(MatchType::Next);
    let views = build_match_views(&leagues(), "PL", &cfg, &now());
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].label, ViewLabel::NextMatches);
    // 1003 kicked off before `now`; 2002 (CL) comes before 1006 and 1007.
    assert_eq!(ids(&views[0].matches), vec![2002, 1006, 1007]);
    assert!(views[0].matches.iter().all(|r| !r.focused));

    cfg.next_matches_count = 2;
    let views = build_match_views(&leagues(), "PL", &cfg, &now());
    assert_eq!(ids(&views[0].matches), vec![2002, 1006]);
}

#[test]
fn next_view_without_focus_teams_is_empty() {
    let mut cfg = config(MatchType::Next);
    cfg.focus_on.clear();
    let views = build_match_views(&leagues(), "PL", &cfg, &now());
    assert!(views[0].matches.is_empty());
}

#[test]
fn daily_view_groups_todays_matches_by_competition() {
    let views = build_match_views(&leagues(), "PL", &config(MatchType::Daily), &now());
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].label, ViewLabel::Daily);
    assert_eq!(views[0].competition, "Premier League");
    assert_eq!(ids(&views[0].matches), vec![1003, 1004]);
    assert!(views[0].matches[0].focused);

    let mut cfg = config(MatchType::Daily);
    cfg.days_offset = -3;
    let views = build_match_views(&leagues(), "PL", &cfg, &now());
    let competitions = views.iter().map(|v| v.competition.as_str()).collect::<Vec<_>>();
    assert_eq!(competitions, vec!["UEFA Champions League"]);
    assert_eq!(ids(&views[0].matches), vec![2002]);

    cfg.days_offset = 1;
    assert!(build_match_views(&leagues(), "PL", &cfg, &now()).is_empty());
}

#[test]
fn daily_view_uses_local_calendar_day() {
    // 17:30 UTC on Nov 2nd is already Nov 3rd in UTC+8.
    let plus8 = FixedOffset::east_opt(8 * 3600).unwrap();
    let local_now = plus8.with_ymd_and_hms(2024, 11, 3, 9, 0, 0).unwrap();
    let views = build_match_views(&leagues(), "PL", &config(MatchType::Daily), &local_now);
    assert_eq!(ids(&views[0].matches), vec![1004, 1005]);
}

#[test]
fn started_matches_show_score_and_winner() {
    let views = build_match_views(&leagues(), "PL", &config(MatchType::League), &now());
    let live = &views[0].matches[0];
    assert_eq!(live.state, "1 - 0");
    assert!(live.home.winner);
    assert!(!live.away.winner);

    let finished = pl_match(1002);
    assert_eq!(match_state(&finished, &now()), "1 - 1");
}

#[test]
fn pending_match_state_depends_on_distance() {
    // Later today.
    assert_eq!(match_state(&pl_match(1004), &now()), "17:30");
    // Tomorrow (Sunday).
    assert_eq!(match_state(&pl_match(1005), &now()), "Su 14:00");
    // Just under a week ahead still shows the weekday.
    assert_eq!(match_state(&pl_match(1006), &now()), "Sa 15:00");
    // More than a week ahead.
    assert_eq!(match_state(&pl_match(1007), &now()), "23/11");
}

#[test]
fn pending_rows_never_mark_a_winner() {
    let views = build_match_views(&leagues(), "PL", &config(MatchType::League), &now());
    let pending = views[0].matches.iter().find(|r| r.id == 1004).unwrap();
    assert!(!pending.home.winner && !pending.away.winner);
}
