use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};

use soccer_terminal::config::Config;
use soccer_terminal::feed::track_live;
use soccer_terminal::football_data::{MatchStatus, MatchesResponse, parse_matches_json};
use soccer_terminal::live::{LiveEvent, LiveTracker, describe_event, is_live_candidate};

const API_CALL_INTERVAL: Duration = Duration::from_secs(600);

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 11, 2, hour, minute, 0).unwrap()
}

fn responses() -> Vec<MatchesResponse> {
    ["matches_pl.json", "matches_cl.json"]
        .iter()
        .map(|name| parse_matches_json(&read_fixture(name)).unwrap())
        .collect()
}

fn set_status(responses: &mut [MatchesResponse], id: u64, status: MatchStatus) {
    for resp in responses.iter_mut() {
        for m in resp.matches.iter_mut().filter(|m| m.id == id) {
            m.status = status.clone();
        }
    }
}

#[test]
fn in_play_and_imminent_matches_are_candidates() {
    let pl = &responses()[0];
    let in_play = pl.matches.iter().find(|m| m.id == 1003).unwrap();
    let later = pl.matches.iter().find(|m| m.id == 1004).unwrap();
    let finished = pl.matches.iter().find(|m| m.id == 1001).unwrap();

    assert!(is_live_candidate(in_play, at(15, 30), API_CALL_INTERVAL));
    assert!(!is_live_candidate(later, at(15, 30), API_CALL_INTERVAL));
    // 17:30 kickoff is inside the 20 minute window from 17:11 on.
    assert!(is_live_candidate(later, at(17, 11), API_CALL_INTERVAL));
    assert!(!is_live_candidate(later, at(17, 10), API_CALL_INTERVAL));
    // ...and on both sides of kickoff.
    assert!(is_live_candidate(later, at(17, 49), API_CALL_INTERVAL));
    assert!(!is_live_candidate(finished, at(15, 30), API_CALL_INTERVAL));
}

#[test]
fn paused_counts_as_live() {
    let mut all = responses();
    set_status(&mut all, 1003, MatchStatus::Paused);
    let m = all[0].matches.iter().find(|m| m.id == 1003).unwrap();
    assert!(is_live_candidate(m, at(23, 0), API_CALL_INTERVAL));
}

#[test]
fn entering_live_mode_reports_matches_and_leagues() {
    let mut tracker = LiveTracker::new(API_CALL_INTERVAL);
    let (events, status) = track_live(&mut tracker, &responses(), at(15, 30));

    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], LiveEvent::MatchStarted { id: 1003, .. }));
    assert_eq!(
        events[1],
        LiveEvent::LeagueAdded {
            code: "PL".to_string()
        }
    );

    let status = status.expect("live mode should switch on");
    assert!(status.live);
    assert_eq!(status.matches, vec![1003]);
    assert_eq!(status.leagues, vec!["PL".to_string()]);
    assert!(tracker.live_mode());
}

#[test]
fn unchanged_poll_is_quiet() {
    let mut tracker = LiveTracker::new(API_CALL_INTERVAL);
    track_live(&mut tracker, &responses(), at(15, 30));

    let (events, status) = track_live(&mut tracker, &responses(), at(15, 40));
    assert!(events.is_empty());
    assert!(status.is_none());
    assert_eq!(tracker.live_leagues(), ["PL".to_string()]);
}

#[test]
fn live_match_hands_over_and_mode_ends() {
    let mut tracker = LiveTracker::new(API_CALL_INTERVAL);
    let mut all = responses();
    track_live(&mut tracker, &all, at(15, 30));

    set_status(&mut all, 1003, MatchStatus::Finished);
    let (events, status) = track_live(&mut tracker, &all, at(17, 25));
    assert_eq!(events.len(), 2);
    assert_eq!(events[0], LiveEvent::MatchFinished { id: 1003 });
    assert!(matches!(events[1], LiveEvent::MatchStarted { id: 1004, .. }));
    assert!(status.is_none(), "still live, no mode change");
    assert_eq!(tracker.live_matches(), [1004]);

    set_status(&mut all, 1004, MatchStatus::Finished);
    let (events, status) = track_live(&mut tracker, &all, at(19, 30));
    assert_eq!(events, vec![LiveEvent::MatchFinished { id: 1004 }]);
    let status = status.expect("live mode should switch off");
    assert!(!status.live);
    assert!(status.matches.is_empty());
    assert!(status.leagues.is_empty());
    assert!(!tracker.live_mode());
}

#[test]
fn poll_interval_follows_live_leagues() {
    let mut config = Config::default();
    config.api_call_interval = API_CALL_INTERVAL;
    config.live_poll_interval = Duration::from_secs(60);

    let mut tracker = LiveTracker::new(config.api_call_interval);
    assert_eq!(tracker.poll_interval(&config), API_CALL_INTERVAL);

    track_live(&mut tracker, &responses(), at(15, 30));
    assert_eq!(tracker.poll_interval(&config), Duration::from_secs(60));

    track_live(&mut tracker, &responses(), at(22, 0));
    // 1003 is still IN_PLAY in the fixture.
    assert_eq!(tracker.poll_interval(&config), Duration::from_secs(60));

    let mut all = responses();
    set_status(&mut all, 1003, MatchStatus::Finished);
    track_live(&mut tracker, &all, at(22, 0));
    assert_eq!(tracker.poll_interval(&config), API_CALL_INTERVAL);
}

#[test]
fn events_render_as_log_lines() {
    let started = LiveEvent::MatchStarted {
        id: 1004,
        kickoff: Some(at(17, 30)),
        home: "Liverpool FC".to_string(),
    };
    assert_eq!(
        describe_event(&started),
        "[INFO] Live match 1004 detected (kickoff 17:30 UTC, home Liverpool FC)"
    );
    assert_eq!(
        describe_event(&LiveEvent::MatchFinished { id: 7 }),
        "[INFO] Live match 7 finished"
    );
    assert_eq!(
        describe_event(&LiveEvent::LeagueAdded {
            code: "CL".to_string()
        }),
        "[INFO] Live league CL added"
    );
}
