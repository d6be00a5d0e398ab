use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::football_data::{self, MatchesResponse, StandingsResponse};
use crate::live::{LiveEvent, LiveStatus, LiveTracker, describe_event};
use crate::state::{Delta, ProviderCommand};

#[derive(Debug, Default)]
pub struct PollResult {
    pub tables: Vec<StandingsResponse>,
    pub matches: Vec<MatchesResponse>,
    pub errors: Vec<String>,
}

/// Polls every configured competition until `Shutdown` arrives or the UI hangs up.
pub fn spawn_provider(
    config: Config,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut tracker = LiveTracker::new(config.api_call_interval);
        info!(leagues = ?config.show, "provider started");

        loop {
            let result = poll_leagues(&config);
            if !publish(&tx, &mut tracker, result, Utc::now()) {
                break;
            }

            let interval = tracker.poll_interval(&config);
            debug!(secs = interval.as_secs(), "next poll scheduled");
            match cmd_rx.recv_timeout(interval) {
                Ok(ProviderCommand::Refresh) => {
                    let _ = tx.send(Delta::Log("[INFO] Refresh requested".to_string()));
                }
                Ok(ProviderCommand::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {}
            }
        }
        info!("provider stopped");
    })
}

/// Fetches standings and matches for all competitions in parallel. A failing request
/// only drops that competition from this round.
pub fn poll_leagues(config: &Config) -> PollResult {
    let api_key = config.api_key.as_deref();
    let base = config.api_base.as_str();

    let fetched = config
        .show
        .par_iter()
        .map(|code| {
            let tables = football_data::fetch_standings(base, code, api_key);
            let matches = football_data::fetch_matches(base, code, api_key);
            (code.clone(), tables, matches)
        })
        .collect::<Vec<_>>();

    let mut out = PollResult::default();
    for (code, tables, matches) in fetched {
        match tables {
            Ok(tables) => out.tables.push(tables),
            Err(err) => out.errors.push(describe_error(&code, "standings", &err)),
        }
        match matches {
            Ok(matches) => out.matches.push(matches),
            Err(err) => out.errors.push(describe_error(&code, "matches", &err)),
        }
    }
    out
}

/// Runs live detection over a round of match responses. Returns the log-worthy
/// transitions and, when live mode flipped, the status to broadcast.
pub fn track_live(
    tracker: &mut LiveTracker,
    matches: &[MatchesResponse],
    now: DateTime<Utc>,
) -> (Vec<LiveEvent>, Option<LiveStatus>) {
    tracker.begin_poll();
    let events = matches
        .iter()
        .flat_map(|resp| tracker.observe(&resp.competition.code, &resp.matches, now))
        .collect::<Vec<_>>();
    (events, tracker.settle())
}

fn publish(
    tx: &Sender<Delta>,
    tracker: &mut LiveTracker,
    result: PollResult,
    now: DateTime<Utc>,
) -> bool {
    for err in result.errors {
        warn!("{err}");
        let _ = tx.send(Delta::Log(format!("[WARN] {err}")));
    }

    let (events, status) = track_live(tracker, &result.matches, now);
    for event in &events {
        let line = describe_event(event);
        debug!("{line}");
        let _ = tx.send(Delta::Log(line));
    }

    for tables in result.tables {
        let _ = tx.send(Delta::SetTables(tables));
    }
    for matches in result.matches {
        let _ = tx.send(Delta::SetMatches(matches));
    }
    if let Some(status) = status {
        info!(live = status.live, leagues = ?status.leagues, "live mode changed");
        let _ = tx.send(Delta::SetLive(status));
    }
    tx.send(Delta::PollFinished { at: now }).is_ok()
}

/// Console line for a failed request; quota exhaustion gets an actionable hint.
pub fn describe_error(code: &str, what: &str, err: &anyhow::Error) -> String {
    if football_data::is_quota_exceeded(err) {
        format!("{code} {what}: API request quota exceeded, try selecting fewer leagues")
    } else {
        format!("{code} {what}: {err:#}")
    }
}
