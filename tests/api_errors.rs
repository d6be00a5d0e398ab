use anyhow::Context;
use reqwest::StatusCode;

use soccer_terminal::feed::describe_error;
use soccer_terminal::football_data::{ApiError, is_quota_exceeded, matches_url};

fn wrapped(err: ApiError) -> anyhow::Error {
    let url = matches_url("https://api.football-data.org/v4", "PL");
    Err::<(), _>(err)
        .with_context(|| format!("GET {url}"))
        .unwrap_err()
}

#[test]
fn quota_error_is_found_through_context() {
    let err = wrapped(ApiError::QuotaExceeded);
    assert!(is_quota_exceeded(&err));
    assert_eq!(
        describe_error("PL", "matches", &err),
        "PL matches: API request quota exceeded, try selecting fewer leagues"
    );
}

#[test]
fn other_statuses_are_not_quota_errors() {
    let err = wrapped(ApiError::Status {
        status: StatusCode::FORBIDDEN,
        body: "restricted resource".to_string(),
    });
    assert!(!is_quota_exceeded(&err));

    let line = describe_error("CL", "standings", &err);
    assert!(line.starts_with("CL standings: GET https://api.football-data.org/v4/competitions/PL/matches"));
    assert!(line.contains("http 403 Forbidden: restricted resource"));
    assert!(!line.contains("quota"));
}

#[test]
fn parse_failures_are_not_quota_errors() {
    let err = soccer_terminal::football_data::parse_matches_json("null").unwrap_err();
    assert!(!is_quota_exceeded(&err));
    assert_eq!(
        describe_error("BL1", "matches", &err),
        "BL1 matches: empty matches response"
    );
}
