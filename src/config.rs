use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::football_data::FOOTBALL_DATA_BASE_URL;

const DEFAULT_SHOW: &[&str] = &["BL1", "CL", "PL"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Focus {
    Top,
    Bottom,
    Team(String),
}

impl Focus {
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        match trimmed {
            "" => None,
            "TOP" => Some(Focus::Top),
            "BOTTOM" => Some(Focus::Bottom),
            name => Some(Focus::Team(name.to_string())),
        }
    }

    pub fn team_name(&self) -> Option<&str> {
        match self {
            Focus::Team(name) => Some(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchType {
    League,
    Next,
    Daily,
}

impl MatchType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "league" => Some(MatchType::League),
            "next" => Some(MatchType::Next),
            "daily" => Some(MatchType::Daily),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceMode {
    Default,
    Short,
    None,
}

impl ReplaceMode {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "short" => ReplaceMode::Short,
            "" | "none" | "original" => ReplaceMode::None,
            _ => ReplaceMode::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub api_key: Option<String>,
    pub show: Vec<String>,
    pub focus_on: HashMap<String, Focus>,
    pub max_teams: Option<usize>,
    pub match_type: MatchType,
    pub next_matches_count: usize,
    pub days_offset: i64,
    pub update_interval: Duration,
    pub api_call_interval: Duration,
    pub live_poll_interval: Duration,
    pub show_tables: bool,
    pub show_matches: bool,
    pub fade_focus: bool,
    pub replace: ReplaceMode,
    pub replacements_file: PathBuf,
    pub debug: bool,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup. Malformed values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|val| !val.trim().is_empty());

        let show = get("SOCCER_SHOW")
            .map(|raw| parse_codes(&raw))
            .filter(|codes| !codes.is_empty())
            .unwrap_or_else(|| DEFAULT_SHOW.iter().map(|c| c.to_string()).collect());

        Self {
            api_base: get("FOOTBALL_DATA_BASE_URL")
                .unwrap_or_else(|| FOOTBALL_DATA_BASE_URL.to_string()),
            api_key: get("FOOTBALL_DATA_API_KEY").map(|key| key.trim().to_string()),
            show,
            focus_on: get("SOCCER_FOCUS_ON")
                .map(|raw| parse_focus_map(&raw))
                .unwrap_or_default(),
            max_teams: get("SOCCER_MAX_TEAMS")
                .and_then(|val| val.trim().parse::<usize>().ok())
                .filter(|n| *n > 0),
            match_type: get("SOCCER_MATCH_TYPE")
                .and_then(|val| MatchType::parse(&val))
                .unwrap_or(MatchType::League),
            next_matches_count: parse_or(get("SOCCER_NEXT_MATCHES"), 8usize).clamp(1, 50),
            days_offset: parse_or(get("SOCCER_DAYS_OFFSET"), 0i64).clamp(-30, 30),
            update_interval: Duration::from_secs(parse_or(get("SOCCER_UPDATE_SECS"), 30u64).max(5)),
            api_call_interval: Duration::from_secs(
                parse_or(get("SOCCER_API_CALL_SECS"), 600u64).max(60),
            ),
            live_poll_interval: Duration::from_secs(
                parse_or(get("SOCCER_LIVE_POLL_SECS"), 60u64).max(10),
            ),
            show_tables: parse_bool(get("SOCCER_SHOW_TABLES"), true),
            show_matches: parse_bool(get("SOCCER_SHOW_MATCHES"), true),
            fade_focus: parse_bool(get("SOCCER_FADE_FOCUS"), true),
            replace: get("SOCCER_REPLACE")
                .map(|val| ReplaceMode::parse(&val))
                .unwrap_or(ReplaceMode::Default),
            replacements_file: get("SOCCER_REPLACEMENTS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("replacements.json")),
            debug: parse_bool(get("SOCCER_DEBUG"), false),
            log_file: get("SOCCER_LOG_FILE").map(PathBuf::from),
        }
    }

    pub fn focus_for(&self, code: &str) -> Option<&Focus> {
        self.focus_on.get(code)
    }

    /// Every team named in the focus map, across competitions.
    pub fn focused_teams(&self) -> Vec<&str> {
        let mut teams = self
            .focus_on
            .values()
            .filter_map(Focus::team_name)
            .collect::<Vec<_>>();
        teams.sort_unstable();
        teams.dedup();
        teams
    }
}

fn parse_codes(raw: &str) -> Vec<String> {
    let mut codes = Vec::new();
    for code in raw.split([',', ';', ' ']) {
        let code = code.trim().to_ascii_uppercase();
        if !code.is_empty() && !codes.contains(&code) {
            codes.push(code);
        }
    }
    codes
}

fn parse_focus_map(raw: &str) -> HashMap<String, Focus> {
    raw.split([';', ','])
        .filter_map(|entry| {
            let (code, focus) = entry.split_once(':')?;
            let code = code.trim().to_ascii_uppercase();
            if code.is_empty() {
                return None;
            }
            Focus::parse(focus).map(|focus| (code, focus))
        })
        .collect()
}

fn parse_or<T: std::str::FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|val| val.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn parse_bool(raw: Option<String>, default: bool) -> bool {
    match raw.as_deref().map(|val| val.trim().to_ascii_lowercase()) {
        Some(val) if matches!(val.as_str(), "1" | "true" | "yes" | "on") => true,
        Some(val) if matches!(val.as_str(), "0" | "false" | "no" | "off") => false,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_module_defaults() {
        let config = Config::default();
        assert_eq!(config.show, vec!["BL1", "CL", "PL"]);
        assert_eq!(config.match_type, MatchType::League);
        assert_eq!(config.next_matches_count, 8);
        assert_eq!(config.api_call_interval, Duration::from_secs(600));
        assert!(config.max_teams.is_none());
        assert!(config.api_key.is_none());
    }

    #[test]
    fn focus_map_parses_teams_and_keywords() {
        let config = Config::from_lookup(lookup(&[(
            "SOCCER_FOCUS_ON",
            "pl:Arsenal FC; BL1:TOP;CL:BOTTOM;bad",
        )]));
        assert_eq!(
            config.focus_for("PL"),
            Some(&Focus::Team("Arsenal FC".to_string()))
        );
        assert_eq!(config.focus_for("BL1"), Some(&Focus::Top));
        assert_eq!(config.focus_for("CL"), Some(&Focus::Bottom));
        assert_eq!(config.focused_teams(), vec!["Arsenal FC"]);
    }

    #[test]
    fn malformed_values_fall_back() {
        let config = Config::from_lookup(lookup(&[
            ("SOCCER_MAX_TEAMS", "zero"),
            ("SOCCER_API_CALL_SECS", "5"),
            ("SOCCER_MATCH_TYPE", "weekly"),
            ("SOCCER_SHOW", " , "),
        ]));
        assert!(config.max_teams.is_none());
        assert_eq!(config.api_call_interval, Duration::from_secs(60));
        assert_eq!(config.match_type, MatchType::League);
        assert_eq!(config.show.len(), 3);
    }
}
