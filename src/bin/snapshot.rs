use anyhow::Result;
use chrono::{Local, Utc};

use soccer_terminal::config::{Config, MatchType};
use soccer_terminal::feed;
use soccer_terminal::logging;
use soccer_terminal::replacements::Replacements;
use soccer_terminal::state::{AppState, Delta, apply_delta};

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let mut config = Config::from_env();
    if let Some(match_type) = parse_match_type_arg() {
        config.match_type = match_type;
    }
    logging::init_stderr_logger(config.debug);
    let replacements = Replacements::load(&config.replacements_file)?;

    let result = feed::poll_leagues(&config);
    for err in &result.errors {
        eprintln!("warning: {err}");
    }

    let mut state = AppState::new(config.clone());
    for tables in result.tables {
        apply_delta(&mut state, Delta::SetTables(tables));
    }
    for matches in result.matches {
        apply_delta(&mut state, Delta::SetMatches(matches));
    }

    let now = Local::now();
    for (idx, code) in config.show.iter().enumerate() {
        state.competition_index = idx;
        println!("== {code} ==");

        if config.match_type == MatchType::League {
            let view = state.standings_view(Utc::now());
            for (idx, entry) in view.standings.iter().enumerate() {
                let marker = if view.focus_index == Some(idx) { '>' } else { ' ' };
                println!(
                    "{marker}{:>3} {:<28} {:>3} {:>4}",
                    entry.position,
                    replacements.display_name(&entry.team.name, config.replace),
                    entry.played_games.unwrap_or_default(),
                    entry.points
                );
            }
        }

        for view in state.match_views(now) {
            let day = view.match_day.as_deref().unwrap_or("");
            println!("-- {} {} {day}", view.competition, view.label.as_str());
            for row in &view.matches {
                println!(
                    "{}{:>24} {:^11} {}",
                    if row.focused { '*' } else { ' ' },
                    replacements.display_name(&row.home.name, config.replace),
                    row.state,
                    replacements.display_name(&row.away.name, config.replace)
                );
            }
        }

        // The cross-league "next" view is identical for every competition.
        if config.match_type == MatchType::Next {
            break;
        }
    }

    Ok(())
}

fn parse_match_type_arg() -> Option<MatchType> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix("--view=") {
            return MatchType::parse(raw);
        }
        if arg == "--view" {
            return args.get(idx + 1).and_then(|raw| MatchType::parse(raw));
        }
    }
    None
}
