use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local, Utc};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};

use soccer_terminal::config::Config;
use soccer_terminal::feed;
use soccer_terminal::league_data::LeagueData;
use soccer_terminal::logging;
use soccer_terminal::matches_view::{MatchRow, MatchView, TeamCell};
use soccer_terminal::replacements::Replacements;
use soccer_terminal::standings_view::fade_opacity;
use soccer_terminal::state::{self, AppState, Delta, ProviderCommand, apply_delta};

struct App {
    state: AppState,
    replacements: Replacements,
    should_quit: bool,
    cmd_tx: mpsc::Sender<ProviderCommand>,
    last_rotation: Instant,
}

impl App {
    fn new(state: AppState, replacements: Replacements, cmd_tx: mpsc::Sender<ProviderCommand>) -> Self {
        Self {
            state,
            replacements,
            should_quit: false,
            cmd_tx,
            last_rotation: Instant::now(),
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Right | KeyCode::Char('l') => self.state.next_mode(),
            KeyCode::Left | KeyCode::Char('h') => self.state.prev_mode(),
            KeyCode::Tab | KeyCode::Char('n') => {
                self.state.next_league();
                self.last_rotation = Instant::now();
            }
            KeyCode::BackTab | KeyCode::Char('p') => {
                self.state.prev_league();
                self.last_rotation = Instant::now();
            }
            KeyCode::Char('r') => self.request_refresh(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn request_refresh(&mut self) {
        if self.cmd_tx.send(ProviderCommand::Refresh).is_err() {
            self.state.push_log("[WARN] Refresh request failed, poller stopped");
        }
    }

    fn maybe_rotate(&mut self) {
        if self.last_rotation.elapsed() >= self.state.config.update_interval {
            self.state.next_league();
            tracing::debug!(competition = self.state.competition(), "rotated competition");
            self.last_rotation = Instant::now();
        }
    }

    fn team_name<'a>(&'a self, name: &'a str) -> std::borrow::Cow<'a, str> {
        self.replacements.display_name(name, self.state.config.replace)
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let config = Config::from_env();
    if let Some(path) = config.log_file.as_deref() {
        if let Err(err) = logging::init_file_logger(path, config.debug) {
            eprintln!("warning: {err:#}");
        }
    }

    let mut state = AppState::new(config.clone());
    let replacements = match Replacements::load(&config.replacements_file) {
        Ok(replacements) => replacements,
        Err(err) => {
            state.push_log(format!("[WARN] {err:#}"));
            Replacements::default()
        }
    };
    if config.api_key.is_none() {
        state.push_log("[WARN] FOOTBALL_DATA_API_KEY not set, requests may be rejected");
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let provider = feed::spawn_provider(config, tx, cmd_rx);

    let mut app = App::new(state, replacements, cmd_tx);
    let res = run_app(&mut terminal, &mut app, rx);

    let _ = app.cmd_tx.send(ProviderCommand::Shutdown);
    drop(provider);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        app.maybe_rotate();

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_line(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    render_body(frame, chunks[1], app);

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(
        "←/→ View | Tab/n Next league | p Prev league | r Refresh | ? Help | q Quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_line(state: &AppState) -> Line<'static> {
    let code = state.competition().to_string();
    let name = state
        .store
        .tables
        .get(&code)
        .map(|t| t.competition.name.clone())
        .or_else(|| state.store.matches.get(&code).map(|m| m.competition.name.clone()))
        .unwrap_or_else(|| code.clone());
    let view = state.header_label(Utc::now());
    let polled = state
        .last_poll
        .map(|at| at.with_timezone(&Local).format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string());

    let mut spans = vec![
        Span::styled(" SOCCER ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!("| {name} ({code}) | {view} | updated {polled} ")),
    ];
    if state.live.live {
        spans.push(Span::styled(
            " LIVE ",
            Style::default().fg(Color::Black).bg(Color::Red),
        ));
    }
    Line::from(spans)
}

fn render_body(frame: &mut Frame, area: Rect, app: &App) {
    let state = &app.state;
    if state.loading {
        let msg = if state.store.is_empty() {
            "LOADING".to_string()
        } else {
            format!("LOADING {}", state.competition())
        };
        frame.render_widget(
            Paragraph::new(msg).style(Style::default().fg(Color::DarkGray)),
            area,
        );
        return;
    }

    let show_tables = state.show_tables_pane();
    let show_matches = state.show_matches_pane();
    let now = Local::now();
    let leagues = if show_tables || show_matches {
        state.league_data(now.with_timezone(&Utc))
    } else {
        Vec::new()
    };
    match (show_tables, show_matches) {
        (true, true) => {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(area);
            render_standings(frame, cols[0], app, &leagues);
            render_matches(frame, cols[1], app, &leagues, now);
        }
        (true, false) => render_standings(frame, area, app, &leagues),
        (false, true) => render_matches(frame, area, app, &leagues, now),
        (false, false) => frame.render_widget(
            Paragraph::new("Nothing to show for this view")
                .style(Style::default().fg(Color::DarkGray)),
            area,
        ),
    }
}

fn render_standings(frame: &mut Frame, area: Rect, app: &App, leagues: &[LeagueData]) {
    let state = &app.state;
    let view = state.standings_view_for(leagues);
    let block = Block::default().title("Standings").borders(Borders::ALL);
    if view.standings.is_empty() {
        frame.render_widget(
            Paragraph::new("No standings for this competition").block(block),
            area,
        );
        return;
    }

    let header = Row::new(["#", "Team", "P", "W", "D", "L", "GD", "Pts"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows = view.standings.iter().enumerate().map(|(idx, entry)| {
        let opacity = fade_opacity(
            idx,
            view.focus_index,
            state.config.max_teams,
            state.config.fade_focus,
        );
        let mut style = Style::default().fg(fade_color(opacity));
        if view.focus_index == Some(idx) {
            style = style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
        }
        Row::new(vec![
            Cell::from(entry.position.to_string()),
            Cell::from(app.team_name(&entry.team.name).into_owned()),
            Cell::from(entry.played_games.map(|n| n.to_string()).unwrap_or_default()),
            Cell::from(entry.won.to_string()),
            Cell::from(entry.draw.to_string()),
            Cell::from(entry.lost.to_string()),
            Cell::from(
                entry
                    .goal_difference
                    .map(|gd| format!("{gd:+}"))
                    .unwrap_or_default(),
            ),
            Cell::from(entry.points.to_string()),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Length(3),
        Constraint::Min(16),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(4),
        Constraint::Length(4),
    ];
    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, area);
}

fn render_matches(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    leagues: &[LeagueData],
    now: DateTime<Local>,
) {
    let views = app.state.match_views_for(leagues, now);
    let mut lines: Vec<Line> = Vec::new();
    for view in &views {
        lines.push(Line::from(Span::styled(
            view_heading(view),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        if view.matches.is_empty() {
            lines.push(Line::from(Span::styled(
                "  no matches",
                Style::default().fg(Color::DarkGray),
            )));
        }
        for row in &view.matches {
            lines.push(match_line(app, row));
        }
        lines.push(Line::default());
    }
    if views.is_empty() {
        lines.push(Line::from(Span::styled(
            "No matches for this view",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let paragraph =
        Paragraph::new(lines).block(Block::default().title("Matches").borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn view_heading(view: &MatchView) -> String {
    let label = view.label.as_str();
    match (&view.match_day, view.competition.is_empty()) {
        (Some(day), false) => format!("{} | {label}: {day}", view.competition),
        (None, false) => format!("{} | {label}", view.competition),
        (_, true) => label.to_string(),
    }
}

fn match_line<'a>(app: &'a App, row: &MatchRow) -> Line<'a> {
    let base = if row.focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let state_style = if row.status.is_in_progress() {
        base.fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        base
    };
    Line::from(vec![
        Span::styled(
            format!("{:>22} ", app.team_name(&row.home.name)),
            team_style(base, &row.home),
        ),
        Span::styled(format!("{:^11}", row.state), state_style),
        Span::styled(
            format!(" {}", app.team_name(&row.away.name)),
            team_style(base, &row.away),
        ),
    ])
}

fn team_style(base: Style, team: &TeamCell) -> Style {
    if team.winner {
        base.add_modifier(Modifier::BOLD)
    } else {
        base
    }
}

fn fade_color(opacity: f32) -> Color {
    if opacity >= 1.0 {
        return Color::Reset;
    }
    let level = (80.0 + 175.0 * opacity.clamp(0.0, 1.0)) as u8;
    Color::Rgb(level, level, level)
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No alerts yet".to_string();
    }
    let start = state.logs.len().saturating_sub(3);
    state
        .logs
        .iter()
        .skip(start)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let views = state::DisplayMode::ALL
        .iter()
        .map(|m| m.label())
        .collect::<Vec<_>>()
        .join(" → ");
    let text = [
        "Soccer Terminal - Help".to_string(),
        String::new(),
        "  ← / →        Cycle views".to_string(),
        format!("               {views}"),
        "  Tab / n      Next competition".to_string(),
        "  Shift-Tab/p  Previous competition".to_string(),
        "  r            Poll football-data now".to_string(),
        "  ?            Toggle help".to_string(),
        "  q / Esc      Quit".to_string(),
        String::new(),
        "Competitions rotate automatically; live mode polls faster".to_string(),
        "while matches are in progress.".to_string(),
    ]
    .join("\n");

    let help = Paragraph::new(text).block(Block::default().title("Help").borders(Borders::ALL));
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
