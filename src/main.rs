use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant, SystemTime};

use chrono::{DateTime, Local};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Gauge, Paragraph};

use madness_terminal::api_fetch::{TeamComparison, TeamProfile, TournamentPrediction};
use madness_terminal::classify::{
    bubble_band, bubble_band_color, bubble_band_label, comparison_insights, percentile_tier,
    percentile_tier_color, percentile_tier_label, potential_level_color, probability_tier,
    probability_tier_color, probability_tier_label, risk_level, risk_level_color,
};
use madness_terminal::state::{
    AlertsTab, AppState, BackendStatus, CompareFocus, Delta, FetchState, ProviderCommand, Screen,
    TOP_TEAMS_LIMIT, apply_delta, screen_label,
};
use madness_terminal::team_search::{SearchOutcome, filter_catalog};
use madness_terminal::{demo_feed, provider};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: mpsc::Sender<ProviderCommand>,
}

impl App {
    fn new(cmd_tx: mpsc::Sender<ProviderCommand>) -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            cmd_tx,
        }
    }

    fn send(&mut self, cmd: ProviderCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            self.state.push_log("[WARN] Fetch worker unavailable");
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.help_overlay {
            self.state.help_overlay = false;
            return;
        }

        if self.selector_is_open() {
            self.on_selector_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.switch_screen(Screen::Overview),
            KeyCode::Char('2') => self.switch_screen(Screen::Predict),
            KeyCode::Char('3') => self.switch_screen(Screen::Compare),
            KeyCode::Char('4') => self.switch_screen(Screen::Bubble),
            KeyCode::Char('5') => self.switch_screen(Screen::Alerts),
            KeyCode::Char('6') => self.switch_screen(Screen::Profile),
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.state.cycle_year();
                self.on_year_changed();
            }
            KeyCode::Char('/') => self.focus_selector(),
            KeyCode::Tab => {
                if self.state.screen == Screen::Compare {
                    self.state.compare_focus = match self.state.compare_focus {
                        CompareFocus::Team1 => CompareFocus::Team2,
                        CompareFocus::Team2 => CompareFocus::Team1,
                    };
                }
            }
            KeyCode::Enter => self.run_current_view(),
            KeyCode::Char('r') | KeyCode::Char('R') => self.refresh_current_view(),
            KeyCode::Char('u') | KeyCode::Char('U') => {
                if self.state.screen == Screen::Alerts {
                    self.state.alerts_tab = match self.state.alerts_tab {
                        AlertsTab::Upsets => AlertsTab::Cinderella,
                        AlertsTab::Cinderella => AlertsTab::Upsets,
                    };
                    self.state.alerts_selected = 0;
                }
            }
            KeyCode::Char('j') | KeyCode::Down => self.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.select_prev(),
            KeyCode::Char('?') => self.state.help_overlay = true,
            _ => {}
        }
    }

    fn selector_is_open(&mut self) -> bool {
        self.state
            .active_selector()
            .map(|selector| selector.open)
            .unwrap_or(false)
    }

    fn on_selector_key(&mut self, key: KeyEvent) {
        let result_len = match self.selector_results() {
            Some(SearchOutcome::Matches { teams, .. }) => teams.len(),
            _ => 0,
        };
        let highlighted = self.highlighted_team();
        let screen = self.state.screen;
        let Some(selector) = self.state.active_selector() else {
            return;
        };
        match key.code {
            KeyCode::Esc => selector.dismiss(),
            KeyCode::Backspace => selector.backspace(),
            KeyCode::Down => selector.highlight_next(result_len),
            KeyCode::Up => selector.highlight_prev(),
            KeyCode::Enter => {
                if let Some(team) = highlighted {
                    selector.commit(&team);
                    // The profile view fetches as soon as its parameter
                    // changes; predict/compare wait for an explicit run.
                    if screen == Screen::Profile {
                        self.request_profile();
                    }
                } else {
                    selector.dismiss();
                }
            }
            KeyCode::Tab => {
                if screen == Screen::Compare {
                    selector.dismiss();
                    self.state.compare_focus = match self.state.compare_focus {
                        CompareFocus::Team1 => CompareFocus::Team2,
                        CompareFocus::Team2 => CompareFocus::Team1,
                    };
                }
            }
            KeyCode::Char(ch) => selector.input_char(ch),
            _ => {}
        }
    }

    fn selector_results(&mut self) -> Option<SearchOutcome> {
        let catalog: Vec<String> = self.state.catalog_teams().to_vec();
        let selector = self.state.active_selector()?;
        if !selector.open {
            return None;
        }
        Some(filter_catalog(&catalog, &selector.search))
    }

    fn highlighted_team(&mut self) -> Option<String> {
        let outcome = self.selector_results()?;
        let idx = self.state.active_selector()?.highlighted;
        match outcome {
            SearchOutcome::Matches { teams, .. } => teams.get(idx).cloned(),
            SearchOutcome::NoMatches { .. } => None,
        }
    }

    fn focus_selector(&mut self) {
        self.ensure_catalog();
        if let Some(selector) = self.state.active_selector() {
            selector.focus();
        }
    }

    /// The catalog is fetched once per session, on first selector use.
    fn ensure_catalog(&mut self) {
        if matches!(self.state.catalog.state, FetchState::Idle) {
            let generation = self.state.catalog.begin();
            self.send(ProviderCommand::FetchCatalog { generation });
        }
    }

    fn switch_screen(&mut self, screen: Screen) {
        self.state.screen = screen;
        match screen {
            Screen::Overview => {
                if matches!(self.state.top_teams.state, FetchState::Idle) {
                    self.request_overview();
                }
            }
            Screen::Bubble => {
                if matches!(self.state.bubble_teams.state, FetchState::Idle) {
                    self.request_bubble();
                }
            }
            Screen::Alerts => {
                if matches!(self.state.alerts.state, FetchState::Idle) {
                    self.request_alerts();
                }
            }
            Screen::Predict | Screen::Compare | Screen::Profile => self.ensure_catalog(),
        }
    }

    /// Parameter change: views with committed inputs refetch immediately.
    fn on_year_changed(&mut self) {
        match self.state.screen {
            Screen::Overview => self.request_overview(),
            Screen::Bubble => self.request_bubble(),
            Screen::Alerts => self.request_alerts(),
            Screen::Predict => {
                if !self.state.predict_selector.value.trim().is_empty() {
                    self.request_prediction();
                }
            }
            Screen::Compare => {
                if !self.state.compare_team1.value.trim().is_empty()
                    && !self.state.compare_team2.value.trim().is_empty()
                {
                    self.request_comparison();
                }
            }
            Screen::Profile => {
                if !self.state.profile_selector.value.trim().is_empty() {
                    self.request_profile();
                }
            }
        }
    }

    fn run_current_view(&mut self) {
        match self.state.screen {
            Screen::Predict => self.request_prediction(),
            Screen::Compare => self.request_comparison(),
            Screen::Profile => self.request_profile(),
            Screen::Overview => self.request_overview(),
            Screen::Bubble => self.request_bubble(),
            Screen::Alerts => self.request_alerts(),
        }
    }

    fn refresh_current_view(&mut self) {
        self.run_current_view();
        self.state.push_log("[INFO] Refresh requested");
    }

    fn request_prediction(&mut self) {
        let team = self.state.predict_selector.value.trim().to_string();
        if team.is_empty() {
            // Local validation; no request leaves the app.
            self.state.prediction.fail_local("Please enter a team name");
            return;
        }
        let year = self.state.predict_year;
        let generation = self.state.prediction.begin();
        self.send(ProviderCommand::FetchPrediction {
            generation,
            team,
            year,
        });
    }

    fn request_comparison(&mut self) {
        let team1 = self.state.compare_team1.value.trim().to_string();
        let team2 = self.state.compare_team2.value.trim().to_string();
        if team1.is_empty() || team2.is_empty() {
            self.state
                .comparison
                .fail_local("Please enter both team names");
            return;
        }
        let year = self.state.compare_year;
        let generation = self.state.comparison.begin();
        self.send(ProviderCommand::FetchComparison {
            generation,
            team1,
            team2,
            year,
        });
    }

    fn request_profile(&mut self) {
        let team = self.state.profile_selector.value.trim().to_string();
        if team.is_empty() {
            self.state.profile.fail_local("Please enter a team name");
            return;
        }
        let year = self.state.profile_year;
        let generation = self.state.profile.begin();
        self.send(ProviderCommand::FetchProfile {
            generation,
            team,
            year,
        });
    }

    fn request_overview(&mut self) {
        let year = self.state.overview_year;
        let generation = self.state.top_teams.begin();
        self.send(ProviderCommand::FetchTopTeams {
            generation,
            year,
            limit: TOP_TEAMS_LIMIT,
        });
        let generation = self.state.conferences.begin();
        self.send(ProviderCommand::FetchConferences { generation, year });
    }

    fn request_bubble(&mut self) {
        let year = self.state.bubble_year;
        let generation = self.state.bubble_teams.begin();
        self.send(ProviderCommand::FetchBubbleTeams { generation, year });
    }

    fn request_alerts(&mut self) {
        let year = self.state.alerts_year;
        let generation = self.state.alerts.begin();
        self.send(ProviderCommand::FetchAlerts { generation, year });
    }

    fn select_next(&mut self) {
        match self.state.screen {
            Screen::Overview => {
                let len = self.state.top_teams.data().map(Vec::len).unwrap_or(0);
                if len > 0 {
                    self.state.top_teams_selected =
                        (self.state.top_teams_selected + 1).min(len - 1);
                }
            }
            Screen::Bubble => {
                let len = self.state.bubble_teams.data().map(Vec::len).unwrap_or(0);
                if len > 0 {
                    self.state.bubble_selected = (self.state.bubble_selected + 1).min(len - 1);
                }
            }
            Screen::Alerts => {
                let len = self.alerts_tab_len();
                if len > 0 {
                    self.state.alerts_selected = (self.state.alerts_selected + 1).min(len - 1);
                }
            }
            _ => {}
        }
    }

    fn select_prev(&mut self) {
        match self.state.screen {
            Screen::Overview => {
                self.state.top_teams_selected = self.state.top_teams_selected.saturating_sub(1);
            }
            Screen::Bubble => {
                self.state.bubble_selected = self.state.bubble_selected.saturating_sub(1);
            }
            Screen::Alerts => {
                self.state.alerts_selected = self.state.alerts_selected.saturating_sub(1);
            }
            _ => {}
        }
    }

    fn alerts_tab_len(&self) -> usize {
        match (self.state.alerts.data(), self.state.alerts_tab) {
            (Some(bundle), AlertsTab::Upsets) => bundle.upsets.len(),
            (Some(bundle), AlertsTab::Cinderella) => bundle.cinderella.len(),
            (None, _) => 0,
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let demo = std::env::var("MM_DEMO_FEED")
        .map(|val| val == "1" || val.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if demo {
        demo_feed::spawn_demo_provider(tx, cmd_rx);
    } else {
        provider::spawn_provider(tx, cmd_rx);
    }

    let mut app = App::new(cmd_tx);
    if demo {
        app.state.push_log("[INFO] Demo feed enabled");
    }
    app.send(ProviderCommand::ProbeHealth);
    app.request_overview();

    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
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

fn ui(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header =
        Paragraph::new(header_text(&app.state)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Overview => render_overview(frame, chunks[1], &app.state),
        Screen::Predict => render_predict(frame, chunks[1], app),
        Screen::Compare => render_compare(frame, chunks[1], app),
        Screen::Bubble => render_bubble(frame, chunks[1], &app.state),
        Screen::Alerts => render_alerts(frame, chunks[1], &app.state),
        Screen::Profile => render_profile(frame, chunks[1], app),
    }

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(&app.state));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let backend = match state.backend {
        BackendStatus::Probing => "PROBING",
        BackendStatus::Connected => "LIVE",
        BackendStatus::Down => "OFFLINE",
    };
    let line1 = format!(
        "  .-.  MADNESS TERMINAL | {} | Year: {} | Backend: {}",
        screen_label(state.screen),
        state.current_year(),
        backend
    );
    let line2 = " ( o )".to_string();
    let line3 = "  `-'".to_string();
    format!("{line1}\n{line2}\n{line3}")
}

fn footer_text(state: &AppState) -> String {
    let base = "1-6 Screens | y Year | Enter Run | r Refresh | ? Help | q Quit";
    match state.screen {
        Screen::Predict | Screen::Profile => format!("/ Team search | {base}"),
        Screen::Compare => format!("/ Team search | Tab Switch side | {base}"),
        Screen::Alerts => format!("u Tab | j/k Move | {base}"),
        Screen::Overview | Screen::Bubble => format!("j/k Move | {base}"),
    }
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No activity yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(2)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_fetched_at(fetched_at: SystemTime) -> String {
    let stamp: DateTime<Local> = fetched_at.into();
    stamp.format("%H:%M:%S").to_string()
}

fn render_overview(frame: &mut Frame, area: Rect, state: &AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
        .split(area);

    let top_block = Block::default()
        .title(format!("Top Teams {}", state.overview_year))
        .borders(Borders::ALL);
    let top_inner = top_block.inner(columns[0]);
    frame.render_widget(top_block, columns[0]);
    render_top_teams(frame, top_inner, state);

    let conf_block = Block::default()
        .title("Conference Strength")
        .borders(Borders::ALL);
    let conf_inner = conf_block.inner(columns[1]);
    frame.render_widget(conf_block, columns[1]);
    render_conferences(frame, conf_inner, state);
}

fn render_top_teams(frame: &mut Frame, area: Rect, state: &AppState) {
    match &state.top_teams.state {
        FetchState::Idle => render_dim(frame, area, "Press Enter to load"),
        FetchState::Loading => render_dim(frame, area, "Loading top teams..."),
        FetchState::Failed(message) => render_error(frame, area, message),
        FetchState::Ready { data, fetched_at } => {
            if data.is_empty() {
                render_dim(
                    frame,
                    area,
                    &format!("No team data for {}", state.overview_year),
                );
                return;
            }
            let mut lines = vec![Line::from(Span::styled(
                format!(
                    "{:<4}{:<22}{:<7}{:>6}  {:>9}  {:>6}",
                    "#", "Team", "Conf", "Eff", "Record", "Ready"
                ),
                Style::default().add_modifier(Modifier::BOLD),
            ))];
            let visible = area.height.saturating_sub(2) as usize;
            let start = state
                .top_teams_selected
                .saturating_sub(visible.saturating_sub(1));
            for (idx, team) in data.iter().enumerate().skip(start).take(visible.max(1)) {
                let tier = probability_tier(team.tournament_readiness);
                let style = if idx == state.top_teams_selected {
                    Style::default().fg(Color::White).bg(Color::DarkGray)
                } else {
                    Style::default()
                };
                lines.push(Line::from(vec![
                    Span::styled(
                        format!(
                            "{:<4}{:<22}{:<7}{:>6.1}  {:>9}  ",
                            idx + 1,
                            clip(&team.team, 21),
                            clip(&team.conference, 6),
                            team.efficiency,
                            team.record,
                        ),
                        style,
                    ),
                    Span::styled(
                        format!("{:>6}", probability_tier_label(tier)),
                        style.fg(probability_tier_color(tier)),
                    ),
                ]));
            }
            lines.push(Line::from(Span::styled(
                format!("Updated {}", format_fetched_at(*fetched_at)),
                Style::default().fg(Color::DarkGray),
            )));
            frame.render_widget(Paragraph::new(lines), area);
        }
    }
}

fn render_conferences(frame: &mut Frame, area: Rect, state: &AppState) {
    match &state.conferences.state {
        FetchState::Idle => render_dim(frame, area, "Press Enter to load"),
        FetchState::Loading => render_dim(frame, area, "Loading conferences..."),
        FetchState::Failed(message) => render_error(frame, area, message),
        FetchState::Ready { data, .. } => {
            if data.is_empty() {
                render_dim(frame, area, "No conference data");
                return;
            }
            let mut lines = vec![Line::from(Span::styled(
                format!(
                    "{:<7}{:>7}{:>7}{:>6}  {}",
                    "Conf", "AvgEff", "TRate", "Teams", "Top Team"
                ),
                Style::default().add_modifier(Modifier::BOLD),
            ))];
            for conf in data.iter().take(area.height.saturating_sub(1) as usize) {
                lines.push(Line::from(format!(
                    "{:<7}{:>7.1}{:>6.0}%{:>6}  {}",
                    clip(&conf.conference, 6),
                    conf.avg_efficiency,
                    conf.tournament_rate * 100.0,
                    conf.teams_count,
                    clip(&conf.top_team, 18),
                )));
            }
            frame.render_widget(Paragraph::new(lines), area);
        }
    }
}

fn render_predict(frame: &mut Frame, area: Rect, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    render_selector_input(
        frame,
        rows[0],
        "Team",
        app.state.predict_selector.display_value(),
        true,
        app.state.predict_selector.open,
    );

    if app.state.predict_selector.open {
        render_selector_panel(frame, rows[1], app);
        return;
    }

    match &app.state.prediction.state {
        FetchState::Idle => render_dim(
            frame,
            rows[1],
            "Search a team with '/' then press Enter to predict",
        ),
        FetchState::Loading => render_dim(frame, rows[1], "Predicting..."),
        FetchState::Failed(message) => render_error(frame, rows[1], message),
        FetchState::Ready { data, fetched_at } => {
            render_prediction(frame, rows[1], data, *fetched_at);
        }
    }
}

fn render_prediction(
    frame: &mut Frame,
    area: Rect,
    prediction: &TournamentPrediction,
    fetched_at: SystemTime,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    let tier = probability_tier(prediction.tournament_probability);
    let gauge = Gauge::default()
        .block(Block::default().title("Tournament Probability").borders(Borders::ALL))
        .gauge_style(Style::default().fg(probability_tier_color(tier)))
        .ratio(prediction.tournament_probability.clamp(0.0, 1.0))
        .label(format!(
            "{:.1}% ({})",
            prediction.tournament_probability * 100.0,
            probability_tier_label(tier)
        ));
    frame.render_widget(gauge, rows[0]);

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!("{} {}", prediction.team, prediction.year),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("  Record: {}", prediction.current_record)),
        ]),
        Line::from(format!(
            "Efficiency score: {:+.1}   Confidence: {}",
            prediction.efficiency_score, prediction.prediction_confidence
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Key factors",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];
    for factor in &prediction.key_factors {
        lines.push(Line::from(format!("  - {factor}")));
    }
    lines.push(Line::from(Span::styled(
        format!("Updated {}", format_fetched_at(fetched_at)),
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(Paragraph::new(lines), rows[1]);
}

fn render_compare(frame: &mut Frame, area: Rect, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    let inputs = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    render_selector_input(
        frame,
        inputs[0],
        "Team 1",
        app.state.compare_team1.display_value(),
        app.state.compare_focus == CompareFocus::Team1,
        app.state.compare_team1.open,
    );
    render_selector_input(
        frame,
        inputs[1],
        "Team 2",
        app.state.compare_team2.display_value(),
        app.state.compare_focus == CompareFocus::Team2,
        app.state.compare_team2.open,
    );

    if app.state.compare_team1.open || app.state.compare_team2.open {
        render_selector_panel(frame, rows[1], app);
        return;
    }

    match &app.state.comparison.state {
        FetchState::Idle => render_dim(
            frame,
            rows[1],
            "Pick both teams ('/' to search, Tab to switch side), then Enter",
        ),
        FetchState::Loading => render_dim(frame, rows[1], "Comparing teams..."),
        FetchState::Failed(message) => render_error(frame, rows[1], message),
        FetchState::Ready { data, .. } => render_comparison(frame, rows[1], data),
    }
}

fn render_comparison(frame: &mut Frame, area: Rect, comparison: &TeamComparison) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(6), Constraint::Min(1)])
        .split(area);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(format!("Predicted winner: {}", comparison.winner_prediction))
                .borders(Borders::ALL),
        )
        .gauge_style(Style::default().fg(Color::Blue))
        .ratio(comparison.win_probability.clamp(0.0, 1.0))
        .label(format!(
            "{:.1}% win probability",
            comparison.win_probability * 100.0
        ));
    frame.render_widget(gauge, rows[0]);

    let diffs = &comparison.key_differences;
    let detail_lines = vec![
        Line::from(format!(
            "Efficiency gap: {:+.1} ({} vs {})",
            diffs.efficiency_gap, comparison.team1, comparison.team2
        )),
        Line::from(format!("Pace difference: {:+.1}", diffs.pace_difference)),
        Line::from(format!("Offensive advantage: {}", diffs.offensive_advantage)),
        Line::from(format!("Defensive advantage: {}", diffs.defensive_advantage)),
        Line::from(format!(
            "Experience edge: {}",
            diffs.experience_edge.as_deref().unwrap_or("-")
        )),
    ];
    let details = Paragraph::new(detail_lines)
        .block(Block::default().title("Key Differences").borders(Borders::ALL));
    frame.render_widget(details, rows[1]);

    let insights: Vec<Line> = comparison_insights(comparison)
        .into_iter()
        .map(|sentence| Line::from(format!("- {sentence}")))
        .collect();
    let insights = Paragraph::new(insights)
        .block(Block::default().title("Matchup Insights").borders(Borders::ALL));
    frame.render_widget(insights, rows[2]);
}

fn render_bubble(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title(format!("Bubble Teams {}", state.bubble_year))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match &state.bubble_teams.state {
        FetchState::Idle => render_dim(frame, inner, "Press Enter to load"),
        FetchState::Loading => render_dim(frame, inner, "Loading bubble teams..."),
        FetchState::Failed(message) => render_error(frame, inner, message),
        FetchState::Ready { data, .. } => {
            if data.is_empty() {
                render_dim(
                    frame,
                    inner,
                    &format!("No bubble teams found for {}", state.bubble_year),
                );
                return;
            }
            let mut lines = vec![Line::from(Span::styled(
                format!(
                    "{:<22}{:<7}{:>7}{:>7}  {:>9}  {}",
                    "Team", "Conf", "Prob", "Eff", "Record", "Band"
                ),
                Style::default().add_modifier(Modifier::BOLD),
            ))];
            let visible = inner.height.saturating_sub(1) as usize;
            let start = state
                .bubble_selected
                .saturating_sub(visible.saturating_sub(1));
            for (idx, team) in data.iter().enumerate().skip(start).take(visible.max(1)) {
                let band = bubble_band(team.tournament_probability);
                let style = if idx == state.bubble_selected {
                    Style::default().fg(Color::White).bg(Color::DarkGray)
                } else {
                    Style::default()
                };
                lines.push(Line::from(vec![
                    Span::styled(
                        format!(
                            "{:<22}{:<7}{:>6.0}%{:>7.1}  {:>9}  ",
                            clip(&team.team, 21),
                            clip(&team.conference, 6),
                            team.tournament_probability * 100.0,
                            team.efficiency,
                            team.record,
                        ),
                        style,
                    ),
                    Span::styled(bubble_band_label(band), style.fg(bubble_band_color(band))),
                ]));
            }
            frame.render_widget(Paragraph::new(lines), inner);
        }
    }
}

fn render_alerts(frame: &mut Frame, area: Rect, state: &AppState) {
    let (upset_count, cinderella_count) = state
        .alerts
        .data()
        .map(|bundle| (bundle.upsets.len(), bundle.cinderella.len()))
        .unwrap_or((0, 0));
    let title = match state.alerts_tab {
        AlertsTab::Upsets => format!(
            "Upset Alerts ({upset_count}) | cinderella ({cinderella_count}) {}",
            state.alerts_year
        ),
        AlertsTab::Cinderella => format!(
            "upset alerts ({upset_count}) | Cinderella ({cinderella_count}) {}",
            state.alerts_year
        ),
    };
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match &state.alerts.state {
        FetchState::Idle => render_dim(frame, inner, "Press Enter to load"),
        FetchState::Loading => render_dim(frame, inner, "Loading alerts..."),
        FetchState::Failed(message) => render_error(frame, inner, message),
        FetchState::Ready { data, .. } => match state.alerts_tab {
            AlertsTab::Upsets => {
                if data.upsets.is_empty() {
                    render_dim(frame, inner, "No upset alerts");
                    return;
                }
                let mut lines = Vec::new();
                for (idx, alert) in data.upsets.iter().enumerate() {
                    let level = risk_level(&alert.risk_level);
                    let style = if idx == state.alerts_selected {
                        Style::default().fg(Color::White).bg(Color::DarkGray)
                    } else {
                        Style::default()
                    };
                    let seed = alert
                        .seed
                        .map(|s| format!("#{s}"))
                        .unwrap_or_else(|| "--".to_string());
                    lines.push(Line::from(vec![
                        Span::styled(
                            format!(
                                "{:<4}{:<22}{:>5.0}%  eff {:>5.1}  ",
                                seed,
                                clip(&alert.team, 21),
                                alert.upset_risk * 100.0,
                                alert.efficiency,
                            ),
                            style,
                        ),
                        Span::styled(
                            alert.risk_level.clone(),
                            style.fg(risk_level_color(level)),
                        ),
                        Span::styled(format!("  {}", alert.reasons.join(", ")), style),
                    ]));
                }
                frame.render_widget(Paragraph::new(lines), inner);
            }
            AlertsTab::Cinderella => {
                if data.cinderella.is_empty() {
                    render_dim(frame, inner, "No cinderella candidates");
                    return;
                }
                let mut lines = Vec::new();
                for (idx, candidate) in data.cinderella.iter().enumerate() {
                    let level = risk_level(&candidate.potential_level);
                    let style = if idx == state.alerts_selected {
                        Style::default().fg(Color::White).bg(Color::DarkGray)
                    } else {
                        Style::default()
                    };
                    let seed = candidate
                        .seed
                        .map(|s| format!("#{s}"))
                        .unwrap_or_else(|| "--".to_string());
                    lines.push(Line::from(vec![
                        Span::styled(
                            format!(
                                "{:<4}{:<22}{:>5.0}%  eff {:>5.1}  ",
                                seed,
                                clip(&candidate.team, 21),
                                candidate.deep_run_probability * 100.0,
                                candidate.efficiency,
                            ),
                            style,
                        ),
                        Span::styled(
                            candidate.potential_level.clone(),
                            style.fg(potential_level_color(level)),
                        ),
                        Span::styled(format!("  {}", candidate.strengths.join(", ")), style),
                    ]));
                }
                frame.render_widget(Paragraph::new(lines), inner);
            }
        },
    }
}

fn render_profile(frame: &mut Frame, area: Rect, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    render_selector_input(
        frame,
        rows[0],
        "Team",
        app.state.profile_selector.display_value(),
        true,
        app.state.profile_selector.open,
    );

    if app.state.profile_selector.open {
        render_selector_panel(frame, rows[1], app);
        return;
    }

    match &app.state.profile.state {
        FetchState::Idle => render_dim(frame, rows[1], "Search a team with '/'"),
        FetchState::Loading => render_dim(frame, rows[1], "Loading team profile..."),
        FetchState::Failed(message) => render_error(frame, rows[1], message),
        FetchState::Ready { data, .. } => render_profile_detail(frame, rows[1], data),
    }
}

fn render_profile_detail(frame: &mut Frame, area: Rect, profile: &TeamProfile) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let metrics = &profile.efficiency_metrics;
    let mut left = vec![
        Line::from(Span::styled(
            format!(
                "{} ({}) {} {}",
                profile.team, profile.conference, profile.year, profile.record
            ),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("Net efficiency:       {:+.1}", metrics.net_efficiency)),
        Line::from(format!(
            "Offensive efficiency: {:.1}",
            metrics.offensive_efficiency
        )),
        Line::from(format!(
            "Defensive efficiency: {:.1}",
            metrics.defensive_efficiency
        )),
        Line::from(format!("Pace:                 {:.1}", metrics.pace)),
        Line::from(""),
        Line::from(Span::styled(
            "National percentiles",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];
    for (stat, percentile) in &profile.percentiles {
        let tier = percentile_tier(*percentile);
        left.push(Line::from(vec![
            Span::raw(format!("{:<22}{:>4.0}th ", stat.replace('_', " "), percentile)),
            Span::styled(
                percentile_tier_label(tier),
                Style::default().fg(percentile_tier_color(tier)),
            ),
        ]));
    }
    frame.render_widget(Paragraph::new(left), columns[0]);

    let outlook = &profile.tournament_outlook;
    let prob_tier = probability_tier(outlook.probability);
    let ready_tier = probability_tier(outlook.readiness_score);
    let mut right = vec![
        Line::from(Span::styled(
            "Tournament outlook",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::raw(format!(
                "Probability: {:>5.1}%  ",
                outlook.probability * 100.0
            )),
            Span::styled(
                probability_tier_label(prob_tier),
                Style::default().fg(probability_tier_color(prob_tier)),
            ),
        ]),
        Line::from(vec![
            Span::raw(format!(
                "Readiness:   {:>5.0}%  ",
                outlook.readiness_score * 100.0
            )),
            Span::styled(
                probability_tier_label(ready_tier),
                Style::default().fg(probability_tier_color(ready_tier)),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Strengths",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];
    if profile.strengths.is_empty() {
        right.push(Line::from(Span::styled(
            "  none identified",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for strength in &profile.strengths {
        right.push(Line::from(format!("  + {strength}")));
    }
    right.push(Line::from(""));
    right.push(Line::from(Span::styled(
        "Weaknesses",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    if profile.weaknesses.is_empty() {
        right.push(Line::from(Span::styled(
            "  none identified",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for weakness in &profile.weaknesses {
        right.push(Line::from(format!("  ! {weakness}")));
    }
    frame.render_widget(Paragraph::new(right), columns[1]);
}

fn render_selector_input(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    value: &str,
    focused: bool,
    open: bool,
) {
    let style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let marker = if open { "v" } else { ">" };
    let input = Paragraph::new(format!("{marker} {value}"))
        .style(style)
        .block(Block::default().title(label).borders(Borders::ALL));
    frame.render_widget(input, area);
}

fn render_selector_panel(frame: &mut Frame, area: Rect, app: &mut App) {
    let block = Block::default().title("Teams").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.state.catalog.is_loading() {
        render_dim(frame, inner, "Loading teams...");
        return;
    }

    let highlighted = app
        .state
        .active_selector()
        .map(|selector| selector.highlighted)
        .unwrap_or(0);
    let Some(outcome) = app.selector_results() else {
        return;
    };

    match outcome {
        SearchOutcome::NoMatches { query } => {
            render_dim(frame, inner, &format!("No teams found matching \"{query}\""));
        }
        SearchOutcome::Matches { teams, truncated } => {
            let visible = inner.height.saturating_sub(1) as usize;
            let start = highlighted.saturating_sub(visible.saturating_sub(1));
            let mut lines = Vec::new();
            for (idx, team) in teams.iter().enumerate().skip(start).take(visible.max(1)) {
                let style = if idx == highlighted {
                    Style::default().fg(Color::White).bg(Color::DarkGray)
                } else {
                    Style::default()
                };
                lines.push(Line::from(Span::styled(format!("  {team}"), style)));
            }
            if truncated {
                lines.push(Line::from(Span::styled(
                    "Showing first 100 results. Keep typing to narrow down...",
                    Style::default().fg(Color::DarkGray),
                )));
            }
            if app.state.catalog_is_fallback {
                lines.push(Line::from(Span::styled(
                    "(built-in team list; catalog fetch failed)",
                    Style::default().fg(Color::DarkGray),
                )));
            }
            frame.render_widget(Paragraph::new(lines), inner);
        }
    }
}

fn render_dim(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(widget, area);
}

fn render_error(frame: &mut Frame, area: Rect, message: &str) {
    let widget = Paragraph::new(message).style(Style::default().fg(Color::Red));
    frame.render_widget(widget, area);
}

fn clip(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        text.chars().take(max.saturating_sub(1)).collect::<String>() + "…"
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Madness Terminal - Help",
        "",
        "Screens:",
        "  1  Overview (top teams, conferences)",
        "  2  Predict tournament chances",
        "  3  Compare two teams",
        "  4  Bubble teams",
        "  5  Upset / Cinderella alerts",
        "  6  Team profile",
        "",
        "Keys:",
        "  /            Open team search",
        "  Tab          Switch compare side",
        "  Enter        Run fetch / commit selection",
        "  Esc          Close search panel",
        "  y            Cycle season year",
        "  r            Refresh view",
        "  j/k or ↑/↓   Move selection",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
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
