use std::{io, thread, time::Duration};

use anyhow::{Context, Result};
use campus_core::{
    auth::REGISTRATION_MESSAGE,
    dashboard::{matches_query, PanelKind, PanelRow, Stat},
    load_dashboard, Action, ActionAck, AuthError, Dashboard, DashboardError, Panel, Portal, Route,
    UserRecord,
};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table, TableState, Tabs, Wrap},
    Frame, Terminal,
};
use tokio::{spawn, sync::mpsc};
use tracing::{debug, error, info};

use crate::form::{Focus, Form};

const TICK_RATE: Duration = Duration::from_millis(250);
const SPINNER: [char; 4] = ['|', '/', '-', '\\'];
const MAX_COLUMN_WIDTH: usize = 48;

#[derive(Debug, Clone)]
struct Theme {
    primary_fg: Color,
    accent: Color,
    muted: Color,
    selection_bg: Color,
    success: Color,
    danger: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_fg: Color::White,
            accent: Color::Magenta,
            muted: Color::DarkGray,
            selection_bg: Color::DarkGray,
            success: Color::Green,
            danger: Color::Red,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Browse,
    Filter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Login,
    Register,
    Dashboard,
}

enum AppEvent {
    Input(Event),
    Tick,
    SessionRestored(Option<UserRecord>),
    LoggedIn(Result<UserRecord, AuthError>),
    Registered(Result<String, AuthError>),
    DashboardLoaded(Route, Result<Dashboard, DashboardError>),
    ActionDone(Action, ActionAck),
    LoggedOut,
}

enum FormOutcome {
    Submit,
    Handled,
    Ignored,
}

struct DashboardView {
    dashboard: Dashboard,
    stats: Vec<Stat>,
    panels: Vec<Panel>,
    tab: usize,
}

impl DashboardView {
    fn new(dashboard: Dashboard) -> Self {
        let stats = dashboard.data.stats();
        let panels = dashboard.data.panels();
        Self {
            dashboard,
            stats,
            panels,
            tab: 0,
        }
    }

    fn panel(&self) -> Option<&Panel> {
        self.panels.get(self.tab)
    }

    fn switch_tab(&mut self, delta: isize) {
        if self.panels.is_empty() {
            return;
        }
        let len = self.panels.len() as isize;
        self.tab = (self.tab as isize + delta).rem_euclid(len) as usize;
    }
}

/// Terminal front end for the campus portal.
pub struct CampusApp {
    portal: Portal,
    screen: Screen,
    login: Form,
    register: Form,
    view: Option<DashboardView>,
    load_error: Option<(Route, String)>,
    state: UiState,
    pending: Option<String>,
    actions_in_flight: usize,
    ticks: usize,
    event_tx: Option<mpsc::Sender<AppEvent>>,
    theme: Theme,
}

impl CampusApp {
    pub fn new(portal: Portal) -> Self {
        Self {
            portal,
            screen: Screen::Login,
            login: Form::login(),
            register: Form::register(),
            view: None,
            load_error: None,
            state: UiState::default(),
            pending: None,
            actions_in_flight: 0,
            ticks: 0,
            event_tx: None,
            theme: Theme::default(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx.clone());
        self.event_tx = Some(event_tx);
        self.start_session_restore();

        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.state.should_quit {
                break;
            }

            let maybe_event = event_rx.recv().await;
            if !self.process_app_event(maybe_event) {
                break;
            }

            if self.state.should_quit {
                break;
            }
        }

        restore_terminal(&mut terminal)?;
        self.event_tx = None;
        Ok(())
    }

    fn sender(&mut self) -> Option<mpsc::Sender<AppEvent>> {
        let sender = self.event_tx.clone();
        if sender.is_none() {
            self.state
                .set_status("Internal error: event channel unavailable".to_string());
            error!("event_channel_missing");
        }
        sender
    }

    fn begin(&mut self, label: impl Into<String>) {
        let label = label.into();
        self.state.set_status(label.clone());
        self.pending = Some(label);
    }

    fn start_session_restore(&mut self) {
        let Some(sender) = self.sender() else {
            return;
        };
        let auth = self.portal.auth.clone();
        self.begin("Checking for a saved session");
        spawn(async move {
            let user = auth.current_user().await;
            let _ = sender.send(AppEvent::SessionRestored(user)).await;
        });
    }

    fn submit_login(&mut self) {
        if self.pending.is_some() {
            return;
        }
        let Some(sender) = self.sender() else {
            return;
        };
        let request = self.login.login_request();
        let auth = self.portal.auth.clone();
        self.begin("Signing in");
        spawn(async move {
            let result = auth.login(&request).await;
            let _ = sender.send(AppEvent::LoggedIn(result)).await;
        });
    }

    fn submit_register(&mut self) {
        if self.pending.is_some() {
            return;
        }
        let Some(sender) = self.sender() else {
            return;
        };
        let request = self.register.register_request();
        let auth = self.portal.auth.clone();
        self.begin("Creating account");
        spawn(async move {
            let result = auth
                .register(&request)
                .await
                .map(|()| request.email.clone());
            let _ = sender.send(AppEvent::Registered(result)).await;
        });
    }

    fn start_dashboard_load(&mut self, route: Route) {
        let Some(sender) = self.sender() else {
            return;
        };
        let portal = self.portal.clone();
        info!(route = %route, "Loading dashboard");
        self.begin(format!("Loading {}", route.title().to_lowercase()));
        spawn(async move {
            let result = load_dashboard(route, &portal).await;
            let _ = sender.send(AppEvent::DashboardLoaded(route, result)).await;
        });
    }

    fn start_action(&mut self, action: Action) {
        let Some(sender) = self.sender() else {
            return;
        };
        let relay = self.portal.relay.clone();
        self.actions_in_flight += 1;
        self.state.set_status(format!("Working on {}", action.name()));
        spawn(async move {
            let ack = relay.dispatch(&action).await;
            let _ = sender.send(AppEvent::ActionDone(action, ack)).await;
        });
    }

    fn start_logout(&mut self) {
        if self.pending.is_some() {
            return;
        }
        let Some(sender) = self.sender() else {
            return;
        };
        let auth = self.portal.auth.clone();
        self.begin("Signing out");
        spawn(async move {
            auth.logout().await;
            let _ = sender.send(AppEvent::LoggedOut).await;
        });
    }

    fn process_app_event(&mut self, maybe_event: Option<AppEvent>) -> bool {
        match maybe_event {
            Some(AppEvent::Input(event)) => {
                if let Err(err) = self.handle_input(event) {
                    self.state.set_status(format!("Error: {err}"));
                }
                true
            }
            Some(AppEvent::Tick) => {
                self.ticks = self.ticks.wrapping_add(1);
                true
            }
            Some(AppEvent::SessionRestored(user)) => {
                self.pending = None;
                match user {
                    Some(user) => {
                        debug!(user_id = %user.id, "Session restored");
                        self.start_dashboard_load(Route::for_role(user.role.as_str()));
                    }
                    None => self.state.set_status("Sign in to continue".to_string()),
                }
                true
            }
            Some(AppEvent::LoggedIn(result)) => {
                self.pending = None;
                match result {
                    Ok(user) => {
                        self.login.clear_secrets();
                        self.start_dashboard_load(Route::for_role(user.role.as_str()));
                    }
                    Err(err) => {
                        self.login.clear_secrets();
                        self.state.set_status(err.to_string());
                    }
                }
                true
            }
            Some(AppEvent::Registered(result)) => {
                self.pending = None;
                match result {
                    Ok(email) => {
                        let role = self.register.role;
                        self.register = Form::register();
                        self.login = Form::login();
                        self.login.role = role;
                        if let Some(field) = self.login.field_mut("Email") {
                            field.set(&email);
                        }
                        self.login.focus = Focus::Field(1);
                        self.screen = Screen::Login;
                        self.state.set_status(REGISTRATION_MESSAGE.to_string());
                    }
                    Err(err) => {
                        self.register.clear_secrets();
                        self.state.set_status(err.to_string());
                    }
                }
                true
            }
            Some(AppEvent::DashboardLoaded(route, result)) => {
                self.pending = None;
                self.handle_dashboard_loaded(route, result);
                true
            }
            Some(AppEvent::ActionDone(action, ack)) => {
                self.actions_in_flight = self.actions_in_flight.saturating_sub(1);
                let message = if ack.success {
                    format!("{} • {}", action.notice(), ack.message)
                } else {
                    ack.message
                };
                self.state.set_status(message);
                true
            }
            Some(AppEvent::LoggedOut) => {
                self.pending = None;
                self.view = None;
                self.load_error = None;
                self.state.reset_filter();
                self.screen = Screen::Login;
                self.state
                    .set_status("You have been logged out".to_string());
                true
            }
            None => false,
        }
    }

    fn handle_dashboard_loaded(&mut self, route: Route, result: Result<Dashboard, DashboardError>) {
        match result {
            Ok(dashboard) => {
                let name = dashboard.user.full_name();
                let view = DashboardView::new(dashboard);
                self.state.reset_filter();
                self.state.apply_filter(view.panel());
                self.view = Some(view);
                self.load_error = None;
                self.screen = Screen::Dashboard;
                self.state.set_status(format!("Welcome, {name}"));
            }
            Err(DashboardError::Redirect(Route::Login)) => {
                self.view = None;
                self.screen = Screen::Login;
                self.state
                    .set_status("Please sign in to continue".to_string());
            }
            Err(DashboardError::Redirect(target)) => self.start_dashboard_load(target),
            Err(DashboardError::Unavailable(message)) => {
                error!(route = %route, %message, "Dashboard unavailable");
                self.view = None;
                self.load_error = Some((route, message.clone()));
                self.screen = Screen::Dashboard;
                self.state.set_status(message);
            }
        }
    }

    fn handle_input(&mut self, event: Event) -> Result<()> {
        let Event::Key(key) = event else {
            return Ok(());
        };
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            self.state.should_quit = true;
            return Ok(());
        }
        match self.screen {
            Screen::Login => self.handle_login_key(key),
            Screen::Register => self.handle_register_key(key),
            Screen::Dashboard => match self.state.mode {
                Mode::Filter => self.handle_filter_key(key),
                Mode::Browse => self.handle_dashboard_key(key),
            },
        }
        Ok(())
    }

    fn handle_login_key(&mut self, key: KeyEvent) {
        if key.modifiers == KeyModifiers::CONTROL {
            match key.code {
                KeyCode::Char('f') => {
                    if self.login.fill_sample() {
                        self.state.set_status(format!(
                            "Filled sample {} account",
                            self.login.role.label().to_lowercase()
                        ));
                    } else {
                        self.state.set_status(format!(
                            "No sample account for {}",
                            self.login.role.label().to_lowercase()
                        ));
                    }
                }
                KeyCode::Char('n') => {
                    self.screen = Screen::Register;
                    self.state.set_status("Create an account".to_string());
                }
                _ => {}
            }
            return;
        }
        if key.code == KeyCode::Esc {
            self.state.should_quit = true;
            return;
        }
        if let FormOutcome::Submit = handle_form_key(&mut self.login, key) {
            self.submit_login();
        }
    }

    fn handle_register_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            self.screen = Screen::Login;
            self.state.set_status("Sign in to continue".to_string());
            return;
        }
        if let FormOutcome::Submit = handle_form_key(&mut self.register, key) {
            self.submit_register();
        }
    }

    fn handle_filter_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.state.mode = Mode::Browse;
                self.state.filter.clear();
                self.refilter();
                self.state.set_status("Filter cancelled".to_string());
            }
            KeyCode::Enter => {
                self.state.mode = Mode::Browse;
                self.state.set_status(format!(
                    "Filter applied: {} ({} rows)",
                    self.state.filter,
                    self.state.filtered.len()
                ));
            }
            KeyCode::Backspace => {
                self.state.filter.pop();
                self.refilter();
            }
            KeyCode::Char(c) => {
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                    self.state.filter.push(c);
                    self.refilter();
                }
            }
            _ => {}
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) {
        if self.pending.is_some() {
            if key.code == KeyCode::Char('q') {
                self.state.should_quit = true;
            }
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if key.code == KeyCode::Char('r') {
                self.reload_dashboard();
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.state.should_quit = true,
            KeyCode::Char('o') => self.start_logout(),
            KeyCode::Char('r') if self.view.is_none() => self.reload_dashboard(),
            KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => self.switch_tab(1),
            KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => self.switch_tab(-1),
            KeyCode::Char('j') | KeyCode::Down => self.state.move_cursor(1),
            KeyCode::Char('k') | KeyCode::Up => self.state.move_cursor(-1),
            KeyCode::Char('g') | KeyCode::Home => self.state.move_to(0),
            KeyCode::Char('G') | KeyCode::End => self.state.move_to_end(),
            KeyCode::PageDown => self.state.page_down(),
            KeyCode::PageUp => self.state.page_up(),
            KeyCode::Esc if !self.state.filter.is_empty() => {
                self.state.filter.clear();
                self.refilter();
                self.state.set_status("Filter cleared".to_string());
            }
            KeyCode::Char('/') => {
                let searchable = self
                    .view
                    .as_ref()
                    .and_then(DashboardView::panel)
                    .is_some_and(|panel| panel.searchable);
                if searchable {
                    self.state.mode = Mode::Filter;
                    self.state.set_status("Enter filter text".to_string());
                } else {
                    self.state
                        .set_status("This section cannot be searched".to_string());
                }
            }
            KeyCode::Char(ch) => {
                let Some(view) = self.view.as_ref() else {
                    return;
                };
                let Some(panel) = view.panel() else {
                    return;
                };
                let row_key = self.state.selected_row(panel).map(|row| row.key.as_str());
                if let Some(action) = action_for_key(view.dashboard.route, panel.kind, ch, row_key)
                {
                    self.start_action(action);
                }
            }
            _ => {}
        }
    }

    fn reload_dashboard(&mut self) {
        let route = match (&self.view, &self.load_error) {
            (Some(view), _) => view.dashboard.route,
            (None, Some((route, _))) => *route,
            (None, None) => return,
        };
        self.start_dashboard_load(route);
    }

    fn switch_tab(&mut self, delta: isize) {
        let Some(view) = self.view.as_mut() else {
            return;
        };
        view.switch_tab(delta);
        self.state.reset_filter();
        self.state.apply_filter(view.panel());
    }

    fn refilter(&mut self) {
        let panel = self.view.as_ref().and_then(DashboardView::panel);
        self.state.apply_filter(panel);
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(8), Constraint::Length(4)])
            .split(area);

        match self.screen {
            Screen::Login => self.draw_login(frame, chunks[0]),
            Screen::Register => self.draw_register(frame, chunks[0]),
            Screen::Dashboard => self.draw_dashboard(frame, chunks[0]),
        }
        self.render_status(frame, chunks[1]);
    }

    fn draw_login(&self, frame: &mut Frame, area: Rect) {
        let hint = match self.login.hint() {
            Some((email, password)) => Line::from(vec![
                Span::styled("Sample: ", Style::default().fg(self.theme.muted)),
                Span::raw(format!("{email} / {password}")),
                Span::styled("  (Ctrl-F to fill)", Style::default().fg(self.theme.muted)),
            ]),
            None => Line::from(Span::styled(
                format!(
                    "No sample {} account",
                    self.login.role.label().to_lowercase()
                ),
                Style::default().fg(self.theme.muted),
            )),
        };
        let footer = vec![
            hint,
            Line::from(""),
            key_help(&[("Enter", "sign in"), ("Ctrl-N", "register"), ("Esc", "quit")]),
        ];
        self.render_form(frame, area, &self.login, "Campus Portal · Sign In", footer);
    }

    fn draw_register(&self, frame: &mut Frame, area: Rect) {
        let footer = vec![key_help(&[("Enter", "create account"), ("Esc", "back")])];
        self.render_form(frame, area, &self.register, "Campus Portal · Register", footer);
    }

    fn render_form(
        &self,
        frame: &mut Frame,
        area: Rect,
        form: &Form,
        title: &str,
        footer: Vec<Line<'static>>,
    ) {
        let label_width = form
            .fields
            .iter()
            .map(|field| field.label.len())
            .max()
            .unwrap_or(0)
            .max("Role".len());

        let mut lines: Vec<Line> = Vec::new();
        let mut cursor = None;
        for (idx, field) in form.fields.iter().enumerate() {
            let focused = form.focus == Focus::Field(idx);
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{:>label_width$} ", field.label),
                    self.label_style(focused),
                ),
                Span::styled("> ", Style::default().fg(self.theme.accent)),
                Span::styled(field.display(), Style::default().fg(self.theme.primary_fg)),
            ]));
            if focused {
                cursor = Some((lines.len() - 1, label_width + 3 + field.cursor));
            }
            lines.push(Line::from(""));
        }

        let role_focused = form.focus == Focus::Role;
        let mut role_line = vec![Span::styled(
            format!("{:>label_width$}   ", "Role"),
            self.label_style(role_focused),
        )];
        for role in campus_core::Role::ALL {
            let style = if role == form.role {
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().fg(self.theme.muted)
            };
            role_line.push(Span::styled(format!(" {} ", role.label()), style));
        }
        lines.push(Line::from(role_line));
        lines.push(Line::from(""));
        lines.extend(footer);
        lines.push(key_help(&[("Tab", "next field"), ("←/→", "choose role")]));

        let height = lines.len() as u16 + 2;
        let box_area = centered_rect(72, height, area);
        frame.render_widget(Clear, box_area);
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(title.to_string()))
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, box_area);

        if let Some((row, col)) = cursor {
            let x = (box_area.x + 1 + col as u16)
                .min(box_area.x + box_area.width.saturating_sub(2));
            let y = box_area.y + 1 + row as u16;
            frame.set_cursor(x, y);
        }
    }

    fn label_style(&self, focused: bool) -> Style {
        if focused {
            Style::default()
                .fg(self.theme.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.theme.muted)
        }
    }

    fn draw_dashboard(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(4),
                Constraint::Length(3),
                Constraint::Min(5),
            ])
            .split(area);

        let Some(view) = self.view.as_ref() else {
            self.render_dashboard_placeholder(frame, area);
            return;
        };

        let user = &view.dashboard.user;
        let header = Paragraph::new(Line::from(vec![
            Span::styled(
                view.dashboard.route.title(),
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" · ", Style::default().fg(self.theme.muted)),
            Span::raw(format!("{} ({})", user.full_name(), user.id)),
            Span::styled(
                format!("  {}", user.email),
                Style::default().fg(self.theme.muted),
            ),
        ]))
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, chunks[0]);

        let mut stat_spans = Vec::new();
        for (idx, stat) in view.stats.iter().enumerate() {
            if idx > 0 {
                stat_spans.push(Span::styled("  │  ", Style::default().fg(self.theme.muted)));
            }
            stat_spans.push(Span::styled(
                format!("{}: ", stat.label),
                Style::default().fg(self.theme.muted),
            ));
            stat_spans.push(Span::styled(
                stat.value.clone(),
                Style::default()
                    .fg(self.theme.primary_fg)
                    .add_modifier(Modifier::BOLD),
            ));
        }
        let stats = Paragraph::new(Line::from(stat_spans))
            .block(Block::default().borders(Borders::ALL).title("Overview"))
            .wrap(Wrap { trim: true });
        frame.render_widget(stats, chunks[1]);

        if view.panels.is_empty() {
            let empty = Paragraph::new("Nothing else to show for this account.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(empty, chunks[2].union(chunks[3]));
            return;
        }

        let titles: Vec<String> = view.panels.iter().map(|panel| panel.title.clone()).collect();
        let tabs = Tabs::new(titles)
            .select(view.tab)
            .block(Block::default().borders(Borders::ALL).title("Sections"))
            .style(Style::default().fg(self.theme.muted))
            .highlight_style(
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, chunks[2]);

        self.render_panel(frame, chunks[3]);
    }

    fn render_dashboard_placeholder(&self, frame: &mut Frame, area: Rect) {
        let (title, message, style) = match &self.load_error {
            Some((route, message)) => (
                route.title(),
                format!("{message}\n\nPress r to retry or o to log out."),
                Style::default().fg(self.theme.danger),
            ),
            None => (
                "Dashboard",
                "Loading…".to_string(),
                Style::default().fg(self.theme.muted),
            ),
        };
        let paragraph = Paragraph::new(message)
            .style(style)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, centered_rect(60, 7, area));
    }

    fn render_panel(&mut self, frame: &mut Frame, area: Rect) {
        // borders and header row
        self.state.list_height = area.height.saturating_sub(3) as usize;
        self.state.clamp_cursor();
        self.state.ensure_cursor_visible();

        let Some(panel) = self.view.as_ref().and_then(DashboardView::panel) else {
            return;
        };

        let visible = self.state.visible_rows();
        let rows: Vec<Row> = visible
            .iter()
            .filter_map(|idx| panel.rows.get(*idx))
            .map(|row| Row::new(row.cells.clone()))
            .collect();
        let header = Row::new(panel.columns.clone()).style(
            Style::default()
                .fg(self.theme.accent)
                .add_modifier(Modifier::BOLD),
        );

        let title = if panel.searchable && !self.state.filter.is_empty() {
            format!(
                "{} ({} of {}, filter: {})",
                panel.title,
                self.state.filtered.len(),
                panel.rows.len(),
                self.state.filter
            )
        } else if panel.searchable {
            format!("{} ({}, / to search)", panel.title, panel.rows.len())
        } else {
            format!("{} ({})", panel.title, panel.rows.len())
        };

        let mut table_state = TableState::default();
        if !visible.is_empty() {
            let selected = self
                .state
                .cursor
                .saturating_sub(self.state.offset)
                .min(visible.len() - 1);
            table_state.select(Some(selected));
        }

        let table = Table::new(rows, column_widths(panel))
            .header(header)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().bg(self.theme.selection_bg))
            .highlight_symbol("▶ ");
        frame.render_stateful_widget(table, area, &mut table_state);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Status");
        let primary = if self.state.mode == Mode::Filter {
            Line::from(format!("Filter: {}", self.state.filter))
        } else if let Some(label) = &self.pending {
            let spinner = SPINNER[self.ticks % SPINNER.len()];
            Line::from(Span::styled(
                format!("{spinner} {label}…"),
                Style::default().fg(self.theme.accent),
            ))
        } else {
            let style = if self.state.status.contains("successfully") {
                Style::default().fg(self.theme.success)
            } else {
                Style::default().fg(self.theme.primary_fg)
            };
            Line::from(Span::styled(self.state.status.clone(), style))
        };

        let secondary = match self.screen {
            Screen::Login | Screen::Register => Line::from(Span::styled(
                format!("Session mirror: {}", self.portal.config.data_dir.display()),
                Style::default().fg(self.theme.muted),
            )),
            Screen::Dashboard => {
                let mut help = vec![
                    ("Tab", "section"),
                    ("j/k", "move"),
                    ("/", "search"),
                    ("Ctrl-R", "reload"),
                    ("o", "log out"),
                    ("q", "quit"),
                ];
                if let Some(view) = &self.view {
                    let kind = view.panel().map(|panel| panel.kind);
                    help.extend(action_help(view.dashboard.route, kind));
                }
                if self.actions_in_flight > 0 {
                    help.push(("…", "working"));
                }
                key_help(&help)
            }
        };

        let paragraph = Paragraph::new(vec![primary, secondary])
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}

fn handle_form_key(form: &mut Form, key: KeyEvent) -> FormOutcome {
    match key.code {
        KeyCode::Enter => return FormOutcome::Submit,
        KeyCode::Tab | KeyCode::Down => form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
        KeyCode::Left if form.focus == Focus::Role => form.cycle_role(-1),
        KeyCode::Right | KeyCode::Char(' ') if form.focus == Focus::Role => form.cycle_role(1),
        code => {
            let Some(field) = form.focused_field_mut() else {
                return FormOutcome::Ignored;
            };
            match code {
                KeyCode::Left => field.move_cursor(-1),
                KeyCode::Right => field.move_cursor(1),
                KeyCode::Home => field.move_home(),
                KeyCode::End => field.move_end(),
                KeyCode::Backspace => field.backspace(),
                KeyCode::Delete => field.delete(),
                KeyCode::Char(ch)
                    if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT =>
                {
                    field.insert(ch)
                }
                _ => return FormOutcome::Ignored,
            }
        }
    }
    FormOutcome::Handled
}

/// Relay action bound to `key` for the selected row of a panel.
fn action_for_key(
    route: Route,
    kind: PanelKind,
    key: char,
    row_key: Option<&str>,
) -> Option<Action> {
    let row = || row_key.map(str::to_string);
    match (key, kind) {
        ('d', PanelKind::Assignments) => {
            row().map(|assignment_id| Action::DownloadAssignment { assignment_id })
        }
        ('s', PanelKind::Assignments) => {
            row().map(|assignment_id| Action::SubmitAssignment { assignment_id })
        }
        ('r', PanelKind::Transactions) => {
            row().map(|transaction_id| Action::DownloadReceipt { transaction_id })
        }
        ('c', PanelKind::Teachers) => {
            row().map(|teacher_name| Action::ContactTeacher { teacher_name })
        }
        ('p', _) if matches!(route, Route::StudentDashboard | Route::ParentDashboard) => {
            Some(Action::PayFees)
        }
        ('m', _) if route == Route::ParentDashboard => Some(Action::RequestMeeting),
        _ => None,
    }
}

fn action_help(route: Route, kind: Option<PanelKind>) -> Vec<(&'static str, &'static str)> {
    let mut help = Vec::new();
    match kind {
        Some(PanelKind::Assignments) => {
            help.push(("d", "download"));
            help.push(("s", "submit"));
        }
        Some(PanelKind::Transactions) => help.push(("r", "receipt")),
        Some(PanelKind::Teachers) => help.push(("c", "contact teacher")),
        Some(PanelKind::Info) | None => {}
    }
    if matches!(route, Route::StudentDashboard | Route::ParentDashboard) {
        help.push(("p", "pay fees"));
    }
    if route == Route::ParentDashboard {
        help.push(("m", "request meeting"));
    }
    help
}

fn key_help(entries: &[(&str, &str)]) -> Line<'static> {
    let mut spans = Vec::new();
    for (idx, (key, label)) in entries.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(
            key.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!(" {label}")));
    }
    Line::from(spans)
}

fn column_widths(panel: &Panel) -> Vec<Constraint> {
    let last = panel.columns.len().saturating_sub(1);
    panel
        .columns
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            let widest = panel
                .rows
                .iter()
                .filter_map(|row| row.cells.get(idx))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
                .max(column.chars().count())
                .min(MAX_COLUMN_WIDTH) as u16;
            if idx == last {
                Constraint::Min(widest)
            } else {
                Constraint::Length(widest + 1)
            }
        })
        .collect()
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

struct UiState {
    /// Indices into the current panel's rows that pass the filter.
    filtered: Vec<usize>,
    cursor: usize,
    offset: usize,
    list_height: usize,
    filter: String,
    status: String,
    mode: Mode,
    should_quit: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            filtered: Vec::new(),
            cursor: 0,
            offset: 0,
            list_height: 1,
            filter: String::new(),
            status: "Ready".to_string(),
            mode: Mode::Browse,
            should_quit: false,
        }
    }
}

impl UiState {
    fn reset_filter(&mut self) {
        self.filter.clear();
        self.mode = Mode::Browse;
    }

    fn apply_filter(&mut self, panel: Option<&Panel>) {
        self.filtered = match panel {
            Some(panel) => panel
                .rows
                .iter()
                .enumerate()
                .filter(|(_, row)| !panel.searchable || matches_query(*row, &self.filter))
                .map(|(idx, _)| idx)
                .collect(),
            None => Vec::new(),
        };
        self.cursor = 0;
        self.offset = 0;
    }

    fn selected_row<'a>(&self, panel: &'a Panel) -> Option<&'a PanelRow> {
        self.filtered
            .get(self.cursor)
            .and_then(|idx| panel.rows.get(*idx))
    }

    fn move_cursor(&mut self, delta: isize) {
        if self.filtered.is_empty() {
            return;
        }
        let len = self.filtered.len() as isize;
        let idx = (self.cursor as isize + delta).clamp(0, len - 1);
        self.cursor = idx as usize;
        self.ensure_cursor_visible();
    }

    fn move_to(&mut self, index: usize) {
        if self.filtered.is_empty() {
            return;
        }
        self.cursor = index.min(self.filtered.len() - 1);
        self.ensure_cursor_visible();
    }

    fn move_to_end(&mut self) {
        if self.filtered.is_empty() {
            return;
        }
        self.cursor = self.filtered.len() - 1;
        self.ensure_cursor_visible();
    }

    fn page_down(&mut self) {
        if self.filtered.is_empty() || self.list_height == 0 {
            return;
        }
        let delta = self.list_height.min(self.filtered.len());
        self.move_cursor(delta as isize);
    }

    fn page_up(&mut self) {
        if self.filtered.is_empty() || self.list_height == 0 {
            return;
        }
        let delta = self.list_height.min(self.filtered.len());
        self.move_cursor(-(delta as isize));
    }

    fn visible_rows(&self) -> &[usize] {
        if self.filtered.is_empty() {
            return &[];
        }
        let end = (self.offset + self.list_height.max(1)).min(self.filtered.len());
        &self.filtered[self.offset..end]
    }

    fn set_status(&mut self, message: String) {
        self.status = message;
    }

    fn clamp_cursor(&mut self) {
        if self.filtered.is_empty() {
            self.cursor = 0;
            self.offset = 0;
        } else if self.cursor >= self.filtered.len() {
            self.cursor = self.filtered.len() - 1;
        }
    }

    fn ensure_cursor_visible(&mut self) {
        if self.filtered.is_empty() || self.list_height == 0 {
            self.offset = 0;
            return;
        }
        let height = self.list_height;
        let max_offset = self.filtered.len().saturating_sub(height);

        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + height {
            self.offset = self.cursor + 1 - height;
        }

        if self.offset > max_offset {
            self.offset = max_offset;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_core::dashboard::AdminDashboard;

    fn users_panel() -> Panel {
        AdminDashboard::mock().panels().remove(0)
    }

    #[test]
    fn filter_narrows_searchable_panels() {
        let panel = users_panel();
        let mut state = UiState::default();
        state.apply_filter(Some(&panel));
        assert_eq!(state.filtered.len(), panel.rows.len());

        state.filter = "student".to_string();
        state.apply_filter(Some(&panel));
        let keys: Vec<_> = state
            .filtered
            .iter()
            .map(|idx| panel.rows[*idx].key.as_str())
            .collect();
        assert_eq!(keys, vec!["USR1001", "USR1002", "USR1004"]);

        state.move_to_end();
        assert_eq!(state.selected_row(&panel).map(|row| row.key.as_str()), Some("USR1004"));
    }

    #[test]
    fn filter_ignored_on_plain_panels() {
        let panel = AdminDashboard::mock().panels().remove(1);
        assert!(!panel.searchable);
        let mut state = UiState {
            filter: "nothing matches this".to_string(),
            ..UiState::default()
        };
        state.apply_filter(Some(&panel));
        assert_eq!(state.filtered.len(), panel.rows.len());
    }

    #[test]
    fn cursor_scrolls_within_list_height() {
        let panel = users_panel();
        let mut state = UiState {
            list_height: 3,
            ..UiState::default()
        };
        state.apply_filter(Some(&panel));
        state.move_cursor(5);
        assert_eq!(state.cursor, 5);
        assert_eq!(state.offset, 3);
        assert_eq!(state.visible_rows(), &[3, 4, 5]);
        state.move_cursor(-10);
        assert_eq!((state.cursor, state.offset), (0, 0));
        state.page_down();
        assert_eq!(state.cursor, 3);
    }

    #[test]
    fn action_keys_follow_panel_kind() {
        let route = Route::StudentDashboard;
        assert_eq!(
            action_for_key(route, PanelKind::Assignments, 'd', Some("A1002")),
            Some(Action::DownloadAssignment {
                assignment_id: "A1002".to_string()
            })
        );
        assert_eq!(
            action_for_key(route, PanelKind::Transactions, 'r', Some("T3001")),
            Some(Action::DownloadReceipt {
                transaction_id: "T3001".to_string()
            })
        );
        assert_eq!(action_for_key(route, PanelKind::Info, 'd', Some("CS301")), None);
        assert_eq!(action_for_key(route, PanelKind::Assignments, 's', None), None);
        assert_eq!(action_for_key(route, PanelKind::Info, 'p', None), Some(Action::PayFees));
        assert_eq!(action_for_key(route, PanelKind::Info, 'm', None), None);
    }

    #[test]
    fn parent_actions() {
        let route = Route::ParentDashboard;
        assert_eq!(
            action_for_key(route, PanelKind::Teachers, 'c', Some("Dr. Smith")),
            Some(Action::ContactTeacher {
                teacher_name: "Dr. Smith".to_string()
            })
        );
        assert_eq!(action_for_key(route, PanelKind::Info, 'm', None), Some(Action::RequestMeeting));
        assert_eq!(action_for_key(Route::FinanceDashboard, PanelKind::Info, 'p', None), None);
    }

    #[test]
    fn form_keys_submit_and_edit() {
        let mut form = Form::login();
        let key = |code| KeyEvent::new(code, KeyModifiers::NONE);
        assert!(matches!(
            handle_form_key(&mut form, key(KeyCode::Char('a'))),
            FormOutcome::Handled
        ));
        assert_eq!(form.fields[0].input, "a");
        handle_form_key(&mut form, key(KeyCode::Tab));
        handle_form_key(&mut form, key(KeyCode::Tab));
        assert_eq!(form.focus, Focus::Role);
        handle_form_key(&mut form, key(KeyCode::Right));
        assert_eq!(form.role, campus_core::Role::Faculty);
        assert!(matches!(
            handle_form_key(&mut form, key(KeyCode::Char('x'))),
            FormOutcome::Ignored
        ));
        assert!(matches!(handle_form_key(&mut form, key(KeyCode::Enter)), FormOutcome::Submit));
    }

    #[test]
    fn column_widths_fit_contents() {
        let panel = users_panel();
        let widths = column_widths(&panel);
        assert_eq!(widths.len(), panel.columns.len());
        assert_eq!(widths[0], Constraint::Length(8));
    }
}
