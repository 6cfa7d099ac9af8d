//! Main application state and TUI event loop for the order dashboard.
//!
//! [`App`] owns the theme, the selected tab, the dashboard session and the
//! most recent snapshot.  Key handling is split from the terminal loop so it
//! can be exercised without a TTY.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame, Terminal,
};

use dashboard_core::formatting::Currency;
use dashboard_data::snapshot::DashboardSnapshot;
use dashboard_runtime::session::DashboardSession;

use crate::components::header::Header;
use crate::overview_view;
use crate::table_view;
use crate::themes::Theme;

// ── Tab ───────────────────────────────────────────────────────────────────────

/// Which page of the dashboard is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Overview,
    Categories,
    SellerCities,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Overview, Tab::Categories, Tab::SellerCities];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Categories => "Categories",
            Tab::SellerCities => "Seller Cities",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Overview => 0,
            Tab::Categories => 1,
            Tab::SellerCities => 2,
        }
    }

    /// Following tab, wrapping around.
    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Preceding tab, wrapping around.
    pub fn previous(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

// ── Key mapping ───────────────────────────────────────────────────────────────

/// What a key press asks the app to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    NextTab,
    PreviousTab,
    Reload,
    Quit,
    None,
}

/// Map a key event to an [`Action`].
pub fn action_for_key(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('r') | KeyCode::Char('R') => Action::Reload,
        KeyCode::BackTab | KeyCode::Left => Action::PreviousTab,
        KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => Action::PreviousTab,
        KeyCode::Tab | KeyCode::Right => Action::NextTab,
        _ => Action::None,
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the dashboard TUI.
pub struct App {
    pub theme: Theme,
    pub currency: Currency,
    pub tab: Tab,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
    session: DashboardSession,
    snapshot: DashboardSnapshot,
    /// Last reload failure, shown in the footer until the next success.
    status: Option<String>,
}

impl App {
    /// Construct the app around an already-built first snapshot.
    pub fn new(
        theme_name: &str,
        currency: Currency,
        session: DashboardSession,
        snapshot: DashboardSnapshot,
    ) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            currency,
            tab: Tab::Overview,
            should_quit: false,
            session,
            snapshot,
            status: None,
        }
    }

    pub fn snapshot(&self) -> &DashboardSnapshot {
        &self.snapshot
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Re-read the dataset and rebuild the snapshot.
    ///
    /// On failure the current snapshot stays on screen and the error is
    /// shown in the footer.
    pub fn reload(&mut self) {
        match self.session.reload() {
            Ok(snapshot) => {
                tracing::info!(rows = snapshot.rows, "dashboard reloaded");
                self.snapshot = snapshot;
                self.status = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "reload failed; keeping previous snapshot");
                self.status = Some(format!("Reload failed: {e}"));
            }
        }
    }

    /// Apply one key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        match action_for_key(key) {
            Action::NextTab => self.tab = self.tab.next(),
            Action::PreviousTab => self.tab = self.tab.previous(),
            Action::Reload => self.reload(),
            Action::Quit => self.should_quit = true,
            Action::None => {}
        }
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the dashboard until the user quits.
    ///
    /// Uses `crossterm::event::poll` with a 250 ms timeout so the loop stays
    /// on the current thread and redraws regularly, yielding to the runtime
    /// once per tick.
    pub async fn run(mut self) -> io::Result<()> {
        let mut terminal = init_terminal()?;
        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key)
                    }
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            if self.should_quit {
                break Ok(());
            }

            // Give sibling tasks (the OS signal listener) a chance to run.
            tokio::task::yield_now().await;
        };

        // Restore terminal state unconditionally.
        restore_terminal()?;
        terminal.show_cursor()?;
        result
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Render the whole dashboard into `frame`.
    pub fn render(&self, frame: &mut Frame) {
        let chunks = Layout::vertical([
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

        let header = Header::new(self.snapshot.range, self.currency, &self.theme);
        frame.render_widget(Paragraph::new(Text::from(header.to_lines())), chunks[0]);

        self.render_tabs(frame, chunks[1]);
        self.render_body(frame, chunks[2]);
        frame.render_widget(Paragraph::new(self.footer_line()), chunks[3]);
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let tabs = Tabs::new(Tab::ALL.iter().map(|t| t.title()))
            .select(self.tab.index())
            .style(self.theme.tab_inactive)
            .highlight_style(self.theme.tab_active)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(self.theme.table_border),
            );
        frame.render_widget(tabs, area);
    }

    fn render_body(&self, frame: &mut Frame, area: Rect) {
        let snap = &self.snapshot;
        if snap.rows == 0 {
            table_view::render_no_data(frame, area, &self.theme);
            return;
        }
        match self.tab {
            Tab::Overview => {
                overview_view::render_overview(frame, area, snap, self.currency, &self.theme)
            }
            Tab::Categories => table_view::render_breakdown(
                frame,
                area,
                &snap.categories,
                snap.rows,
                snap.totals.total_revenue,
                self.currency,
                &self.theme,
            ),
            Tab::SellerCities => table_view::render_breakdown(
                frame,
                area,
                &snap.seller_cities,
                snap.rows,
                snap.totals.total_revenue,
                self.currency,
                &self.theme,
            ),
        }
    }

    /// Key help, or the last reload error when there is one.
    pub fn footer_line(&self) -> Line<'_> {
        match &self.status {
            Some(message) => Line::from(Span::styled(message.as_str(), self.theme.error)),
            None => Line::from(vec![
                Span::styled(
                    "Tab/←/→ switch · r reload · q quit",
                    self.theme.dim,
                ),
                Span::styled(
                    format!("  │ top {} · {}", self.session.top_n(), self.session.store().path().display()),
                    self.theme.dim,
                ),
            ]),
        }
    }
}

// ── Terminal setup ────────────────────────────────────────────────────────────

/// Enter raw mode and the alternate screen.
pub fn init_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

/// Leave the alternate screen and raw mode.  Safe to call more than once.
pub fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
