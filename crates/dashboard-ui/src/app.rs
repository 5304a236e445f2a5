//! Main application state and TUI event loop for the sales dashboard.
//!
//! [`App`] owns the loaded snapshot, the active date range and the report
//! derived from it. Every range change rebuilds the report from the
//! snapshot; nothing is cached between changes.

use std::io;
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    text::{Line, Span, Text},
    widgets::{Paragraph, Tabs},
    Frame, Terminal,
};
use tracing::{debug, warn};

use dashboard_core::error::Result;
use dashboard_core::formatting::{format_money, format_number_locale, NumberLocale};
use dashboard_core::models::{DateRange, MissingKeyPolicy};
use dashboard_core::settings::Settings;
use dashboard_core::time_utils::{shift_days, shift_months};
use dashboard_data::analysis::{build_report, DashboardReport};
use dashboard_data::dataset::OrderDataset;

use crate::category_view;
use crate::components::header::Header;
use crate::rfm_view;
use crate::table_view;
use crate::themes::Theme;
use crate::trend_view;

pub const TITLE: &str = "Sales Dashboard";

// ── DisplayOptions ────────────────────────────────────────────────────────────

/// Presentation settings shared by every view.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayOptions {
    /// ISO 4217 code for monetary figures.
    pub currency: String,
    pub locale: NumberLocale,
    /// Bars in the best-sellers chart.
    pub top_categories: usize,
    /// Bars in each RFM chart.
    pub top_rfm: usize,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            locale: NumberLocale::EnUs,
            top_categories: 10,
            top_rfm: 5,
        }
    }
}

impl DisplayOptions {
    pub fn money(&self, amount: f64) -> String {
        format_money(amount, &self.currency, self.locale)
    }

    pub fn number(&self, value: f64, decimals: u32) -> String {
        format_number_locale(value, decimals, self.locale)
    }
}

impl From<&Settings> for DisplayOptions {
    fn from(s: &Settings) -> Self {
        Self {
            currency: s.currency.clone(),
            locale: s.locale,
            top_categories: s.top_categories as usize,
            top_rfm: s.top_rfm as usize,
        }
    }
}

// ── Tab / RangeBound ──────────────────────────────────────────────────────────

/// Dashboard section currently on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    /// Headline totals, trend charts and a compact monthly table.
    Monthly,
    /// Full-height monthly table.
    Table,
    Categories,
    Rfm,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Monthly, Tab::Table, Tab::Categories, Tab::Rfm];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Monthly => "Monthly Orders",
            Tab::Table => "Monthly Table",
            Tab::Categories => "Top Categories",
            Tab::Rfm => "RFM",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Which end of the date range the arrow keys move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBound {
    Start,
    End,
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the dashboard TUI.
pub struct App {
    pub theme: Theme,
    pub options: DisplayOptions,
    pub policy: MissingKeyPolicy,
    pub tab: Tab,
    pub selected: RangeBound,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
    dataset: OrderDataset,
    /// Limits for the selectable range: first to last order date.
    bounds: DateRange,
    range: DateRange,
    report: DashboardReport,
    /// Message from the last failed recompute, shown in the footer.
    last_error: Option<String>,
}

impl App {
    /// Build the app and compute the first report. `range` is clamped to
    /// the dataset's own span.
    pub fn new(
        dataset: OrderDataset,
        range: DateRange,
        policy: MissingKeyPolicy,
        options: DisplayOptions,
        theme_name: &str,
    ) -> Result<Self> {
        let bounds = dataset.full_range().unwrap_or(range);
        let range = range.clamp_to(&bounds);
        let report = build_report(&dataset, &range, policy)?;

        Ok(Self {
            theme: Theme::from_name(theme_name),
            options,
            policy,
            tab: Tab::Monthly,
            selected: RangeBound::Start,
            should_quit: false,
            dataset,
            bounds,
            range,
            report,
            last_error: None,
        })
    }

    pub fn range(&self) -> &DateRange {
        &self.range
    }

    pub fn bounds(&self) -> &DateRange {
        &self.bounds
    }

    pub fn report(&self) -> &DashboardReport {
        &self.report
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the interactive dashboard until the user quits.
    ///
    /// Uses `crossterm::event::poll` with a 250 ms timeout on the current
    /// thread. The terminal is restored even when drawing fails.
    pub fn run(mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

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
        };

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    /// Apply one key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => self.tab = self.tab.next(),
            KeyCode::BackTab => self.tab = self.tab.previous(),
            KeyCode::Char(c @ '1'..='4') => {
                let idx = c as usize - '1' as usize;
                self.tab = Tab::ALL[idx];
            }
            KeyCode::Char('s') => self.selected = RangeBound::Start,
            KeyCode::Char('e') => self.selected = RangeBound::End,
            KeyCode::Left => self.shift_selected(|d| shift_days(d, -1)),
            KeyCode::Right => self.shift_selected(|d| shift_days(d, 1)),
            KeyCode::Down => self.shift_selected(|d| shift_months(d, -1)),
            KeyCode::Up => self.shift_selected(|d| shift_months(d, 1)),
            KeyCode::Char('r') => self.set_range(self.bounds),
            _ => {}
        }
    }

    /// Replace the active range, clamped to the dataset span, and rebuild
    /// the report when it changed.
    pub fn set_range(&mut self, range: DateRange) {
        let range = range.clamp_to(&self.bounds);
        if range == self.range {
            return;
        }
        self.range = range;
        self.recompute();
    }

    /// Move the selected bound, keeping it inside the dataset span and on
    /// its own side of the other bound.
    fn shift_selected(&mut self, shift: impl Fn(NaiveDate) -> NaiveDate) {
        let (start, end) = (self.range.start(), self.range.end());
        let (start, end) = match self.selected {
            RangeBound::Start => (shift(start).max(self.bounds.start()).min(end), end),
            RangeBound::End => (start, shift(end).min(self.bounds.end()).max(start)),
        };
        if let Ok(range) = DateRange::new(start, end) {
            self.set_range(range);
        }
    }

    fn recompute(&mut self) {
        debug!("Recomputing report for {}", self.range);
        match build_report(&self.dataset, &self.range, self.policy) {
            Ok(report) => {
                self.report = report;
                self.last_error = None;
            }
            Err(e) => {
                warn!("Report for {} failed: {}", self.range, e);
                self.last_error = Some(e.to_string());
            }
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Render the current state into `frame`.
    pub fn render(&self, frame: &mut Frame) {
        let [header_area, tabs_area, body_area, footer_area] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let header = Header::new(TITLE, &self.range, Some(self.selected), &self.theme);
        frame.render_widget(Paragraph::new(Text::from(header.to_lines())), header_area);

        let titles = Tab::ALL
            .iter()
            .enumerate()
            .map(|(i, t)| format!("{} {}", i + 1, t.title()));
        let tabs = Tabs::new(titles)
            .select(self.tab.index())
            .style(self.theme.tab_inactive)
            .highlight_style(self.theme.tab_active)
            .divider(" | ");
        frame.render_widget(tabs, tabs_area);

        match self.tab {
            Tab::Monthly => {
                trend_view::render_trend_view(
                    frame,
                    body_area,
                    &self.report,
                    &self.options,
                    &self.theme,
                );
            }
            Tab::Table => {
                if self.report.monthly.is_empty() {
                    table_view::render_no_data(frame, body_area, Tab::Table.title(), &self.theme);
                } else {
                    table_view::render_monthly_table(
                        frame,
                        body_area,
                        &self.report.monthly,
                        &self.report.totals,
                        &self.options,
                        &self.theme,
                    );
                }
            }
            Tab::Categories => {
                category_view::render_category_view(
                    frame,
                    body_area,
                    &self.report,
                    &self.options,
                    &self.theme,
                );
            }
            Tab::Rfm => {
                rfm_view::render_rfm_view(
                    frame,
                    body_area,
                    &self.report,
                    &self.options,
                    &self.theme,
                );
            }
        }

        frame.render_widget(Paragraph::new(self.footer_line()), footer_area);
    }

    fn footer_line(&self) -> Line<'_> {
        if let Some(err) = &self.last_error {
            return Line::from(Span::styled(format!("Error: {err}"), self.theme.warning));
        }
        Line::from(Span::styled(
            "q quit | Tab/1-4 section | s/e pick bound | \u{2190}\u{2192} day | \u{2191}\u{2193} month | r reset",
            self.theme.dim,
        ))
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
