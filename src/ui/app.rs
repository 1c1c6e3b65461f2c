use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::io::{self, Write};
use tracing::error;

use crate::analysis::{GrowthAnalyzer, GrowthReport};
use crate::api::FinancialDataProvider;
use crate::models::Ticker;
use super::components::{render_error, render_loading_indicator, render_report};
use super::input::{InputAction, TickerInput};

/// What the results panel currently shows
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisView {
    Idle,
    Loading(Ticker),
    Report(GrowthReport),
    FetchFailed { ticker: Ticker, message: String },
}

pub struct GrowthApp<P> {
    analyzer: GrowthAnalyzer<P>,
    pub input: TickerInput,
    pub view: AnalysisView,
    pub should_quit: bool,
}

impl<P: FinancialDataProvider> GrowthApp<P> {
    pub fn new(analyzer: GrowthAnalyzer<P>) -> Self {
        Self {
            analyzer,
            input: TickerInput::new(),
            view: AnalysisView::Idle,
            should_quit: false,
        }
    }

    pub fn draw(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(3), // Ticker input
                Constraint::Min(0),    // Results
                Constraint::Length(3), // Status bar
            ])
            .split(f.area());

        let title = Paragraph::new("📈 Stock Growth Analyzer")
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
        f.render_widget(title, chunks[0]);

        let input = Paragraph::new(self.input.render_with_cursor())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Enter Stock Ticker (e.g., AAPL, TSLA)"),
            )
            .style(Style::default().fg(Color::White));
        f.render_widget(input, chunks[1]);

        self.render_results(f, chunks[2]);
        self.render_status_bar(f, chunks[3]);
    }

    fn render_results(&self, f: &mut Frame, area: Rect) {
        match &self.view {
            AnalysisView::Idle => {
                let empty = Paragraph::new("Type a ticker and press Enter to analyze its growth")
                    .block(Block::default().borders(Borders::ALL))
                    .style(Style::default().fg(Color::Gray));
                f.render_widget(empty, area);
            }
            AnalysisView::Loading(ticker) => {
                render_loading_indicator(f, area, &format!("Fetching financial statements for {}...", ticker));
            }
            AnalysisView::Report(report) => render_report(f, area, report),
            AnalysisView::FetchFailed { ticker, message } => {
                render_error(f, area, &format!("Could not fetch financial data for {}: {}", ticker, message));
            }
        }
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let status_text = vec![Line::from(vec![
            Span::styled("Enter", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::styled(" to analyze • ", Style::default().fg(Color::Gray)),
            Span::styled("Ctrl+U", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::styled(" to clear • ", Style::default().fg(Color::Gray)),
            Span::styled("Esc", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::styled(" to quit", Style::default().fg(Color::Gray)),
        ])];

        let paragraph = Paragraph::new(status_text)
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().fg(Color::White));

        f.render_widget(paragraph, area);
    }

    /// Handle a key press. Returns the ticker to analyze when one was submitted.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<Ticker> {
        match self.input.handle_key_event(key) {
            InputAction::Quit => {
                self.should_quit = true;
                None
            }
            InputAction::Submit(raw) => {
                let ticker = Ticker::parse(&raw)?;
                self.view = AnalysisView::Loading(ticker.clone());
                Some(ticker)
            }
            InputAction::None => None,
        }
    }

    /// Run the full analysis for `ticker`, replacing the results panel
    pub async fn run_analysis(&mut self, ticker: &Ticker) {
        match self.analyzer.analyze(ticker).await {
            Ok(report) => self.view = AnalysisView::Report(report),
            Err(e) => {
                error!("Analysis of {} aborted: {}", ticker, e);
                self.view = AnalysisView::FetchFailed {
                    ticker: ticker.clone(),
                    message: e.to_string(),
                };
            }
        }
    }
}

/// Run the main TUI application
pub async fn run_app<P: FinancialDataProvider>(analyzer: GrowthAnalyzer<P>) -> Result<()> {
    enable_raw_mode()?;
    let session = run_session(analyzer).await;
    finish_session(session, &mut io::stdout())
}

async fn run_session<P: FinancialDataProvider>(analyzer: GrowthAnalyzer<P>) -> Result<()> {
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let mut app = GrowthApp::new(analyzer);
    event_loop(&mut terminal, &mut app).await
}

/// Leave raw mode and the alternate screen whatever the session outcome.
/// A session error takes precedence over a cleanup error.
fn finish_session<W: Write>(session: Result<()>, out: &mut W) -> Result<()> {
    let raw_mode = disable_raw_mode();
    let screen = out.execute(LeaveAlternateScreen).map(|_| ());

    session
        .and(raw_mode.map_err(anyhow::Error::from))
        .and(screen.map_err(anyhow::Error::from))
}

async fn event_loop<B, P>(terminal: &mut Terminal<B>, app: &mut GrowthApp<P>) -> Result<()>
where
    B: Backend,
    P: FinancialDataProvider,
{
    loop {
        terminal.draw(|f| app.draw(f))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            if let Some(ticker) = app.handle_key_event(key) {
                // Show the loading panel; the fetch blocks until it completes
                terminal.draw(|f| app.draw(f))?;
                app.run_analysis(&ticker).await;
            }

            if app.should_quit {
                return Ok(());
            }
        }
    }
}
