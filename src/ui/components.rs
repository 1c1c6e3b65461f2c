//! UI components and utilities for the growth analyzer
use chrono::NaiveDate;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::analysis::{GrowthReport, GrowthResult};
use crate::models::StatementKind;

/// Render a loading indicator
pub fn render_loading_indicator(f: &mut Frame, area: Rect, message: &str) {
    let loading = Paragraph::new(message)
        .block(Block::default().borders(Borders::ALL).title("Loading"))
        .style(Style::default().fg(Color::Yellow));

    f.render_widget(loading, area);
}

/// Render error message
pub fn render_error(f: &mut Frame, area: Rect, error: &str) {
    let error_paragraph = Paragraph::new(error)
        .block(Block::default().borders(Borders::ALL).title("Error"))
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true });

    f.render_widget(error_paragraph, area);
}

/// Growth figure colored by sign; errors in yellow
pub fn growth_result_span(result: &GrowthResult) -> Span<'static> {
    let style = match result {
        GrowthResult::Rate(rate) if *rate >= 0.0 => Style::default().fg(Color::Green),
        GrowthResult::Rate(_) => Style::default().fg(Color::Red),
        GrowthResult::Failed(_) => Style::default().fg(Color::Yellow),
    };
    Span::styled(result.to_string(), style)
}

/// Format an optional fiscal period end for display
pub fn format_period_end(date: Option<NaiveDate>) -> String {
    date.map_or("N/A".to_string(), |d| d.format("%Y-%m-%d").to_string())
}

/// Report lines: period ends, then one line per metric
pub fn report_lines(report: &GrowthReport) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!("Latest {}: ", StatementKind::IncomeStatement.label()),
                Style::default().fg(Color::Gray),
            ),
            Span::styled(format_period_end(report.income_period_end), Style::default().fg(Color::White)),
            Span::styled(
                format!("  Latest {}: ", StatementKind::CashFlowStatement.label()),
                Style::default().fg(Color::Gray),
            ),
            Span::styled(format_period_end(report.cash_flow_period_end), Style::default().fg(Color::White)),
        ]),
        Line::from(""),
    ];

    for entry in &report.entries {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{}: ", entry.label()),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            growth_result_span(&entry.result),
        ]));
    }

    lines
}

/// Render the growth report panel
pub fn render_report(f: &mut Frame, area: Rect, report: &GrowthReport) {
    let paragraph = Paragraph::new(report_lines(report))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Financial Analysis for {}", report.ticker)),
        )
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}
