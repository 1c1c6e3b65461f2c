use chrono::NaiveDate;
use tracing::{info, warn};

use crate::api::{FetchError, FinancialDataProvider};
use crate::models::{Period, StatementKind, StatementSeries, Ticker};
use super::growth::{calculate_growth, GrowthResult};

/// Reported growth metrics, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrowthMetric {
    Revenue,
    NetIncome,
    FreeCashFlow,
}

impl GrowthMetric {
    pub const ALL: [GrowthMetric; 3] = [
        GrowthMetric::Revenue,
        GrowthMetric::NetIncome,
        GrowthMetric::FreeCashFlow,
    ];

    /// Provider field name
    pub fn field(&self) -> &'static str {
        match self {
            GrowthMetric::Revenue => "revenue",
            GrowthMetric::NetIncome => "netIncome",
            GrowthMetric::FreeCashFlow => "freeCashFlow",
        }
    }

    /// Statement the field is read from
    pub fn statement_kind(&self) -> StatementKind {
        match self {
            GrowthMetric::Revenue | GrowthMetric::NetIncome => StatementKind::IncomeStatement,
            GrowthMetric::FreeCashFlow => StatementKind::CashFlowStatement,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GrowthMetric::Revenue => "Revenue",
            GrowthMetric::NetIncome => "Net Income",
            GrowthMetric::FreeCashFlow => "Free Cash Flow",
        }
    }
}

/// Fixed lookback windows.
///
/// An "N-year" window spans N-1 period boundaries: the 3-year figure compares
/// the latest period with the one two periods back, the 5-year figure with the
/// one four periods back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrowthWindow {
    ThreeYear,
    FiveYear,
}

impl GrowthWindow {
    pub const ALL: [GrowthWindow; 2] = [GrowthWindow::ThreeYear, GrowthWindow::FiveYear];

    pub fn lookback(&self) -> usize {
        match self {
            GrowthWindow::ThreeYear => 2,
            GrowthWindow::FiveYear => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GrowthWindow::ThreeYear => "3-Year",
            GrowthWindow::FiveYear => "5-Year",
        }
    }
}

/// One labeled line of the report
#[derive(Debug, Clone, PartialEq)]
pub struct MetricGrowth {
    pub metric: GrowthMetric,
    pub window: GrowthWindow,
    pub result: GrowthResult,
}

impl MetricGrowth {
    /// e.g. "3-Year Revenue Growth Rate"
    pub fn label(&self) -> String {
        format!("{} {} Growth Rate", self.window.label(), self.metric.label())
    }
}

/// Growth figures for one ticker
#[derive(Debug, Clone, PartialEq)]
pub struct GrowthReport {
    pub ticker: Ticker,
    pub income_period_end: Option<NaiveDate>,
    pub cash_flow_period_end: Option<NaiveDate>,
    pub entries: Vec<MetricGrowth>,
}

impl GrowthReport {
    /// Compute all metrics from already-fetched series. Each metric fails on its own.
    pub fn from_series(income: &StatementSeries, cash_flow: &StatementSeries) -> Self {
        let mut entries = Vec::with_capacity(GrowthMetric::ALL.len() * GrowthWindow::ALL.len());

        for metric in GrowthMetric::ALL {
            let series = match metric.statement_kind() {
                StatementKind::IncomeStatement => income,
                StatementKind::CashFlowStatement => cash_flow,
            };
            for window in GrowthWindow::ALL {
                let result = calculate_growth(series.records(), metric.field(), window.lookback());
                if let GrowthResult::Failed(e) = &result {
                    warn!("{} {} growth unavailable for {}: {}", window.label(), metric.label(), income.ticker, e);
                }
                entries.push(MetricGrowth { metric, window, result });
            }
        }

        Self {
            ticker: income.ticker.clone(),
            income_period_end: income.latest_period_end(),
            cash_flow_period_end: cash_flow.latest_period_end(),
            entries,
        }
    }

    pub fn get(&self, metric: GrowthMetric, window: GrowthWindow) -> Option<&GrowthResult> {
        self.entries
            .iter()
            .find(|entry| entry.metric == metric && entry.window == window)
            .map(|entry| &entry.result)
    }

    pub fn error_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.result.is_error()).count()
    }

    /// Plain text rendering, one metric per line
    pub fn to_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.entries.len() + 1);
        lines.push(format!("Financial Analysis for {}", self.ticker));
        for entry in &self.entries {
            lines.push(format!("{}: {}", entry.label(), entry.result));
        }
        lines
    }
}

/// Fetches both statements for a ticker and builds its growth report
pub struct GrowthAnalyzer<P> {
    provider: P,
}

impl<P: FinancialDataProvider> GrowthAnalyzer<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Run the analysis. The cash-flow request is only sent after the income
    /// request succeeded; any fetch failure aborts the whole report.
    pub async fn analyze(&self, ticker: &Ticker) -> Result<GrowthReport, FetchError> {
        info!("Analyzing growth for {}", ticker);

        let income = self
            .provider
            .fetch_statements(ticker, StatementKind::IncomeStatement, Period::Annual)
            .await?;
        let cash_flow = self
            .provider
            .fetch_statements(ticker, StatementKind::CashFlowStatement, Period::Annual)
            .await?;

        let report = GrowthReport::from_series(&income, &cash_flow);
        info!(
            "Finished analysis for {}: {} of {} metrics available",
            ticker,
            report.entries.len() - report.error_count(),
            report.entries.len()
        );
        Ok(report)
    }

    /// Analyze raw user input. Blank input performs no analysis and no request.
    pub async fn analyze_input(&self, input: &str) -> Result<Option<GrowthReport>, FetchError> {
        match Ticker::parse(input) {
            Some(ticker) => self.analyze(&ticker).await.map(Some),
            None => Ok(None),
        }
    }
}
