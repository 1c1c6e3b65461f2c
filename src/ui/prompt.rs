use anyhow::Result;
use std::io::{BufRead, Write};
use tracing::error;

use crate::analysis::GrowthAnalyzer;
use crate::api::FinancialDataProvider;

const PROMPT: &str = "Enter Stock Ticker (e.g., AAPL, TSLA): ";

/// Line-oriented fallback when the full-screen UI is not available.
/// Reads tickers until end of input; blank lines are skipped without a request.
pub async fn run_prompt<P, R, W>(analyzer: &GrowthAnalyzer<P>, mut input: R, mut output: W) -> Result<()>
where
    P: FinancialDataProvider,
    R: BufRead,
    W: Write,
{
    writeln!(output, "📊 STOCK GROWTH ANALYZER")?;
    writeln!(output, "========================")?;

    loop {
        write!(output, "{}", PROMPT)?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(());
        }

        match analyzer.analyze_input(&line).await {
            Ok(Some(report)) => {
                writeln!(output)?;
                for text in report.to_lines() {
                    writeln!(output, "{}", text)?;
                }
                writeln!(output)?;
            }
            Ok(None) => {}
            Err(e) => {
                let ticker = line.trim().to_uppercase();
                error!("Analysis of {} aborted: {}", ticker, e);
                writeln!(output, "❌ Could not fetch financial data for {}: {}", ticker, e)?;
            }
        }
    }
}
