use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use stock_growth::analysis::GrowthAnalyzer;
use stock_growth::api::FmpClient;
use stock_growth::models::Config;
use stock_growth::ui;

/// Compound growth of revenue, net income and free cash flow for a stock ticker
#[derive(Debug, Parser)]
#[command(name = "stock-growth", version, about)]
struct Args {
    /// Use the line-based prompt instead of the full-screen interface
    #[arg(long)]
    plain: bool,

    /// Read FMP_API_KEY / FMP_BASE_URL from this file instead of ./.env
    #[arg(long, value_name = "FILE")]
    env_file: Option<PathBuf>,
}

impl Args {
    /// The full-screen UI needs a terminal; piped output always gets the prompt
    fn use_plain_mode(&self, stdout_is_terminal: bool) -> bool {
        self.plain || !stdout_is_terminal
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let plain = args.use_plain_mode(io::stdout().is_terminal());

    // Keep the full-screen UI clean: only errors unless RUST_LOG says otherwise
    let default_filter = if plain { "stock_growth=info" } else { "stock_growth=error" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = match &args.env_file {
        Some(path) => Config::from_env_file(path),
        None => Config::from_env(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {:#}", e);
            eprintln!("❌ Configuration Error: {:#}", e);
            eprintln!("Make sure you have a .env file with FMP_API_KEY set.");
            std::process::exit(1);
        }
    };

    info!("Using data provider at {}", config.fmp_base_url);

    let client = FmpClient::new(&config).context("Failed to create data provider client")?;
    let analyzer = GrowthAnalyzer::new(client);

    if plain {
        let stdin = io::stdin();
        ui::run_prompt(&analyzer, stdin.lock(), io::stdout()).await
    } else {
        ui::run_app(analyzer).await
    }
}
