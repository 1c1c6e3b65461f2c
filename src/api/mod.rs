use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Period, StatementKind, StatementSeries, Ticker};

pub mod fmp_client;
pub use fmp_client::FmpClient;

/// Failures while retrieving statement data. These abort the analysis of a ticker.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("provider returned HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to decode provider response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("unexpected payload: {0}")]
    UnexpectedPayload(String),

    #[error("invalid request URL: {0}")]
    InvalidUrl(String),
}

/// Source of periodic financial statements
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FinancialDataProvider {
    /// Fetch one statement series, most recent period first. Issues exactly one request.
    async fn fetch_statements(
        &self,
        ticker: &Ticker,
        kind: StatementKind,
        period: Period,
    ) -> Result<StatementSeries, FetchError>;
}
