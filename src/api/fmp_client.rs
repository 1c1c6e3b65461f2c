use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::fmt;
use tracing::{debug, warn};
use url::Url;

use crate::models::{Config, FinancialPeriodRecord, Period, StatementKind, StatementSeries, Ticker};
use super::{FetchError, FinancialDataProvider};

/// Longest error body kept in a `FetchError::Status`
const MAX_ERROR_BODY_LEN: usize = 256;

/// Financial Modeling Prep REST client
pub struct FmpClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl fmt::Debug for FmpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FmpClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl FmpClient {
    /// Create a new client. No request timeout is configured beyond reqwest's defaults.
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(concat!("stock-growth/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let base_url = Url::parse(&config.fmp_base_url)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", config.fmp_base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl(config.fmp_base_url.clone()));
        }

        Ok(Self {
            client,
            api_key: config.fmp_api_key.clone(),
            base_url,
        })
    }

    /// Build `{base}/api/v3/{statement}/{TICKER}?period=..&apikey=..`
    pub fn statement_url(
        &self,
        ticker: &Ticker,
        kind: StatementKind,
        period: Period,
    ) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["api", "v3", kind.path_segment(), ticker.as_str()]);
        url.query_pairs_mut()
            .append_pair("period", period.as_query_value())
            .append_pair("apikey", &self.api_key);
        Ok(url)
    }
}

#[async_trait]
impl FinancialDataProvider for FmpClient {
    async fn fetch_statements(
        &self,
        ticker: &Ticker,
        kind: StatementKind,
        period: Period,
    ) -> Result<StatementSeries, FetchError> {
        let url = self.statement_url(ticker, kind, period)?;

        debug!("Requesting {} for {}: GET {}", kind.label(), ticker, redact_api_key(&url));

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            truncate_on_char_boundary(&mut body, MAX_ERROR_BODY_LEN);
            warn!("{} request for {} failed with status {}", kind.path_segment(), ticker, status);
            return Err(FetchError::Status { status, body });
        }

        let bytes = response.bytes().await?;
        let payload: Value = serde_json::from_slice(&bytes)?;
        let records = parse_statement_payload(payload)?;

        debug!("Retrieved {} {} records for {}", records.len(), kind.path_segment(), ticker);
        Ok(StatementSeries::new(ticker.clone(), kind, records))
    }
}

/// Turn the provider's JSON body into records, preserving provider order.
pub fn parse_statement_payload(payload: Value) -> Result<Vec<FinancialPeriodRecord>, FetchError> {
    match payload {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                if !item.is_object() {
                    return Err(FetchError::UnexpectedPayload(format!(
                        "element {} is {}, expected an object",
                        index,
                        json_kind(&item)
                    )));
                }
                Ok(serde_json::from_value::<FinancialPeriodRecord>(item)?)
            })
            .collect(),
        Value::Object(object) => match object.get("Error Message").and_then(Value::as_str) {
            Some(message) => Err(FetchError::Provider(message.to_string())),
            None => Err(FetchError::UnexpectedPayload(
                "expected a JSON array, found an object".to_string(),
            )),
        },
        other => Err(FetchError::UnexpectedPayload(format!(
            "expected a JSON array, found {}",
            json_kind(&other)
        ))),
    }
}

/// Copy of `url` safe to log: the `apikey` query value is masked
fn redact_api_key(url: &Url) -> Url {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(name, value)| {
            let value = if name == "apikey" {
                "REDACTED".to_string()
            } else {
                value.into_owned()
            };
            (name.into_owned(), value)
        })
        .collect();

    let mut redacted = url.clone();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn truncate_on_char_boundary(text: &mut String, max_len: usize) {
    if text.len() <= max_len {
        return;
    }
    let mut cut = max_len;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    text.truncate(cut);
}
