use anyhow::{anyhow, Context};
use chrono::NaiveDate;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// Default Financial Modeling Prep host
pub const DEFAULT_FMP_BASE_URL: &str = "https://financialmodelingprep.com";

/// Validated, uppercased ticker symbol
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ticker(String);

impl Ticker {
    /// Normalize raw user input. Returns `None` for blank input.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Ticker(trimmed.to_uppercase()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Financial statement types served by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    IncomeStatement,
    CashFlowStatement,
}

impl StatementKind {
    /// Path segment used by the provider's REST API
    pub fn path_segment(&self) -> &'static str {
        match self {
            StatementKind::IncomeStatement => "income-statement",
            StatementKind::CashFlowStatement => "cash-flow-statement",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatementKind::IncomeStatement => "Income Statement",
            StatementKind::CashFlowStatement => "Cash Flow Statement",
        }
    }
}

/// Reporting period granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Period {
    #[default]
    Annual,
    Quarter,
}

impl Period {
    pub fn as_query_value(&self) -> &'static str {
        match self {
            Period::Annual => "annual",
            Period::Quarter => "quarter",
        }
    }
}

/// A single field of a financial statement
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(value) => Some(*value),
            FieldValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value),
            FieldValue::Number(_) => None,
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// Provider field as it arrives on the wire
#[derive(Deserialize)]
#[serde(untagged)]
enum WireField {
    Number(f64),
    Text(String),
    Flag(bool),
    Other(IgnoredAny),
}

impl WireField {
    /// Booleans are kept as text; arrays and nested objects are dropped
    fn into_field(self) -> Option<FieldValue> {
        match self {
            WireField::Number(value) => Some(FieldValue::Number(value)),
            WireField::Text(value) => Some(FieldValue::Text(value)),
            WireField::Flag(flag) => Some(FieldValue::Text(flag.to_string())),
            WireField::Other(IgnoredAny) => None,
        }
    }
}

/// One reporting period (e.g. one fiscal year) for one company
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FinancialPeriodRecord {
    fields: HashMap<String, FieldValue>,
}

impl FinancialPeriodRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Look up a field; `None` when the provider did not report it
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Fiscal period end, parsed from the provider's `date` field
    pub fn period_end(&self) -> Option<NaiveDate> {
        self.get("date")
            .and_then(FieldValue::as_str)
            .and_then(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for FinancialPeriodRecord
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = FinancialPeriodRecord::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}

impl<'de> Deserialize<'de> for FinancialPeriodRecord {
    /// Nulls are dropped along with arrays and nested objects.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = HashMap::<String, Option<WireField>>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .filter_map(|(name, value)| value.and_then(WireField::into_field).map(|field| (name, field)))
            .collect())
    }
}

/// Periodic records for one ticker and statement kind, most recent first
#[derive(Debug, Clone, PartialEq)]
pub struct StatementSeries {
    pub ticker: Ticker,
    pub kind: StatementKind,
    pub records: Vec<FinancialPeriodRecord>,
}

impl StatementSeries {
    pub fn new(ticker: Ticker, kind: StatementKind, records: Vec<FinancialPeriodRecord>) -> Self {
        Self { ticker, kind, records }
    }

    pub fn records(&self) -> &[FinancialPeriodRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Period end date of the most recent record, if reported
    pub fn latest_period_end(&self) -> Option<NaiveDate> {
        self.records.first().and_then(FinancialPeriodRecord::period_end)
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for the application, loaded once at startup
#[derive(Clone)]
pub struct Config {
    pub fmp_api_key: String,
    pub fmp_base_url: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("fmp_api_key", &"<redacted>")
            .field("fmp_base_url", &self.fmp_base_url)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from a specific env file. Values defined in the file win
    /// over the process environment; the process environment is left untouched.
    pub fn from_env_file(path: &Path) -> anyhow::Result<Self> {
        let mut file_vars = HashMap::new();
        let entries = dotenvy::from_path_iter(path)
            .with_context(|| format!("Failed to open env file {}", path.display()))?;
        for entry in entries {
            let (key, value) = entry
                .with_context(|| format!("Failed to parse env file {}", path.display()))?;
            file_vars.insert(key, value);
        }

        Self::from_lookup(|key| {
            file_vars
                .get(key)
                .cloned()
                .or_else(|| std::env::var(key).ok())
        })
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let fmp_api_key = lookup("FMP_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| anyhow!("FMP_API_KEY environment variable required"))?;

        let fmp_base_url = lookup("FMP_BASE_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_FMP_BASE_URL.to_string());

        url::Url::parse(&fmp_base_url)
            .with_context(|| format!("FMP_BASE_URL is not a valid URL: {}", fmp_base_url))?;

        Ok(Config {
            fmp_api_key,
            fmp_base_url,
        })
    }
}
