use std::fmt;
use thiserror::Error;

use crate::models::{FieldValue, FinancialPeriodRecord};

/// Why a single growth figure could not be produced
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GrowthError {
    #[error("lookback must be at least one period")]
    InvalidLookback,

    #[error("insufficient history: need {required} periods, have {available}")]
    InsufficientHistory { required: usize, available: usize },

    #[error("field '{field}' missing from period {index}")]
    MissingField { field: String, index: usize },

    #[error("field '{field}' in period {index} is not numeric")]
    NonNumeric { field: String, index: usize },

    #[error("division by zero: '{field}' was zero in the comparison period")]
    DivisionByZero { field: String },

    #[error("negative ratio {ratio:.4} for '{field}' has no real compound growth rate")]
    NegativeRatio { field: String, ratio: f64 },

    #[error("growth of '{field}' is not a finite number")]
    NonFinite { field: String },
}

/// Outcome of one growth calculation, displayed as `12.34%` or `Error: ...`
#[derive(Debug, Clone, PartialEq)]
pub enum GrowthResult {
    Rate(f64),
    Failed(GrowthError),
}

impl GrowthResult {
    pub fn rate(&self) -> Option<f64> {
        match self {
            GrowthResult::Rate(rate) => Some(*rate),
            GrowthResult::Failed(_) => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, GrowthResult::Failed(_))
    }
}

impl From<Result<f64, GrowthError>> for GrowthResult {
    fn from(result: Result<f64, GrowthError>) -> Self {
        match result {
            Ok(rate) => GrowthResult::Rate(rate),
            Err(e) => GrowthResult::Failed(e),
        }
    }
}

impl fmt::Display for GrowthResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrowthResult::Rate(rate) => write!(f, "{:.2}%", rate),
            GrowthResult::Failed(e) => write!(f, "Error: {}", e),
        }
    }
}

/// Compound annual growth rate, in percent, between `records[0]` and
/// `records[lookback]`:
///
/// `((recent / past) ^ (1 / lookback) - 1) * 100`
pub fn compound_growth_rate(
    records: &[FinancialPeriodRecord],
    field: &str,
    lookback: usize,
) -> Result<f64, GrowthError> {
    if lookback == 0 {
        return Err(GrowthError::InvalidLookback);
    }
    if lookback >= records.len() {
        return Err(GrowthError::InsufficientHistory {
            required: lookback + 1,
            available: records.len(),
        });
    }

    let recent = numeric_field(&records[0], field, 0)?;
    let past = numeric_field(&records[lookback], field, lookback)?;

    if past == 0.0 {
        return Err(GrowthError::DivisionByZero {
            field: field.to_string(),
        });
    }

    let ratio = recent / past;
    if ratio < 0.0 {
        return Err(GrowthError::NegativeRatio {
            field: field.to_string(),
            ratio,
        });
    }

    let rate = (ratio.powf(1.0 / lookback as f64) - 1.0) * 100.0;
    if !rate.is_finite() {
        return Err(GrowthError::NonFinite {
            field: field.to_string(),
        });
    }

    Ok(rate)
}

/// Growth calculation with the error kept in the result, so one bad metric
/// never hides the others.
pub fn calculate_growth(
    records: &[FinancialPeriodRecord],
    field: &str,
    lookback: usize,
) -> GrowthResult {
    compound_growth_rate(records, field, lookback).into()
}

fn numeric_field(
    record: &FinancialPeriodRecord,
    field: &str,
    index: usize,
) -> Result<f64, GrowthError> {
    match record.get(field) {
        None => Err(GrowthError::MissingField {
            field: field.to_string(),
            index,
        }),
        Some(FieldValue::Number(value)) if value.is_finite() => Ok(*value),
        Some(_) => Err(GrowthError::NonNumeric {
            field: field.to_string(),
            index,
        }),
    }
}
