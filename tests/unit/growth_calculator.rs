//! Growth calculator behavior through the public API

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use stock_growth::analysis::{
    calculate_growth, compound_growth_rate, GrowthError, GrowthReport, GrowthResult,
};
use stock_growth::models::{StatementKind, StatementSeries, Ticker};

use crate::common::test_data::records_with;

#[test]
fn test_rate_matches_formula_for_every_lookback() {
    let values = [210.0, 190.0, 160.0, 150.0, 120.0, 100.0];
    let records = records_with("revenue", &values);

    for lookback in 1..values.len() {
        let expected = ((values[0] / values[lookback]).powf(1.0 / lookback as f64) - 1.0) * 100.0;
        let result = calculate_growth(&records, "revenue", lookback);

        assert_eq!(result.to_string(), format!("{:.2}%", expected));
    }
}

#[test]
fn test_format_has_two_decimals_and_percent_suffix() {
    let records = records_with("revenue", &[2.0, 1.0]);
    let text = calculate_growth(&records, "revenue", 1).to_string();

    assert_eq!(text, "100.00%");
    let number = text.strip_suffix('%').unwrap();
    assert_eq!(number.split('.').nth(1).map(str::len), Some(2));
}

#[test]
fn test_lookback_at_or_past_length_is_an_error() {
    let records = records_with("revenue", &[3.0, 2.0, 1.0]);

    for lookback in 3..6 {
        assert_matches!(
            compound_growth_rate(&records, "revenue", lookback),
            Err(GrowthError::InsufficientHistory { available: 3, .. })
        );
    }
}

#[test]
fn test_zero_base_never_renders_infinity() {
    let records = records_with("freeCashFlow", &[10.0, 5.0, 0.0, 0.0, 0.0]);

    for lookback in [2, 4] {
        let text = calculate_growth(&records, "freeCashFlow", lookback).to_string();
        assert!(text.starts_with("Error: division by zero"), "{}", text);
    }
}

#[test]
fn test_overflowing_growth_is_an_error() {
    let records = records_with("revenue", &[1e308, 1e-308]);

    assert_matches!(
        compound_growth_rate(&records, "revenue", 1),
        Err(GrowthError::NonFinite { field }) if field == "revenue"
    );
    let text = calculate_growth(&records, "revenue", 1).to_string();
    assert!(text.starts_with("Error: "), "{}", text);
    assert!(!text.contains("inf"));
}

#[test]
fn test_negative_ratio_is_an_error() {
    let records = records_with("netIncome", &[-10.0, 5.0, 20.0, 5.0, 40.0]);

    assert_matches!(
        calculate_growth(&records, "netIncome", 2),
        GrowthResult::Failed(GrowthError::NegativeRatio { .. })
    );
    assert_matches!(
        calculate_growth(&records, "netIncome", 4),
        GrowthResult::Failed(GrowthError::NegativeRatio { .. })
    );
}

#[test]
fn test_short_cash_flow_history_keeps_income_metrics() {
    let ticker = Ticker::parse("newco").unwrap();
    let mut income_records = records_with("revenue", &[150.0, 140.0, 130.0]);
    for (record, net_income) in income_records.iter_mut().zip([30.0, 25.0, 20.0]) {
        record.insert("netIncome", net_income);
    }
    let income = StatementSeries::new(ticker.clone(), StatementKind::IncomeStatement, income_records);
    let cash_flow = StatementSeries::new(
        ticker,
        StatementKind::CashFlowStatement,
        records_with("freeCashFlow", &[12.0, 10.0]),
    );

    let report = GrowthReport::from_series(&income, &cash_flow);
    let rendered: Vec<String> = report.entries.iter().map(|e| e.result.to_string()).collect();

    assert_eq!(rendered[0], "7.42%");
    assert!(rendered[1].starts_with("Error: insufficient history"));
    assert_eq!(rendered[2], "22.47%");
    assert!(rendered[4].starts_with("Error: insufficient history"));
    assert!(rendered[5].starts_with("Error: insufficient history"));
}
