//! Integration tests for the FMP client against a mock HTTP server

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use serde_json::json;
use stock_growth::api::{FetchError, FinancialDataProvider, FmpClient};
use stock_growth::models::{Config, FieldValue, Period, StatementKind, Ticker};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use crate::common::logging::{init_test_logging, log_test_step};
use crate::common::test_data::income_statement_json;
use crate::common::{json_response, mount_statement, start_provider, TEST_API_KEY};

#[tokio::test]
async fn test_fetch_income_statement() {
    init_test_logging();
    log_test_step("Fetching an annual income statement");

    let (server, client) = start_provider().await;
    let body = income_statement_json("AAPL", &[(391.0, 93.7), (383.3, 97.0), (394.3, 99.8)]);
    mount_statement(&server, "AAPL", StatementKind::IncomeStatement, json_response(body), 1).await;

    let ticker = Ticker::parse("aapl").unwrap();
    let series = client
        .fetch_statements(&ticker, StatementKind::IncomeStatement, Period::Annual)
        .await
        .unwrap();

    assert_eq!(series.ticker, ticker);
    assert_eq!(series.kind, StatementKind::IncomeStatement);
    assert_eq!(series.len(), 3);
    assert_eq!(series.records()[0].get("revenue"), Some(&FieldValue::Number(391.0)));
    assert_eq!(series.records()[2].get("revenue"), Some(&FieldValue::Number(394.3)));
    assert_eq!(series.records()[0].get("symbol"), Some(&FieldValue::Text("AAPL".to_string())));
    assert!(series.records()[0].get("link").is_none());
    assert_eq!(series.latest_period_end(), chrono::NaiveDate::from_ymd_opt(2024, 9, 30));
}

#[tokio::test]
async fn test_fetch_quarterly_cash_flow() {
    init_test_logging();
    let (server, client) = start_provider().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/cash-flow-statement/MSFT"))
        .and(query_param("period", "quarter"))
        .and(query_param("apikey", TEST_API_KEY))
        .respond_with(json_response(json!([{"freeCashFlow": 1.5e10}])))
        .expect(1)
        .mount(&server)
        .await;

    let series = client
        .fetch_statements(
            &Ticker::parse("MSFT").unwrap(),
            StatementKind::CashFlowStatement,
            Period::Quarter,
        )
        .await
        .unwrap();

    assert_eq!(series.records()[0].get("freeCashFlow"), Some(&FieldValue::Number(1.5e10)));
}

#[tokio::test]
async fn test_unknown_ticker_yields_empty_series() {
    let (server, client) = start_provider().await;
    mount_statement(&server, "ZZZZ", StatementKind::IncomeStatement, json_response(json!([])), 1).await;

    let series = client
        .fetch_statements(&Ticker::parse("zzzz").unwrap(), StatementKind::IncomeStatement, Period::Annual)
        .await
        .unwrap();

    assert!(series.is_empty());
}

#[tokio::test]
async fn test_non_success_status() {
    let (server, client) = start_provider().await;
    mount_statement(
        &server,
        "AAPL",
        StatementKind::IncomeStatement,
        ResponseTemplate::new(403).set_body_string("Forbidden"),
        1,
    )
    .await;

    let result = client
        .fetch_statements(&Ticker::parse("AAPL").unwrap(), StatementKind::IncomeStatement, Period::Annual)
        .await;

    assert_matches!(
        result,
        Err(FetchError::Status { status, body }) if status.as_u16() == 403 && body == "Forbidden"
    );
}

#[tokio::test]
async fn test_provider_error_message() {
    let (server, client) = start_provider().await;
    let body = json!({"Error Message": "Invalid API KEY. Please retry or visit our documentation."});
    mount_statement(&server, "AAPL", StatementKind::IncomeStatement, json_response(body), 1).await;

    let result = client
        .fetch_statements(&Ticker::parse("AAPL").unwrap(), StatementKind::IncomeStatement, Period::Annual)
        .await;

    assert_matches!(result, Err(FetchError::Provider(msg)) if msg.starts_with("Invalid API KEY."));
}

#[tokio::test]
async fn test_malformed_body() {
    let (server, client) = start_provider().await;
    mount_statement(
        &server,
        "AAPL",
        StatementKind::CashFlowStatement,
        ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"),
        1,
    )
    .await;

    let result = client
        .fetch_statements(&Ticker::parse("AAPL").unwrap(), StatementKind::CashFlowStatement, Period::Annual)
        .await;

    assert_matches!(result, Err(FetchError::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_provider() {
    // Reserve a free port, then release it so nothing is listening there
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = Config {
        fmp_api_key: TEST_API_KEY.to_string(),
        fmp_base_url: format!("http://127.0.0.1:{}", port),
    };
    let client = FmpClient::new(&config).unwrap();

    let result = client
        .fetch_statements(&Ticker::parse("AAPL").unwrap(), StatementKind::IncomeStatement, Period::Annual)
        .await;

    assert_matches!(result, Err(FetchError::Network(_)));
}
