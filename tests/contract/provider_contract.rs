//! Every data operation honours the same envelope contract: the error field
//! beats the throttling notice, both beat any payload, and nothing is
//! retried for either.

#[path = "../support/mod.rs"]
mod support;

use quotekit_core::{ApiErrorKind, ClientError, ErrorKind, HttpError, StockMarketClient};
use support::{client_with, ScriptedHttpClient};

type Operation = fn(&StockMarketClient) -> Result<(), ClientError>;

fn quote(client: &StockMarketClient) -> Result<(), ClientError> {
    client.get_quote("AAPL").map(drop)
}

fn daily(client: &StockMarketClient) -> Result<(), ClientError> {
    client.get_daily_data("AAPL", "compact").map(drop)
}

fn intraday(client: &StockMarketClient) -> Result<(), ClientError> {
    client.get_intraday_data("AAPL", "5min", "compact").map(drop)
}

fn search(client: &StockMarketClient) -> Result<(), ClientError> {
    client.search_stocks("apple").map(drop)
}

fn overview(client: &StockMarketClient) -> Result<(), ClientError> {
    client.get_company_overview("AAPL").map(drop)
}

fn market_status(client: &StockMarketClient) -> Result<(), ClientError> {
    client.get_market_status().map(drop)
}

fn movers(client: &StockMarketClient) -> Result<(), ClientError> {
    client.get_top_gainers_losers().map(drop)
}

fn operation_cases() -> Vec<(&'static str, Operation)> {
    vec![
        ("get_quote", quote as Operation),
        ("get_daily_data", daily as Operation),
        ("get_intraday_data", intraday as Operation),
        ("search_stocks", search as Operation),
        ("get_company_overview", overview as Operation),
        ("get_market_status", market_status as Operation),
        ("get_top_gainers_losers", movers as Operation),
    ]
}

#[test]
fn error_message_field_is_an_api_error_for_all_operations() {
    for (name, operation) in operation_cases() {
        let http = ScriptedHttpClient::json(
            r#"{"Error Message": "Invalid API call.", "Note": "throttled", "Global Quote": {"05. price": "1"}}"#,
        );

        let error = operation(&client_with(&http))
            .expect_err(&format!("operation '{name}' must fail"));

        assert_eq!(
            error.api_kind(),
            Some(ApiErrorKind::Provider),
            "operation '{name}'"
        );
        assert_eq!(http.call_count(), 1, "operation '{name}': attempts");
    }
}

#[test]
fn notice_field_is_rate_limited_for_all_operations() {
    for (name, operation) in operation_cases() {
        let http = ScriptedHttpClient::json(
            r#"{"Note": "5 calls per minute", "markets": [{"region": "US"}]}"#,
        );

        let error = operation(&client_with(&http))
            .expect_err(&format!("operation '{name}' must fail"));

        assert_eq!(error.kind(), ErrorKind::RateLimited, "operation '{name}'");
        assert_eq!(http.call_count(), 1, "operation '{name}': attempts");
    }
}

#[test]
fn connection_error_is_not_retried_for_any_operation() {
    for (name, operation) in operation_cases() {
        let http = ScriptedHttpClient::always(Err(HttpError::connect("refused")));

        let error = operation(&client_with(&http))
            .expect_err(&format!("operation '{name}' must fail"));

        assert_eq!(
            error.kind(),
            ErrorKind::ConnectionFailure,
            "operation '{name}'"
        );
        assert_eq!(http.call_count(), 1, "operation '{name}': attempts");
    }
}

#[test]
fn empty_object_is_an_empty_success_for_all_operations() {
    for (name, operation) in operation_cases() {
        let http = ScriptedHttpClient::json("{}");

        operation(&client_with(&http))
            .unwrap_or_else(|error| panic!("operation '{name}' failed: {error}"));
    }
}
