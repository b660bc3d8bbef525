//! Data operations.
//!
//! Each operation validates its inputs (before any I/O), builds the query,
//! runs it through the [`RequestExecutor`] and extracts its slice of the
//! envelope. Absence of data is an empty result, never an error. Executor
//! failures are logged and passed through unchanged.

use std::str::FromStr;
use std::sync::Arc;

use serde_json::Value;

use crate::config::ClientConfig;
use crate::envelope::{JsonObject, ResponseEnvelope};
use crate::executor::RequestExecutor;
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::params::RequestParams;
use crate::{ClientError, Interval, OutputSize, Symbol, ValidationError};

/// Provider `function` names.
pub mod functions {
    pub const GLOBAL_QUOTE: &str = "GLOBAL_QUOTE";
    pub const TIME_SERIES_DAILY: &str = "TIME_SERIES_DAILY";
    pub const TIME_SERIES_INTRADAY: &str = "TIME_SERIES_INTRADAY";
    pub const SYMBOL_SEARCH: &str = "SYMBOL_SEARCH";
    pub const OVERVIEW: &str = "OVERVIEW";
    pub const MARKET_STATUS: &str = "MARKET_STATUS";
    pub const TOP_GAINERS_LOSERS: &str = "TOP_GAINERS_LOSERS";
}

/// Blocking Alpha Vantage client.
///
/// Holds no per-call state; concurrent calls on one instance only share the
/// transport's connection pool.
#[derive(Clone)]
pub struct StockMarketClient {
    executor: RequestExecutor,
}

impl StockMarketClient {
    /// Client over the production reqwest transport.
    pub fn new(config: ClientConfig) -> Self {
        Self::with_http_client(config, Arc::new(ReqwestHttpClient::new()))
    }

    pub fn with_http_client(config: ClientConfig, http_client: Arc<dyn HttpClient>) -> Self {
        tracing::info!(base_url = %config.base_url(), "StockMarketClient initialized");
        Self {
            executor: RequestExecutor::new(config, http_client),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        self.executor.config()
    }

    /// Latest quote for `symbol`, the object under `Global Quote`.
    pub fn get_quote(&self, symbol: &str) -> Result<JsonObject, ClientError> {
        let symbol = Symbol::parse(symbol)?;
        tracing::info!(symbol = %symbol, "fetching quote");

        let params =
            RequestParams::new(functions::GLOBAL_QUOTE).with("symbol", symbol.as_str());
        let envelope = self.run(params, || format!("failed to fetch quote for {symbol}"))?;

        match envelope.global_quote() {
            Some(quote) => {
                tracing::info!(symbol = %symbol, "fetched quote");
                Ok(quote.clone())
            }
            None => {
                tracing::warn!(symbol = %symbol, "no quote data found");
                Ok(JsonObject::new())
            }
        }
    }

    /// Full daily envelope (`Meta Data` and `Time Series (Daily)`).
    pub fn get_daily_data(
        &self,
        symbol: &str,
        outputsize: &str,
    ) -> Result<JsonObject, ClientError> {
        let symbol = Symbol::parse(symbol)?;
        let outputsize = OutputSize::from_str(outputsize)?;
        tracing::info!(symbol = %symbol, outputsize = %outputsize, "fetching daily data");

        let params = RequestParams::new(functions::TIME_SERIES_DAILY)
            .with("symbol", symbol.as_str())
            .with("outputsize", outputsize.as_str());
        let envelope =
            self.run(params, || format!("failed to fetch daily data for {symbol}"))?;

        if envelope.daily_series().is_none() {
            tracing::warn!(symbol = %symbol, "no daily data found");
            return Ok(JsonObject::new());
        }

        tracing::info!(symbol = %symbol, "fetched daily data");
        Ok(envelope.into_object())
    }

    /// Full intraday envelope. Validation order: symbol, interval, outputsize.
    pub fn get_intraday_data(
        &self,
        symbol: &str,
        interval: &str,
        outputsize: &str,
    ) -> Result<JsonObject, ClientError> {
        let symbol = Symbol::parse(symbol)?;
        let interval = Interval::from_str(interval)?;
        let outputsize = OutputSize::from_str(outputsize)?;
        tracing::info!(symbol = %symbol, interval = %interval, "fetching intraday data");

        let params = RequestParams::new(functions::TIME_SERIES_INTRADAY)
            .with("symbol", symbol.as_str())
            .with("interval", interval.as_str())
            .with("outputsize", outputsize.as_str());
        let envelope =
            self.run(params, || format!("failed to fetch intraday data for {symbol}"))?;

        if envelope.time_series().is_none() {
            tracing::warn!(symbol = %symbol, "no intraday data found");
            return Ok(JsonObject::new());
        }

        tracing::info!(symbol = %symbol, "fetched intraday data");
        Ok(envelope.into_object())
    }

    /// Candidate matches from `bestMatches`.
    pub fn search_stocks(&self, keywords: &str) -> Result<Vec<Value>, ClientError> {
        let keywords = keywords.trim();
        if keywords.is_empty() {
            return Err(ValidationError::EmptyKeywords.into());
        }
        tracing::info!(keywords, "searching stocks");

        let params = RequestParams::new(functions::SYMBOL_SEARCH).with("keywords", keywords);
        let envelope = self.run(params, || {
            format!("failed to search stocks with keywords '{keywords}'")
        })?;

        let matches = envelope.best_matches().map(<[Value]>::to_vec).unwrap_or_default();
        tracing::info!(keywords, count = matches.len(), "search finished");
        Ok(matches)
    }

    /// Full overview envelope. An unknown symbol comes back as a lone echoed
    /// field and is reported as empty.
    pub fn get_company_overview(&self, symbol: &str) -> Result<JsonObject, ClientError> {
        let symbol = Symbol::parse(symbol)?;
        tracing::info!(symbol = %symbol, "fetching company overview");

        let params = RequestParams::new(functions::OVERVIEW).with("symbol", symbol.as_str());
        let envelope = self.run(params, || {
            format!("failed to fetch company overview for {symbol}")
        })?;

        if envelope.field_count() <= 1 {
            tracing::warn!(symbol = %symbol, "no company overview found");
            return Ok(JsonObject::new());
        }

        tracing::info!(symbol = %symbol, "fetched company overview");
        Ok(envelope.into_object())
    }

    /// Open/closed state of global markets.
    pub fn get_market_status(&self) -> Result<JsonObject, ClientError> {
        tracing::info!("fetching market status");

        let envelope = self.run(RequestParams::new(functions::MARKET_STATUS), || {
            String::from("failed to fetch market status")
        })?;

        if envelope.markets().is_none() {
            tracing::warn!("no market status data found");
            return Ok(JsonObject::new());
        }

        tracing::info!("fetched market status");
        Ok(envelope.into_object())
    }

    /// Top gainers, losers and most actively traded tickers of the day.
    pub fn get_top_gainers_losers(&self) -> Result<JsonObject, ClientError> {
        tracing::info!("fetching top gainers and losers");

        let envelope = self.run(RequestParams::new(functions::TOP_GAINERS_LOSERS), || {
            String::from("failed to fetch top gainers/losers")
        })?;

        if envelope.top_gainers().is_none() && envelope.top_losers().is_none() {
            tracing::warn!("no gainers/losers data found");
            return Ok(JsonObject::new());
        }

        tracing::info!("fetched top gainers and losers");
        Ok(envelope.into_object())
    }

    fn run<F>(&self, params: RequestParams, context: F) -> Result<ResponseEnvelope, ClientError>
    where
        F: FnOnce() -> String,
    {
        self.executor.execute(params).inspect_err(|error| {
            tracing::error!(error = %error, "{}", context());
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::{HttpError, HttpRequest, HttpResponse};

    struct PanicHttpClient;

    impl HttpClient for PanicHttpClient {
        fn execute(&self, _request: HttpRequest) -> Result<HttpResponse, HttpError> {
            panic!("validation must fail before any request is sent");
        }
    }

    fn offline_client() -> StockMarketClient {
        let config = ClientConfig::new("test_api_key").expect("valid key");
        StockMarketClient::with_http_client(config, Arc::new(PanicHttpClient))
    }

    #[test]
    fn blank_symbol_fails_before_io() {
        let client = offline_client();

        assert_eq!(
            client.get_quote("  ").expect_err("must fail"),
            ClientError::InvalidArguments(ValidationError::EmptySymbol)
        );
        assert!(client.get_daily_data("", "compact").is_err());
        assert!(client.get_company_overview("").is_err());
    }

    #[test]
    fn intraday_reports_first_failing_argument() {
        let client = offline_client();

        let err = client
            .get_intraday_data("", "2min", "huge")
            .expect_err("must fail");
        assert_eq!(err, ClientError::InvalidArguments(ValidationError::EmptySymbol));

        let err = client
            .get_intraday_data("AAPL", "2min", "huge")
            .expect_err("must fail");
        assert!(matches!(
            err,
            ClientError::InvalidArguments(ValidationError::InvalidInterval { .. })
        ));

        let err = client
            .get_intraday_data("AAPL", "5min", "huge")
            .expect_err("must fail");
        assert!(matches!(
            err,
            ClientError::InvalidArguments(ValidationError::InvalidOutputSize { .. })
        ));
    }

    #[test]
    fn blank_keywords_fail_before_io() {
        let err = offline_client().search_stocks(" \t").expect_err("must fail");
        assert_eq!(err, ClientError::InvalidArguments(ValidationError::EmptyKeywords));
    }
}
