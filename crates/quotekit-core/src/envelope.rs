//! Provider response envelope.
//!
//! Alpha Vantage answers 200 for almost everything and signals failures
//! through keys in the JSON body. Every key the client cares about is named
//! here once, behind an accessor returning an optional view.

use serde_json::{Map, Value};

use crate::ClientError;

/// JSON object as returned by the data operations.
pub type JsonObject = Map<String, Value>;

pub(crate) const ERROR_MESSAGE_KEY: &str = "Error Message";
pub(crate) const NOTE_KEY: &str = "Note";
pub(crate) const GLOBAL_QUOTE_KEY: &str = "Global Quote";
pub(crate) const DAILY_SERIES_KEY: &str = "Time Series (Daily)";
pub(crate) const TIME_SERIES_MARKER: &str = "Time Series";
pub(crate) const META_DATA_KEY: &str = "Meta Data";
pub(crate) const BEST_MATCHES_KEY: &str = "bestMatches";
pub(crate) const MARKETS_KEY: &str = "markets";
pub(crate) const TOP_GAINERS_KEY: &str = "top_gainers";
pub(crate) const TOP_LOSERS_KEY: &str = "top_losers";

/// Parsed top-level JSON object of a provider response.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    body: JsonObject,
}

impl ResponseEnvelope {
    pub fn new(body: JsonObject) -> Self {
        Self { body }
    }

    /// Parses a raw body. Anything other than a JSON object is malformed.
    pub fn parse(raw: &str) -> Result<Self, ClientError> {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(body)) => Ok(Self::new(body)),
            Ok(other) => Err(ClientError::malformed(format!(
                "expected a JSON object, got {}",
                json_type_name(&other)
            ))),
            Err(error) => Err(ClientError::malformed(format!(
                "response body is not valid JSON: {error}"
            ))),
        }
    }

    /// `Error Message`: the provider rejected the request.
    pub fn error_message(&self) -> Option<&str> {
        self.body.get(ERROR_MESSAGE_KEY).map(message_text)
    }

    /// `Note`: the caller is throttled.
    pub fn rate_limit_notice(&self) -> Option<&str> {
        self.body.get(NOTE_KEY).map(message_text)
    }

    /// Applies the in-body failure conventions in order: error message first,
    /// then throttling notice.
    pub fn into_result(self) -> Result<Self, ClientError> {
        if let Some(message) = self.error_message() {
            return Err(ClientError::provider(message));
        }
        if let Some(notice) = self.rate_limit_notice() {
            return Err(ClientError::rate_limited(notice));
        }
        Ok(self)
    }

    /// Non-empty `Global Quote` object.
    pub fn global_quote(&self) -> Option<&JsonObject> {
        non_empty_object(self.body.get(GLOBAL_QUOTE_KEY))
    }

    /// Non-empty `Time Series (Daily)` object.
    pub fn daily_series(&self) -> Option<&JsonObject> {
        non_empty_object(self.body.get(DAILY_SERIES_KEY))
    }

    /// Name of the first key containing `Time Series`, e.g. `Time Series (5min)`.
    pub fn time_series_key(&self) -> Option<&str> {
        self.body
            .keys()
            .find(|key| key.contains(TIME_SERIES_MARKER))
            .map(String::as_str)
    }

    /// Non-empty object under [`Self::time_series_key`].
    pub fn time_series(&self) -> Option<&JsonObject> {
        self.time_series_key()
            .and_then(|key| non_empty_object(self.body.get(key)))
    }

    pub fn meta_data(&self) -> Option<&JsonObject> {
        self.body.get(META_DATA_KEY).and_then(Value::as_object)
    }

    /// `bestMatches` list; present-but-empty yields an empty slice.
    pub fn best_matches(&self) -> Option<&[Value]> {
        self.body
            .get(BEST_MATCHES_KEY)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
    }

    /// Non-empty `markets` list.
    pub fn markets(&self) -> Option<&[Value]> {
        non_empty_array(self.body.get(MARKETS_KEY))
    }

    /// Non-empty `top_gainers` list.
    pub fn top_gainers(&self) -> Option<&[Value]> {
        non_empty_array(self.body.get(TOP_GAINERS_KEY))
    }

    /// Non-empty `top_losers` list.
    pub fn top_losers(&self) -> Option<&[Value]> {
        non_empty_array(self.body.get(TOP_LOSERS_KEY))
    }

    pub fn field_count(&self) -> usize {
        self.body.len()
    }

    pub fn as_object(&self) -> &JsonObject {
        &self.body
    }

    pub fn into_object(self) -> JsonObject {
        self.body
    }
}

fn non_empty_object(value: Option<&Value>) -> Option<&JsonObject> {
    value
        .and_then(Value::as_object)
        .filter(|object| !object.is_empty())
}

fn non_empty_array(value: Option<&Value>) -> Option<&[Value]> {
    value
        .and_then(Value::as_array)
        .filter(|items| !items.is_empty())
        .map(Vec::as_slice)
}

fn message_text(value: &Value) -> &str {
    value.as_str().unwrap_or("(non-text message)")
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
