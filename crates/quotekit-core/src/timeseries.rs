//! Typed view over a time-series envelope returned by
//! [`StockMarketClient::get_daily_data`](crate::StockMarketClient::get_daily_data) or
//! [`StockMarketClient::get_intraday_data`](crate::StockMarketClient::get_intraday_data).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::macros::format_description;
use time::{Date, PrimitiveDateTime};

use crate::envelope::{JsonObject, META_DATA_KEY, TIME_SERIES_MARKER};
use crate::ClientError;

/// One OHLCV bar. Timestamps are in the exchange time zone named in the
/// series metadata; daily bars sit at midnight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: PrimitiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    pub key: String,
    pub meta_data: JsonObject,
    /// Oldest first.
    pub bars: Vec<Bar>,
}

impl TimeSeries {
    pub fn from_envelope(envelope: &JsonObject) -> Result<Self, ClientError> {
        let (key, series) = envelope
            .iter()
            .find(|(key, _)| key.contains(TIME_SERIES_MARKER))
            .ok_or_else(|| ClientError::malformed("no time series in response"))?;
        let series = series
            .as_object()
            .ok_or_else(|| ClientError::malformed(format!("'{key}' is not an object")))?;

        let mut bars = series
            .iter()
            .map(|(timestamp, fields)| parse_bar(timestamp, fields))
            .collect::<Result<Vec<_>, _>>()?;
        bars.sort_by_key(|bar| bar.timestamp);

        let meta_data = envelope
            .get(META_DATA_KEY)
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        Ok(Self {
            key: key.clone(),
            meta_data,
            bars,
        })
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn latest(&self) -> Option<&Bar> {
        self.bars.last()
    }
}

fn parse_bar(timestamp: &str, fields: &Value) -> Result<Bar, ClientError> {
    let fields = fields
        .as_object()
        .ok_or_else(|| ClientError::malformed(format!("bar '{timestamp}' is not an object")))?;

    Ok(Bar {
        timestamp: parse_timestamp(timestamp)?,
        open: price(fields, "1. open", timestamp)?,
        high: price(fields, "2. high", timestamp)?,
        low: price(fields, "3. low", timestamp)?,
        close: price(fields, "4. close", timestamp)?,
        volume: volume(fields, timestamp)?,
    })
}

fn parse_timestamp(raw: &str) -> Result<PrimitiveDateTime, ClientError> {
    let with_time = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let date_only = format_description!("[year]-[month]-[day]");

    PrimitiveDateTime::parse(raw, with_time)
        .or_else(|_| Date::parse(raw, date_only).map(Date::midnight))
        .map_err(|error| ClientError::malformed(format!("invalid timestamp '{raw}': {error}")))
}

fn price(fields: &JsonObject, name: &str, timestamp: &str) -> Result<f64, ClientError> {
    let value = fields.get(name).ok_or_else(|| {
        ClientError::malformed(format!("bar '{timestamp}' is missing '{name}'"))
    })?;

    let parsed = match value {
        Value::String(text) => text.trim().parse::<f64>().ok(),
        Value::Number(number) => number.as_f64(),
        _ => None,
    };

    parsed.filter(|price| price.is_finite()).ok_or_else(|| {
        ClientError::malformed(format!("bar '{timestamp}' has invalid '{name}': {value}"))
    })
}

fn volume(fields: &JsonObject, timestamp: &str) -> Result<Option<u64>, ClientError> {
    let Some(value) = fields.get("5. volume") else {
        return Ok(None);
    };

    let parsed = match value {
        Value::String(text) => text.trim().parse::<u64>().ok(),
        Value::Number(number) => number.as_u64(),
        _ => None,
    };

    parsed.map(Some).ok_or_else(|| {
        ClientError::malformed(format!("bar '{timestamp}' has invalid '5. volume': {value}"))
    })
}
