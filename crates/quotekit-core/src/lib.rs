//! # Quotekit Core
//!
//! Blocking client for the Alpha Vantage stock-market data API.
//!
//! ## Overview
//!
//! Alpha Vantage reports most failures inside `200 OK` JSON bodies. This
//! crate turns typed calls into `GET {base_url}?function=...&apikey=...`
//! requests, classifies the responses and hands back either the relevant
//! JSON slice or a [`ClientError`].
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | [`StockMarketClient`] and its seven data operations |
//! | [`config`] | [`ClientConfig`] |
//! | [`domain`] | Validated inputs ([`Symbol`], [`Interval`], [`OutputSize`]) |
//! | [`envelope`] | Provider response conventions |
//! | [`error`] | Error taxonomy |
//! | [`executor`] | Retry loop and response classification |
//! | [`http_client`] | Blocking transport abstraction |
//! | [`logging`] | Subscriber setup (feature `logging`) |
//! | [`params`] | Query parameters |
//! | [`retry`] | Attempt budget and backoff |
//! | [`settings`] | YAML + environment key/value settings |
//! | [`timeseries`] | Typed bars over a time-series envelope |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quotekit_core::{ClientConfig, StockMarketClient};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = StockMarketClient::new(ClientConfig::new("demo")?);
//!
//!     let quote = client.get_quote("ibm")?;
//!     println!("IBM: {:?}", quote.get("05. price"));
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use quotekit_core::{ClientError, ErrorKind};
//!
//! fn handle_error(error: &ClientError) {
//!     match error.kind() {
//!         ErrorKind::RateLimited => {
//!             // Wait for the provider window to reset
//!         }
//!         ErrorKind::ConnectionFailure => {
//!             // Network problem or every attempt timed out
//!         }
//!         ErrorKind::InvalidArguments => {
//!             // Report to user; nothing was sent
//!         }
//!         _ => {}
//!     }
//! }
//! ```
//!
//! An empty map or list is a successful "no data" answer, not an error.

pub mod client;
pub mod config;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod executor;
pub mod http_client;
#[cfg(feature = "logging")]
pub mod logging;
pub mod params;
pub mod retry;
pub mod settings;
pub mod timeseries;

pub use client::StockMarketClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT};
pub use domain::{Interval, OutputSize, Symbol};
pub use envelope::{JsonObject, ResponseEnvelope};
pub use error::{ApiErrorKind, ClientError, ConfigError, ErrorKind, ValidationError};
pub use executor::RequestExecutor;
pub use http_client::{
    HttpClient, HttpError, HttpErrorKind, HttpRequest, HttpResponse, ReqwestHttpClient,
};
#[cfg(feature = "logging")]
pub use logging::{init_logging, LoggingConfig, LoggingError};
pub use params::RequestParams;
pub use retry::{Backoff, RetryPolicy};
pub use settings::Settings;
pub use timeseries::{Bar, TimeSeries};
