use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Duration;

use crate::params::RequestParams;

const USER_AGENT: &str = concat!("quotekit/", env!("CARGO_PKG_VERSION"));

/// Outgoing GET request: base URL, query parameters and per-attempt timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub query: RequestParams,
    pub timeout: Duration,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>, query: RequestParams) -> Self {
        Self {
            url: url.into(),
            query,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Renders `url?k=v&...` with every key and value percent-encoded.
    pub fn to_url(&self) -> String {
        let query = self
            .query
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&");

        if query.is_empty() {
            self.url.clone()
        } else if self.url.contains('?') {
            format!("{}&{query}", self.url)
        } else {
            format!("{}?{query}", self.url)
        }
    }
}

/// Status and raw body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok_json(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    pub const fn is_client_or_server_error(&self) -> bool {
        self.status >= 400 && self.status < 600
    }
}

/// Transport failure class; decides whether the executor retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpErrorKind {
    Timeout,
    Connect,
    Other,
}

/// Transport-level HTTP error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpError {
    kind: HttpErrorKind,
    message: String,
}

impl HttpError {
    pub fn new(kind: HttpErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(HttpErrorKind::Timeout, message)
    }

    pub fn connect(message: impl Into<String>) -> Self {
        Self::new(HttpErrorKind::Connect, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(HttpErrorKind::Other, message)
    }

    pub const fn kind(&self) -> HttpErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for HttpError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for HttpError {}

/// Blocking transport contract. One call is one HTTP attempt.
pub trait HttpClient: Send + Sync {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, HttpError>;
}

/// Production transport backed by `reqwest::blocking`.
///
/// Must not be driven from inside an async runtime worker thread.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Arc<reqwest::blocking::Client>,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self {
            client: Arc::new(
                reqwest::blocking::Client::builder()
                    .user_agent(USER_AGENT)
                    .build()
                    .unwrap_or_else(|_| reqwest::blocking::Client::new()),
            ),
        }
    }

    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestHttpClient {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let response = self
            .client
            .get(request.to_url())
            .timeout(request.timeout)
            .send()
            .map_err(|error| classify(error, "request"))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|error| classify(error, "reading response body"))?;

        Ok(HttpResponse { status, body })
    }
}

fn classify(error: reqwest::Error, stage: &str) -> HttpError {
    // Strip the URL: it carries the api key.
    let error = error.without_url();
    if error.is_timeout() {
        HttpError::timeout(format!("{stage} timed out: {error}"))
    } else if error.is_connect() {
        HttpError::connect(format!("{stage} failed to connect: {error}"))
    } else {
        HttpError::other(format!("{stage} failed: {error}"))
    }
}
