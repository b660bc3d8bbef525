use std::fmt::{Display, Formatter};

use thiserror::Error;

/// Local input validation failures. Never involve the network.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing api key")]
    MissingApiKey,
    #[error("symbol must be a non-empty string")]
    EmptySymbol,
    #[error("keywords must be a non-empty string")]
    EmptyKeywords,
    #[error("invalid interval '{value}', expected one of 1min, 5min, 15min, 30min, 60min")]
    InvalidInterval { value: String },
    #[error("invalid output size '{value}', expected 'compact' or 'full'")]
    InvalidOutputSize { value: String },
    #[error("invalid client configuration: {message}")]
    InvalidConfig { message: String },
}

/// Sub-classification of provider-side failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// The body carried the provider's error-message field.
    Provider,
    /// The body carried the provider's throttling notice.
    RateLimited,
    /// The HTTP status was 4xx or 5xx.
    HttpStatus(u16),
    /// The body was not a JSON object.
    MalformedResponse,
    /// Transport failure that is neither a timeout nor a connect error.
    Transport,
}

impl Display for ApiErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Provider => f.write_str("provider error"),
            Self::RateLimited => f.write_str("rate limited"),
            Self::HttpStatus(status) => write!(f, "http status {status}"),
            Self::MalformedResponse => f.write_str("malformed response"),
            Self::Transport => f.write_str("request failed"),
        }
    }
}

/// Flat discriminant for branching on a [`ClientError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArguments,
    Api,
    RateLimited,
    ConnectionFailure,
    DataNotFound,
}

/// Every failure a client call can report.
///
/// `RateLimited` is modelled as an [`ApiErrorKind`] so that it is still an
/// API error for callers that only check [`ClientError::is_api_error`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("invalid arguments: {0}")]
    InvalidArguments(#[from] ValidationError),

    #[error("alpha vantage {kind}: {message}")]
    Api { kind: ApiErrorKind, message: String },

    #[error("connection failure: {0}")]
    ConnectionFailure(String),

    /// Reserved. Operations report absence as an empty result instead.
    #[error("data not found: {0}")]
    DataNotFound(String),
}

impl ClientError {
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Api {
            kind: ApiErrorKind::Provider,
            message: message.into(),
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::Api {
            kind: ApiErrorKind::RateLimited,
            message: message.into(),
        }
    }

    pub fn http_status(status: u16) -> Self {
        Self::Api {
            kind: ApiErrorKind::HttpStatus(status),
            message: format!("upstream returned status {status}"),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Api {
            kind: ApiErrorKind::MalformedResponse,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Api {
            kind: ApiErrorKind::Transport,
            message: message.into(),
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::ConnectionFailure(message.into())
    }

    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArguments(_) => ErrorKind::InvalidArguments,
            Self::Api {
                kind: ApiErrorKind::RateLimited,
                ..
            } => ErrorKind::RateLimited,
            Self::Api { .. } => ErrorKind::Api,
            Self::ConnectionFailure(_) => ErrorKind::ConnectionFailure,
            Self::DataNotFound(_) => ErrorKind::DataNotFound,
        }
    }

    pub const fn api_kind(&self) -> Option<ApiErrorKind> {
        match self {
            Self::Api { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// True for every provider-side failure, rate limits included.
    pub const fn is_api_error(&self) -> bool {
        matches!(self, Self::Api { .. })
    }

    pub const fn is_rate_limited(&self) -> bool {
        matches!(
            self,
            Self::Api {
                kind: ApiErrorKind::RateLimited,
                ..
            }
        )
    }
}

/// Failures while loading or reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("config value at '{path}' must be {expected}")]
    InvalidValue { path: String, expected: &'static str },
}
