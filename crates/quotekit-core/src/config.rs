use std::fmt::{Debug, Formatter};
use std::time::Duration;

use crate::retry::{Backoff, RetryPolicy};
use crate::settings::Settings;
use crate::{ClientError, ConfigError, ValidationError};

pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Immutable connection settings owned by one client instance.
#[derive(Clone, PartialEq)]
pub struct ClientConfig {
    api_key: String,
    base_url: String,
    timeout: Duration,
    max_retries: u32,
    backoff: Backoff,
}

impl ClientConfig {
    /// Fails when `api_key` is empty or blank.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ClientError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ValidationError::MissingApiKey.into());
        }

        Ok(Self {
            api_key,
            base_url: String::from(DEFAULT_BASE_URL),
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff: Backoff::None,
        })
    }

    /// Builds from `alpha_vantage.*` keys; absent optional keys keep defaults.
    pub fn from_settings(settings: &Settings) -> Result<Self, ClientError> {
        let api_key = settings
            .get_string("alpha_vantage.api_key")
            .unwrap_or_default();
        let mut config = Self::new(api_key)?;

        if let Some(base_url) = settings.get_string("alpha_vantage.base_url") {
            config = config.with_base_url(base_url);
        }
        if let Some(seconds) = settings
            .get_u64("alpha_vantage.timeout")
            .map_err(config_to_error)?
        {
            config = config.with_timeout(Duration::from_secs(seconds));
        }
        if let Some(retries) = settings
            .get_u64("alpha_vantage.max_retries")
            .map_err(config_to_error)?
        {
            config = config.with_max_retries(u32::try_from(retries).unwrap_or(u32::MAX));
        }

        Ok(config)
    }

    /// A blank URL keeps the default endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        if !base_url.trim().is_empty() {
            self.base_url = base_url;
        }
        self
    }

    /// Per-attempt timeout. Zero keeps the 30 second default.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        if !timeout.is_zero() {
            self.timeout = timeout;
        }
        self
    }

    /// Total attempts for a timing-out request. Clamped to at least 1.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub const fn backoff(&self) -> Backoff {
        self.backoff
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, self.backoff)
    }
}

// Keeps the key out of logs and panic messages.
impl Debug for ClientConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("backoff", &self.backoff)
            .finish()
    }
}

fn config_to_error(error: ConfigError) -> ClientError {
    ClientError::InvalidArguments(ValidationError::InvalidConfig {
        message: error.to_string(),
    })
}
