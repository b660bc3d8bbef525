use std::sync::Arc;

use crate::config::ClientConfig;
use crate::envelope::ResponseEnvelope;
use crate::http_client::{HttpClient, HttpErrorKind, HttpRequest};
use crate::params::RequestParams;
use crate::ClientError;

const API_KEY_PARAM: &str = "apikey";

/// Owns the transport and turns one parameter set into one classified
/// provider response.
#[derive(Clone)]
pub struct RequestExecutor {
    config: ClientConfig,
    http_client: Arc<dyn HttpClient>,
}

impl RequestExecutor {
    pub fn new(config: ClientConfig, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            config,
            http_client,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Attaches the api key and performs the GET.
    ///
    /// Only timeouts are retried, up to the configured attempt count.
    /// Connect errors, HTTP error statuses, malformed bodies and in-body
    /// error or throttling signals fail on first occurrence.
    pub fn execute(&self, mut params: RequestParams) -> Result<ResponseEnvelope, ClientError> {
        params.insert(API_KEY_PARAM, self.config.api_key());
        let function = params.function().to_owned();
        let policy = self.config.retry_policy();
        let max_attempts = policy.max_attempts();

        let mut attempt = 1;
        loop {
            tracing::debug!(function = %function, attempt, max_attempts, "dispatching provider request");

            let request = HttpRequest::get(self.config.base_url(), params.clone())
                .with_timeout(self.config.timeout());

            let response = match self.http_client.execute(request) {
                Ok(response) => response,
                Err(error) => match error.kind() {
                    HttpErrorKind::Timeout if !policy.is_last_attempt(attempt) => {
                        tracing::warn!(
                            function = %function,
                            attempt,
                            max_attempts,
                            "request timed out, retrying"
                        );
                        let delay = policy.delay_after(attempt);
                        if !delay.is_zero() {
                            std::thread::sleep(delay);
                        }
                        attempt += 1;
                        continue;
                    }
                    HttpErrorKind::Timeout => {
                        tracing::error!(function = %function, attempts = attempt, "request timed out on every attempt");
                        return Err(ClientError::connection(format!(
                            "request timeout after all retries ({attempt} attempts)"
                        )));
                    }
                    HttpErrorKind::Connect => {
                        tracing::error!(function = %function, error = %error, "connection error");
                        return Err(ClientError::connection(format!(
                            "failed to connect to Alpha Vantage API: {error}"
                        )));
                    }
                    HttpErrorKind::Other => {
                        tracing::error!(function = %function, error = %error, "request error");
                        return Err(ClientError::transport(format!("request failed: {error}")));
                    }
                },
            };

            if response.is_client_or_server_error() {
                tracing::error!(function = %function, status = response.status, "provider returned an error status");
                return Err(ClientError::http_status(response.status));
            }

            return ResponseEnvelope::parse(&response.body)
                .and_then(ResponseEnvelope::into_result)
                .inspect_err(|error| log_envelope_failure(&function, error));
        }
    }
}

fn log_envelope_failure(function: &str, error: &ClientError) {
    if error.is_rate_limited() {
        tracing::warn!(function = %function, error = %error, "provider rate limit");
    } else {
        tracing::error!(function = %function, error = %error, "provider rejected request");
    }
}
