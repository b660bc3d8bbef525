//! Scripted transport shared by the behaviour tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use quotekit_core::{
    ClientConfig, HttpClient, HttpError, HttpRequest, HttpResponse, StockMarketClient,
};

/// Replays queued outcomes in order and records every request it sees.
/// Once the queue is drained the last outcome repeats.
#[derive(Debug)]
pub struct ScriptedHttpClient {
    outcomes: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
    last: Mutex<Option<Result<HttpResponse, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedHttpClient {
    pub fn new(outcomes: Vec<Result<HttpResponse, HttpError>>) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(outcomes.into()),
            last: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn json(body: &str) -> Arc<Self> {
        Self::new(vec![Ok(HttpResponse::ok_json(body))])
    }

    pub fn always(outcome: Result<HttpResponse, HttpError>) -> Arc<Self> {
        Self::new(vec![outcome])
    }

    pub fn recorded_requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .len()
    }

    pub fn last_query(&self, key: &str) -> Option<String> {
        self.recorded_requests()
            .last()
            .and_then(|request| request.query.get(key).map(str::to_owned))
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .push(request);

        let next = self
            .outcomes
            .lock()
            .expect("outcome queue should not be poisoned")
            .pop_front();
        let mut last = self.last.lock().expect("last outcome should not be poisoned");
        match next {
            Some(outcome) => {
                *last = Some(outcome.clone());
                outcome
            }
            None => last
                .clone()
                .unwrap_or_else(|| Err(HttpError::other("no scripted outcome"))),
        }
    }
}

pub fn test_config() -> ClientConfig {
    ClientConfig::new("test_api_key")
        .expect("valid api key")
        .with_base_url("https://alphavantage.test/query")
}

pub fn client_with(http: &Arc<ScriptedHttpClient>) -> StockMarketClient {
    StockMarketClient::with_http_client(test_config(), http.clone())
}
