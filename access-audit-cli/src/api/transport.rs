//! HTTP transport for directory requests
//!
//! The Graph client talks to this trait instead of reqwest directly, which
//! keeps pagination and token handling testable without a network.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, RETRY_AFTER};
use serde_json::Value;
use std::time::Duration;

use super::resilience::{ResilienceConfig, RetryPolicy};
use crate::error::UpstreamRequestError;

/// Minimal JSON-over-HTTP surface needed by the Graph client
#[async_trait]
pub trait GraphTransport: Send + Sync {
    /// GET `url` with a bearer token and decode the JSON body
    async fn get_json(&self, url: &str, bearer: &str) -> Result<Value, UpstreamRequestError>;

    /// POST a form to `url` and decode the JSON body.
    ///
    /// Non-success responses are returned as `Status` errors with the raw
    /// body so the caller can decode error payloads.
    async fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
    ) -> Result<Value, UpstreamRequestError>;
}

/// reqwest-backed transport with retries on transient failures
pub struct ReqwestTransport {
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl ReqwestTransport {
    pub fn new(config: &ResilienceConfig) -> Result<Self, UpstreamRequestError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("access-audit/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| UpstreamRequestError::Transport {
                url: String::new(),
                reason: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            retry: RetryPolicy::new(config.retry.clone()),
        })
    }

    /// Send the request built by `build`, retrying transient failures
    async fn send_with_retry<F>(&self, url: &str, build: F) -> Result<Value, UpstreamRequestError>
    where
        F: Fn() -> reqwest::RequestBuilder + Send + Sync,
    {
        let mut attempt = 1;
        loop {
            let outcome = match build().send().await {
                Ok(response) => {
                    let retry_after = parse_retry_after(response.headers().get(RETRY_AFTER));
                    read_json(url, response).await.map_err(|e| (e, retry_after))
                }
                Err(e) => Err((
                    UpstreamRequestError::Transport {
                        url: url.to_string(),
                        reason: e.to_string(),
                    },
                    None,
                )),
            };

            match outcome {
                Ok(value) => return Ok(value),
                Err((err, retry_after)) => {
                    if !err.is_transient() || !self.retry.should_retry(attempt) {
                        return Err(err);
                    }
                    let delay = self.retry.delay_for(attempt, retry_after);
                    log::warn!(
                        "Attempt {}/{} failed ({}), retrying in {}ms",
                        attempt,
                        self.retry.max_attempts(),
                        err,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[async_trait]
impl GraphTransport for ReqwestTransport {
    async fn get_json(&self, url: &str, bearer: &str) -> Result<Value, UpstreamRequestError> {
        log::debug!("GET {}", url);
        let authorization = format!("Bearer {}", bearer);
        self.send_with_retry(url, || {
            self.client
                .get(url)
                .header(AUTHORIZATION, authorization.as_str())
                .header("Accept", "application/json")
        })
        .await
    }

    async fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
    ) -> Result<Value, UpstreamRequestError> {
        log::debug!("POST {}", url);
        self.send_with_retry(url, || self.client.post(url).form(form))
            .await
    }
}

/// Decode a response body, mapping non-success statuses to errors
async fn read_json(url: &str, response: reqwest::Response) -> Result<Value, UpstreamRequestError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(UpstreamRequestError::Status {
            url: url.to_string(),
            status: status.as_u16(),
            body,
        });
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| UpstreamRequestError::InvalidResponse {
            url: url.to_string(),
            reason: e.to_string(),
        })
}

/// Retry-After in delta-seconds form; HTTP-date values are ignored
fn parse_retry_after(value: Option<&reqwest::header::HeaderValue>) -> Option<Duration> {
    value
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

#[cfg(test)]
pub mod mock {
    //! Scripted transport for client tests

    use super::*;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    /// Returns queued responses per URL and records every request
    #[derive(Default)]
    pub struct MockTransport {
        responses: Mutex<HashMap<String, VecDeque<Result<Value, UpstreamRequestError>>>>,
        pub requests: Mutex<Vec<String>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(&self, url: &str, response: Result<Value, UpstreamRequestError>) {
            self.responses
                .lock()
                .unwrap()
                .entry(url.to_string())
                .or_default()
                .push_back(response);
        }

        pub fn requested(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }

        fn next(&self, url: &str) -> Result<Value, UpstreamRequestError> {
            self.requests.lock().unwrap().push(url.to_string());
            self.responses
                .lock()
                .unwrap()
                .get_mut(url)
                .and_then(|queue| queue.pop_front())
                .unwrap_or_else(|| {
                    Err(UpstreamRequestError::Status {
                        url: url.to_string(),
                        status: 404,
                        body: "no scripted response".to_string(),
                    })
                })
        }
    }

    #[async_trait]
    impl GraphTransport for MockTransport {
        async fn get_json(&self, url: &str, _bearer: &str) -> Result<Value, UpstreamRequestError> {
            self.next(url)
        }

        async fn post_form(
            &self,
            url: &str,
            _form: &[(&str, &str)],
        ) -> Result<Value, UpstreamRequestError> {
            self.next(url)
        }
    }
}
