use std::time::Duration;

use busylight_domain::BusylightError;
use reqwest::header::RETRY_AFTER;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response, StatusCode};
use tracing::{debug, warn};

use crate::errors::InfraError;

const DEFAULT_USER_AGENT: &str = concat!("busylight/", env!("CARGO_PKG_VERSION"));

/// When and how often a request is tried again.
///
/// Feed servers and the display both answer transient trouble with 5xx,
/// `408` or `429`; anything else is final on the first answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, the first one included. Never below one.
    pub max_attempts: usize,
    pub base_backoff: Duration,
    /// Ceiling for computed delays and for server `Retry-After` hints.
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `retry` (1-based): doubles each time.
    pub fn delay(&self, retry: usize) -> Duration {
        let shift = retry.saturating_sub(1).min(16) as u32;
        self.base_backoff.saturating_mul(1u32 << shift).min(self.max_backoff)
    }

    fn retryable_status(status: StatusCode) -> bool {
        status.is_server_error()
            || status == StatusCode::REQUEST_TIMEOUT
            || status == StatusCode::TOO_MANY_REQUESTS
    }

    fn retryable_error(err: &reqwest::Error) -> bool {
        err.is_timeout() || err.is_connect() || err.is_request()
    }
}

/// HTTP client with built-in retry and timeout support.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: ReqwestClient,
    policy: RetryPolicy,
}

impl HttpClient {
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, BusylightError> {
        Self::builder().build()
    }

    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute `builder`, retrying transient failures per the policy.
    ///
    /// The final response is returned whatever its status; use
    /// [`send_checked`](Self::send_checked) to reject non-2xx answers.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, BusylightError> {
        let mut attempt = 0;

        loop {
            attempt += 1;
            let request = builder
                .try_clone()
                .ok_or_else(|| BusylightError::Internal("streaming request bodies cannot be retried".into()))?
                .build()
                .map_err(|err| BusylightError::from(InfraError::from(err)))?;
            let (method, url) = (request.method().clone(), request.url().clone());

            let outcome = self.client.execute(request).await;
            let hint = match &outcome {
                Ok(response) if RetryPolicy::retryable_status(response.status()) => {
                    Some(retry_after(response))
                }
                Err(err) if RetryPolicy::retryable_error(err) => Some(None),
                _ => None,
            };

            let delay = match hint {
                Some(hint) if attempt < self.policy.max_attempts => {
                    hint.unwrap_or_else(|| self.policy.delay(attempt)).min(self.policy.max_backoff)
                }
                Some(_) => {
                    warn!(%method, %url, attempts = attempt, "giving up after transient failures");
                    return outcome.map_err(|err| InfraError::from(err).into());
                }
                None => return outcome.map_err(|err| InfraError::from(err).into()),
            };

            match &outcome {
                Ok(response) => {
                    debug!(attempt, %method, %url, status = %response.status(), ?delay, "retrying");
                }
                Err(err) => debug!(attempt, %method, %url, error = %err, ?delay, "retrying"),
            }
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
    }

    /// Like [`send`](Self::send) but maps a non-success status to an error.
    pub async fn send_checked(&self, builder: RequestBuilder) -> Result<Response, BusylightError> {
        let response = self.send(builder).await?;
        response.error_for_status().map_err(|err| InfraError::from(err).into())
    }
}

/// `Retry-After` in its delay-seconds form; HTTP dates are ignored.
fn retry_after(response: &Response) -> Option<Duration> {
    let value = response.headers().get(RETRY_AFTER)?.to_str().ok()?;
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    policy: RetryPolicy,
    user_agent: String,
    default_headers: Option<reqwest::header::HeaderMap>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            policy: RetryPolicy::default(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            default_headers: None,
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Configure the total number of attempts (initial try + retries).
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.policy.max_attempts = attempts.max(1);
        self
    }

    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.policy.base_backoff = backoff;
        self
    }

    pub fn max_backoff(mut self, backoff: Duration) -> Self {
        self.policy.max_backoff = backoff;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    pub fn default_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    pub fn build(self) -> Result<HttpClient, BusylightError> {
        let mut builder =
            ReqwestClient::builder().timeout(self.timeout).user_agent(self.user_agent).no_proxy();

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder.build().map_err(|err| BusylightError::from(InfraError::from(err)))?;
        let policy = RetryPolicy { max_attempts: self.policy.max_attempts.max(1), ..self.policy };

        Ok(HttpClient { client, policy })
    }
}
