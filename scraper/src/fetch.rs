//! Blocking page fetcher with browser-like headers and retry on transient
//! failures.

use crate::config::ScraperConfig;
use crate::error::{ConfigError, FetchError};
use reqwest::blocking::Client;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, CONNECTION, RETRY_AFTER,
    USER_AGENT,
};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Anything that can turn a URL into page HTML.
pub trait PageSource {
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Capped exponential backoff: retry `n` (1-based) waits
/// `factor * 2^(n-1)`, or the server's `Retry-After` when that is longer,
/// never more than `max_backoff`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff_factor: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_factor: Duration::from_secs(1),
            max_backoff: Duration::from_secs(120),
        }
    }
}

impl RetryPolicy {
    pub fn backoff(&self, retry: u32, retry_after: Option<Duration>) -> Duration {
        let exponent = retry.saturating_sub(1).min(31);
        let computed = self.backoff_factor.saturating_mul(1u32 << exponent);
        let wait = match retry_after {
            Some(server) if server > computed => server,
            _ => computed,
        };
        wait.min(self.max_backoff)
    }

    /// Runs `attempt` until it succeeds, fails permanently, or the retry
    /// budget is spent.
    pub fn run<T>(
        &self,
        url: &str,
        mut attempt: impl FnMut() -> Result<T, FetchError>,
    ) -> Result<T, FetchError> {
        let mut retries = 0;
        loop {
            match attempt() {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_transient() => return Err(e),
                Err(e) if retries >= self.max_retries => {
                    return Err(FetchError::RetriesExhausted {
                        url: url.to_string(),
                        attempts: retries + 1,
                        last: Box::new(e),
                    });
                }
                Err(e) => {
                    retries += 1;
                    let wait = self.backoff(retries, e.retry_after());
                    warn!(
                        "{} (retry {}/{} in {:?})",
                        e, retries, self.max_retries, wait
                    );
                    thread::sleep(wait);
                }
            }
        }
    }
}

/// HTTP session used for one scrape.
pub struct Fetcher {
    client: Client,
    retry: RetryPolicy,
}

impl Fetcher {
    pub fn new(config: &ScraperConfig) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .default_headers(browser_headers(&config.user_agent)?)
            .timeout(config.timeout())
            .build()
            .map_err(ConfigError::Client)?;

        Ok(Self {
            client,
            retry: RetryPolicy {
                max_retries: config.max_retries,
                backoff_factor: config.backoff_factor(),
                max_backoff: config.backoff_max(),
            },
        })
    }

    fn get_once(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().map_err(|e| classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                retry_after,
            });
        }

        response.text().map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout { url: url.to_string() }
            } else {
                FetchError::Body {
                    url: url.to_string(),
                    source: e,
                }
            }
        })
    }
}

impl PageSource for Fetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        debug!("GET {}", url);
        self.retry.run(url, || self.get_once(url))
    }
}

fn classify(url: &str, e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout { url: url.to_string() }
    } else {
        FetchError::Network {
            url: url.to_string(),
            source: e,
        }
    }
}

fn browser_headers(user_agent: &str) -> Result<HeaderMap, ConfigError> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_str(user_agent)?);
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip, deflate"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    Ok(headers)
}
