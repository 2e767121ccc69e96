//! HTTP client for mirror sites
//!
//! Wraps reqwest with per-call timeouts, a randomized politeness delay,
//! a liveness probe and a short-link redirect resolver with fixed-backoff
//! retries. Requests are issued one at a time by the callers.

use std::time::Duration;

use rand::Rng;
use reqwest::StatusCode;
use reqwest::header::{self, HeaderMap, HeaderValue};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::error::{DuanjuError, Result};
use crate::url::with_scheme;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Liveness probe timeout (default: 5s)
    pub probe_timeout: Duration,
    /// Short-link resolution timeout per attempt (default: 10s)
    pub redirect_timeout: Duration,
    /// Search and detail page timeout (default: 30s)
    pub request_timeout: Duration,
    /// Total attempts when resolving a short link (default: 3)
    pub redirect_attempts: u32,
    /// Fixed pause between resolution attempts (default: 2s)
    pub retry_backoff: Duration,
    /// Lower bound of the politeness delay (default: 500ms)
    pub delay_min: Duration,
    /// Upper bound of the politeness delay (default: 1500ms)
    pub delay_max: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            probe_timeout: Duration::from_secs(5),
            redirect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_attempts: 3,
            retry_backoff: Duration::from_secs(2),
            delay_min: Duration::from_millis(500),
            delay_max: Duration::from_millis(1500),
        }
    }
}

/// Randomized pause issued before every page fetch
///
/// Each call draws a fresh duration uniformly from `[min, max]`.
#[derive(Debug, Clone)]
pub struct PolitenessDelay {
    min_ms: u64,
    max_ms: u64,
}

impl PolitenessDelay {
    /// Create a delay drawn from `[min, max]`; bounds are swapped if reversed
    pub fn new(min: Duration, max: Duration) -> Self {
        let (a, b) = (min.as_millis() as u64, max.as_millis() as u64);
        Self {
            min_ms: a.min(b),
            max_ms: a.max(b),
        }
    }

    /// Draw the next pause length
    pub fn next_delay(&self) -> Duration {
        let ms = rand::rng().random_range(self.min_ms..=self.max_ms);
        Duration::from_millis(ms)
    }

    /// Sleep for a freshly drawn pause
    pub async fn wait(&self) {
        let delay = self.next_delay();
        if !delay.is_zero() {
            sleep(delay).await;
        }
    }

    pub fn bounds(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.min_ms),
            Duration::from_millis(self.max_ms),
        )
    }
}

/// HTTP client wrapper for mirror sites
///
/// Holds two reqwest clients: one following redirects for ordinary page
/// loads, and one with redirects disabled for short-link resolution.
pub struct DuanjuClient {
    client: reqwest::Client,
    no_redirect: reqwest::Client,
    delay: PolitenessDelay,
    config: ClientConfig,
}

impl DuanjuClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let client = Self::builder(&config)
            .build()
            .map_err(DuanjuError::HttpError)?;

        let no_redirect = Self::builder(&config)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(DuanjuError::HttpError)?;

        Ok(Self {
            client,
            no_redirect,
            delay: PolitenessDelay::new(config.delay_min, config.delay_max),
            config,
        })
    }

    fn builder(config: &ClientConfig) -> reqwest::ClientBuilder {
        reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .default_headers({
                let mut headers = HeaderMap::new();
                headers.insert(
                    header::ACCEPT,
                    HeaderValue::from_static(
                        "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
                    ),
                );
                headers.insert(
                    header::ACCEPT_LANGUAGE,
                    HeaderValue::from_static("zh-CN,zh;q=0.9,en;q=0.8"),
                );
                headers
            })
    }

    /// Check whether an endpoint currently answers with HTTP 200
    ///
    /// Single attempt with the short probe timeout, no politeness delay.
    ///
    /// # Errors
    /// - `HttpError` - timeout, DNS or connection failure
    /// - `Status` - any status other than 200
    pub async fn probe(&self, url: &str) -> Result<()> {
        let response = self
            .client
            .get(url)
            .timeout(self.config.probe_timeout)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::OK {
            Ok(())
        } else {
            Err(DuanjuError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            })
        }
    }

    /// Fetch a page body after the politeness delay
    ///
    /// # Errors
    /// - `HttpError` - network failure or body read failure
    /// - `Status` - any status other than 200
    pub async fn fetch_page(&self, url: &str) -> Result<String> {
        self.delay.wait().await;

        debug!(url, "fetching page");
        let response = self
            .client
            .get(url)
            .timeout(self.config.request_timeout)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(DuanjuError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(DuanjuError::HttpError)
    }

    /// Resolve a short link to the URL it currently redirects to
    ///
    /// Scheme-less links are treated as `http://`. A 3xx answer yields its
    /// `Location` header verbatim, a 200 yields the link itself. Anything
    /// else is retried after a fixed backoff until the attempt budget is
    /// spent.
    ///
    /// # Returns
    /// The resolved URL, or `None` after all attempts failed
    pub async fn resolve_redirect(&self, short_url: &str) -> Option<String> {
        let url = with_scheme(short_url);
        let attempts = self.config.redirect_attempts.max(1);

        for attempt in 1..=attempts {
            info!(url = %url, attempt, "resolving short link");
            match self.resolve_once(&url).await {
                Ok(resolved) => return Some(resolved),
                Err(e) => warn!(url = %url, attempt, error = %e, "short link resolution failed"),
            }

            if attempt < attempts {
                sleep(self.config.retry_backoff).await;
            }
        }

        warn!(url = %url, attempts, "giving up on short link");
        None
    }

    /// Perform a single resolution attempt with redirects disabled
    async fn resolve_once(&self, url: &str) -> Result<String> {
        let response = self
            .no_redirect
            .get(url)
            .timeout(self.config.redirect_timeout)
            .send()
            .await?;

        let status = response.status();

        if status.is_redirection() {
            let location = response
                .headers()
                .get(header::LOCATION)
                .and_then(|value| value.to_str().ok())
                .ok_or_else(|| DuanjuError::MissingLocation(url.to_string()))?;
            info!(url, status = status.as_u16(), location, "found redirect");
            return Ok(location.to_string());
        }

        if status == StatusCode::OK {
            info!(url, "short link does not redirect, keeping it");
            return Ok(url.to_string());
        }

        Err(DuanjuError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        })
    }

    /// Politeness delay applied before every page fetch
    pub fn delay(&self) -> &PolitenessDelay {
        &self.delay
    }
}
