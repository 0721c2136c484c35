//! Rate-limited fetch layer.
//!
//! [`Fetcher`] gates every network retrieval behind a shared permit pool
//! (`tokio::sync::Semaphore`) so that at most `max_concurrent` fetches are
//! in flight across the whole harvest run, and charges a fixed post-fetch
//! delay while the permit is still held to bound the request rate against
//! a single target.
//!
//! The actual HTTP work lives behind the [`Transport`] trait so tests can
//! substitute deterministic transports.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::time::{sleep, timeout};
use tracing::{error, info};
use url::Url;

/// Default cap on simultaneous in-flight fetches.
pub const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Default delay charged after each successful fetch.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(500);

/// Default total timeout for one fetch.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// Transport Collaborator
// ============================================================================

/// Failure inside the transport collaborator (connection, TLS, body read).
#[derive(Error, Debug)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

/// Network retrieval boundary used exclusively by the [`Fetcher`].
///
/// One operation: retrieve a URL within a deadline, yielding the HTTP
/// status and the response body.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Retrieves `url`, returning `(status, body)` or a transport failure.
    async fn retrieve(&self, url: &Url, deadline: Duration)
        -> Result<(u16, String), TransportError>;
}

/// Production [`Transport`] backed by a pooled `reqwest` client.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Builds the underlying HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the client cannot be constructed
    /// (e.g. TLS backend initialization failure).
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("book-harvester/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn retrieve(
        &self,
        url: &Url,
        deadline: Duration,
    ) -> Result<(u16, String), TransportError> {
        let response = self
            .client
            .get(url.clone())
            .timeout(deadline)
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok((status, body))
    }
}

// ============================================================================
// Fetch Errors
// ============================================================================

/// Failure of one fetch attempt.
///
/// None of these are fatal to a harvest run: callers degrade every variant
/// to "no content" for the one task that hit it.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Response arrived with a non-success status.
    #[error("request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    /// The transport collaborator failed outright.
    #[error("transport failure for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: TransportError,
    },

    /// The fetch exceeded the total timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },
}

// ============================================================================
// Rate-Limited Fetcher
// ============================================================================

/// Concurrency-bounded, rate-limited page fetcher.
///
/// Shared across all harvest tasks; the permit pool is the only shared
/// mutable resource in the system. A permit is held for the duration of
/// the network call plus the post-fetch delay and is released on every
/// exit path via the RAII permit guard.
pub struct Fetcher {
    transport: Arc<dyn Transport>,
    permits: Arc<Semaphore>,
    request_delay: Duration,
    request_timeout: Duration,
}

impl Fetcher {
    /// Creates a fetcher with the default tunables
    /// ([`DEFAULT_MAX_CONCURRENT`], [`DEFAULT_REQUEST_DELAY`],
    /// [`DEFAULT_REQUEST_TIMEOUT`]).
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            permits: Arc::new(Semaphore::new(DEFAULT_MAX_CONCURRENT)),
            request_delay: DEFAULT_REQUEST_DELAY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Sets the cap on simultaneous in-flight fetches.
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.permits = Arc::new(Semaphore::new(max_concurrent));
        self
    }

    /// Sets the delay charged after each successful fetch.
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    /// Sets the total timeout for one fetch.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Fetches one absolute URL, returning the response body.
    ///
    /// Blocks until a permit is available, then performs the retrieval
    /// under the total timeout. On success the post-fetch delay is slept
    /// while the permit is still held.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] for a non-success status, a transport
    /// failure, or a timeout. Each failure is logged here with its URL;
    /// callers treat all of them as "no content" for the task.
    pub async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| FetchError::Transport {
                url: url.to_string(),
                source: TransportError::new("fetch permit pool closed"),
            })?;

        info!(%url, "fetching");

        let retrieved = timeout(
            self.request_timeout,
            self.transport.retrieve(url, self.request_timeout),
        )
        .await;

        let (status, body) = match retrieved {
            Err(_) => {
                let err = FetchError::Timeout {
                    url: url.to_string(),
                    timeout_secs: self.request_timeout.as_secs(),
                };
                error!(%url, error = %err, "fetch failed");
                return Err(err);
            }
            Ok(Err(source)) => {
                let err = FetchError::Transport {
                    url: url.to_string(),
                    source,
                };
                error!(%url, error = %err, "fetch failed");
                return Err(err);
            }
            Ok(Ok(pair)) => pair,
        };

        if !(200..300).contains(&status) {
            let err = FetchError::Status {
                url: url.to_string(),
                status,
            };
            error!(%url, status, "fetch failed");
            return Err(err);
        }

        // Rate limiting: charged per completed fetch, inside the permit.
        sleep(self.request_delay).await;

        Ok(body)
    }
}

// ============================================================================
// Tests
// ============================================================================
