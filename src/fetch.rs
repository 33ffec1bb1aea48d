//! Outbound document fetching.
//!
//! The flows only see the [`Fetch`] trait; production uses [`HttpFetcher`]
//! (a `reqwest` client with a fixed user agent and per-request timeout),
//! tests substitute an in-memory fixture.

use reqwest::Client;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

use crate::config::Config;
use crate::error::ExtractError;

/// Fetch a document body as text.
pub trait Fetch: Send + Sync {
    fn fetch_text(&self, url: &str) -> impl Future<Output = Result<String, ExtractError>> + Send;
}

/// Plain HTTP(S) GET, no caching.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, ExtractError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    pub fn from_config(config: &Config) -> Result<Self, ExtractError> {
        Self::new(&config.user_agent, config.request_timeout())
    }
}

impl Fetch for HttpFetcher {
    #[instrument(level = "info", skip(self))]
    async fn fetch_text(&self, url: &str) -> Result<String, ExtractError> {
        let t0 = Instant::now();
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Non-success response");
            return Err(ExtractError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched document"
        );
        Ok(body)
    }
}
