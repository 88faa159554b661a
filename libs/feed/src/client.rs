use std::time::Duration;

use eyre::Result;
use reqwest::{Client, Url};

use crate::model::PollResponse;

pub const DEFAULT_BASE_URL: &str = "https://api-testnet.doma.xyz";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Pull-based notification feed with server-side acknowledgement.
#[async_trait::async_trait]
pub trait Feed: Send + Sync {
    async fn poll(&self, limit: usize, finalized_only: bool) -> Result<PollResponse>;

    /// Marks every event up to `last_id` as consumed.
    async fn ack(&self, last_id: i64) -> Result<()>;

    async fn reset(&self, event_id: i64) -> Result<()>;
}

#[derive(Clone)]
pub struct HttpFeed {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl HttpFeed {
    /// `timeout` bounds each request end to end.
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: Url::parse(base_url)?,
            api_key: api_key.to_string(),
        })
    }

    pub fn poll_url(&self, limit: usize, finalized_only: bool) -> Result<Url> {
        let mut url = self.base_url.join("/v1/poll")?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("finalizedOnly", &finalized_only.to_string());
        Ok(url)
    }

    async fn post(&self, path: &str) -> Result<()> {
        let url = self.base_url.join(path)?;
        self.client
            .post(url)
            .header("Api-Key", &self.api_key)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Feed for HttpFeed {
    async fn poll(&self, limit: usize, finalized_only: bool) -> Result<PollResponse> {
        let response = self
            .client
            .get(self.poll_url(limit, finalized_only)?)
            .header("Api-Key", &self.api_key)
            .send()
            .await?
            .error_for_status()?
            .json::<PollResponse>()
            .await?;
        tracing::debug!(
            "Polled {} event(s), lastId={}, hasMoreEvents={}",
            response.events.len(),
            response.last_id,
            response.has_more_events
        );
        Ok(response)
    }

    async fn ack(&self, last_id: i64) -> Result<()> {
        self.post(&format!("/v1/poll/ack/{last_id}")).await
    }

    async fn reset(&self, event_id: i64) -> Result<()> {
        self.post(&format!("/v1/poll/reset/{event_id}")).await
    }
}
