use crate::sink::handle::Sink;
use chrono::Utc;
use eyre::Result;
use feed::model::FeedEvent;
use store::activity::{adapter, store::Store as ActivityStore};
use store::client::Client;

/// Feed events, deduplicated by idempotency key. Each event's rows commit together.
pub struct EventSink {
    activities: ActivityStore,
}

impl EventSink {
    pub fn new(client: Client) -> Self {
        Self { activities: ActivityStore::new(client) }
    }

    async fn persist(&self, event: &FeedEvent) -> Result<bool> {
        let key = event.idempotency_key();
        if self.activities.activity_exists(&key).await? {
            tracing::debug!(%key, "Skip: event already recorded");
            return Ok(false);
        }

        let records = adapter::from(event, key, Utc::now())?;
        let recorded = self.activities.record(&records).await?;
        if recorded {
            tracing::debug!(
                key = %records.activity.id,
                kind = %records.activity.activity_type,
                token = %records.activity.token_id,
                "Recorded activity"
            );
        }
        Ok(recorded)
    }
}

#[async_trait::async_trait]
impl Sink for EventSink {
    type Item = FeedEvent;

    async fn process(&self, event: &FeedEvent) -> Result<()> {
        self.persist(event).await?;
        Ok(())
    }

    /// Stops at the first failure so the page is redelivered rather than half-acknowledged.
    async fn process_batch(&self, events: &[FeedEvent]) -> Result<usize> {
        let mut recorded = 0;
        for event in events {
            if self.persist(event).await? {
                recorded += 1;
            }
        }
        Ok(recorded)
    }
}
