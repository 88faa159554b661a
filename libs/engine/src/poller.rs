use crate::args::PollerArgs;
use crate::checkpointer::Checkpointer;
use crate::sink::event::EventSink;
use crate::sink::handle::Sink;
use eyre::Result;
use feed::client::Feed;
use std::sync::Arc;
use std::time::Duration;
use store::client::Client;
use tokio::time::timeout;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollOutcome {
    pub received: usize,
    pub recorded: usize,
    pub has_more: bool,
}

/// Pulls the external event feed, records new events and acknowledges them.
///
/// The cursor only moves after a page is fully persisted, and the ack is sent after the
/// cursor, so a crash anywhere in between leads to redelivery, which the sink ignores.
pub struct Poller {
    args: PollerArgs,
    feed: Arc<dyn Feed>,
    sink: EventSink,
    checkpointer: Checkpointer,
}

impl Poller {
    pub fn new(args: PollerArgs, feed: Arc<dyn Feed>, client: Client) -> Self {
        Self {
            args,
            feed,
            sink: EventSink::new(client.clone()),
            checkpointer: Checkpointer::new(client),
        }
    }

    /// Runs one poll and returns how long to pause before the next one.
    pub async fn tick(&self) -> Duration {
        match self.poll_once().await {
            Ok(outcome) if outcome.received > 0 && outcome.has_more => Duration::ZERO,
            Ok(_) => self.args.idle_interval,
            Err(e) => {
                tracing::error!("Event poll failed: {e:?}");
                self.args.error_interval
            }
        }
    }

    pub async fn poll_once(&self) -> Result<PollOutcome> {
        let request_timeout = self.args.request_timeout;
        let page =
            timeout(request_timeout, self.feed.poll(self.args.limit, self.args.finalized_only))
                .await??;
        let received = page.events.len();
        if received == 0 {
            return Ok(PollOutcome { received, recorded: 0, has_more: page.has_more_events });
        }

        let recorded = self.sink.process_batch(&page.events).await?;

        self.checkpointer.checkpoint(page.last_id).await?;
        timeout(request_timeout, self.feed.ack(page.last_id)).await??;

        tracing::info!(
            received,
            recorded,
            last_id = page.last_id,
            has_more = page.has_more_events,
            "Processed event page"
        );

        Ok(PollOutcome { received, recorded, has_more: page.has_more_events })
    }

    pub async fn reset_cursor(&self, event_id: i64) -> Result<()> {
        self.checkpointer.reset(self.feed.as_ref(), event_id).await
    }

    pub fn checkpointer(&self) -> &Checkpointer {
        &self.checkpointer
    }
}
