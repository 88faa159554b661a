mod common;

#[cfg(test)]
mod tests {
    use crate::common::{FakeFeed, memory_db};
    use engine::args::PollerArgs;
    use engine::checkpointer::Checkpointer;
    use engine::poller::Poller;
    use eyre::Result;
    use feed::model::PollResponse;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use store::activity::store::Store as ActivityStore;
    use store::token::store::get_token;

    fn sale_page(last_id: i64, has_more_events: bool) -> Result<PollResponse> {
        Ok(serde_json::from_value(json!({
            "events": [
                {
                    "id": 41,
                    "type": "SALE",
                    "eventData": {
                        "tokenAddress": "0xabc",
                        "tokenId": "7",
                        "txHash": "0xdef",
                        "owner": "0x3333333333333333333333333333333333333333"
                    }
                },
                {
                    "id": 42,
                    "uniqueId": "evt-42",
                    "type": "NAME_RENEWED",
                    "eventData": { "tokenId": "7", "name": "alpha.io" }
                }
            ],
            "lastId": last_id,
            "hasMoreEvents": has_more_events
        }))?)
    }

    #[tokio::test]
    async fn test_redelivered_page_records_each_event_once() -> Result<()> {
        let client = memory_db().await?;
        let feed = FakeFeed::serving(vec![sale_page(42, true)?, sale_page(42, false)?]);
        let poller = Poller::new(PollerArgs::default(), feed.clone(), client.clone());
        poller.checkpointer().ensure().await?;

        let first = poller.poll_once().await?;
        assert_eq!((first.received, first.recorded), (2, 2));

        let second = poller.poll_once().await?;
        assert_eq!((second.received, second.recorded), (2, 0));

        let activities = ActivityStore::new(client.clone());
        assert_eq!(activities.count_activities().await?, 2);
        assert!(activities.activity_exists("SALE:0xabc:7:0xdef").await?);
        assert!(activities.activity_exists("evt-42").await?);

        let token = get_token(client.pool(), "7").await?.expect("token");
        assert_eq!(token.owner, "0x3333333333333333333333333333333333333333");
        assert!(token.last_activity_at.is_some());

        assert_eq!(poller.checkpointer().last_id().await?, 42);
        assert_eq!(*feed.acks.lock(), vec![42, 42]);

        Ok(())
    }

    #[tokio::test]
    async fn test_tick_pauses_by_outcome() -> Result<()> {
        let client = memory_db().await?;
        let feed = Arc::new(FakeFeed::default());
        {
            let mut pages = feed.pages.lock();
            pages.push_back(Ok(sale_page(42, true)?));
            pages.push_back(Ok(sale_page(50, false)?));
            pages.push_back(Err("feed unavailable".to_string()));
        }
        let args = PollerArgs::default();
        let poller = Poller::new(args.clone(), feed.clone(), client);

        assert_eq!(poller.tick().await, Duration::ZERO);
        assert_eq!(poller.tick().await, args.idle_interval);
        assert_eq!(poller.tick().await, args.error_interval);
        // empty page
        assert_eq!(poller.tick().await, args.idle_interval);

        assert_eq!(poller.checkpointer().last_id().await?, 50);
        assert_eq!(*feed.acks.lock(), vec![42, 50]);

        Ok(())
    }

    #[tokio::test]
    async fn test_hung_feed_times_out_into_error_pause() -> Result<()> {
        let client = memory_db().await?;
        let feed = Arc::new(FakeFeed { hang: true, ..Default::default() });
        let args =
            PollerArgs { request_timeout: Duration::from_millis(50), ..PollerArgs::default() };
        let poller = Poller::new(args.clone(), feed.clone(), client);

        assert_eq!(poller.tick().await, Duration::from_secs(5));
        assert_eq!(poller.checkpointer().last_id().await?, 0);
        assert!(feed.acks.lock().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_cursor_never_moves_backwards_on_poll() -> Result<()> {
        let client = memory_db().await?;
        let feed = FakeFeed::serving(vec![sale_page(90, false)?, sale_page(60, false)?]);
        let poller = Poller::new(PollerArgs::default(), feed, client);

        poller.poll_once().await?;
        poller.poll_once().await?;

        assert_eq!(poller.checkpointer().last_id().await?, 90);

        Ok(())
    }

    #[tokio::test]
    async fn test_reset_moves_feed_and_cursor_together() -> Result<()> {
        let client = memory_db().await?;
        let checkpointer = Checkpointer::new(client.clone());
        checkpointer.ensure().await?;
        checkpointer.checkpoint(500).await?;

        let feed = Arc::new(FakeFeed::default());
        let poller = Poller::new(PollerArgs::default(), feed.clone(), client.clone());
        poller.reset_cursor(120).await?;

        assert_eq!(checkpointer.last_id().await?, 120);
        assert_eq!(*feed.resets.lock(), vec![120]);

        let rejecting = Arc::new(FakeFeed { reject_reset: true, ..Default::default() });
        let poller = Poller::new(PollerArgs::default(), rejecting, client);
        assert!(poller.reset_cursor(7).await.is_err());
        assert_eq!(checkpointer.last_id().await?, 120);

        Ok(())
    }
}
