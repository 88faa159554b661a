#[cfg(test)]
mod tests {
    use eyre::Result;
    use feed::client::{DEFAULT_TIMEOUT, HttpFeed};
    use feed::model::{FeedEvent, PollResponse};
    use serde_json::json;

    #[test]
    fn test_idempotency_key_is_composed_without_unique_id() -> Result<()> {
        let event: FeedEvent = serde_json::from_value(json!({
            "type": "SALE",
            "eventData": { "tokenAddress": "0xabc", "tokenId": 7, "txHash": "0xdef" }
        }))?;

        assert_eq!(event.idempotency_key(), "SALE:0xabc:7:0xdef");
        Ok(())
    }

    #[test]
    fn test_idempotency_key_prefers_unique_id_and_tolerates_missing_parts() -> Result<()> {
        let unique: FeedEvent =
            serde_json::from_value(json!({ "type": "MINT", "uniqueId": "evt-42" }))?;
        assert_eq!(unique.idempotency_key(), "evt-42");

        let sparse: FeedEvent =
            serde_json::from_value(json!({ "type": "RENEW", "eventData": { "tokenId": "99" } }))?;
        assert_eq!(sparse.idempotency_key(), "RENEW::99:");
        Ok(())
    }

    #[test]
    fn test_poll_response_keeps_unknown_payload_fields() -> Result<()> {
        let response: PollResponse = serde_json::from_value(json!({
            "events": [{
                "id": 12,
                "type": "TRANSFER",
                "eventData": { "name": "example.ai", "price": "10" },
                "extra": true
            }],
            "lastId": 12,
            "hasMoreEvents": false
        }))?;

        assert_eq!(response.last_id, 12);
        let event = &response.events[0];
        assert_eq!(event.event_data.name().as_deref(), Some("example.ai"));
        assert_eq!(event.event_data.extra.get("price"), Some(&json!("10")));
        assert_eq!(serde_json::to_value(event)?["extra"], json!(true));
        Ok(())
    }

    #[test]
    fn test_numeric_chain_id_is_read_as_text() -> Result<()> {
        let response: PollResponse = serde_json::from_value(json!({
            "events": [{ "type": "SALE", "eventData": { "tokenId": 7, "chainId": 97476 } }],
            "lastId": 3,
            "hasMoreEvents": false
        }))?;

        let data = &response.events[0].event_data;
        assert_eq!(data.chain_id().as_deref(), Some("97476"));
        assert_eq!(data.network_id(), None);
        Ok(())
    }

    #[test]
    fn test_null_event_data_reads_as_empty() -> Result<()> {
        let response: PollResponse = serde_json::from_value(json!({
            "events": [
                { "type": "MINT", "eventData": null },
                { "type": "RENEW", "eventData": { "tokenId": "5" } }
            ],
            "lastId": 9,
            "hasMoreEvents": true
        }))?;

        assert_eq!(response.events.len(), 2);
        assert_eq!(response.events[0].event_data, Default::default());
        assert_eq!(response.events[0].idempotency_key(), "MINT:::");
        assert_eq!(response.events[1].idempotency_key(), "RENEW::5:");
        Ok(())
    }

    #[test]
    fn test_numeric_unique_id_is_the_key() -> Result<()> {
        let event: FeedEvent = serde_json::from_value(json!({
            "uniqueId": 42,
            "type": "TRANSFER",
            "eventData": { "txHash": null, "owner": "0xabc" }
        }))?;

        assert_eq!(event.idempotency_key(), "42");
        assert_eq!(event.event_data.tx_hash(), None);
        assert_eq!(event.event_data.owner().as_deref(), Some("0xabc"));
        Ok(())
    }

    #[test]
    fn test_poll_url() -> Result<()> {
        let feed = HttpFeed::new("https://api.example.org", "key", DEFAULT_TIMEOUT)?;
        assert_eq!(
            feed.poll_url(100, true)?.as_str(),
            "https://api.example.org/v1/poll?limit=100&finalizedOnly=true"
        );
        Ok(())
    }
}
