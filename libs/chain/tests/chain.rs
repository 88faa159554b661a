#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use alloy::primitives::BlockNumber;
    use alloy::transports::{TransportError, TransportErrorKind};
    use chain::block::ChainBlock;
    use chain::breaker::{BreakerConfig, CircuitBreaker};
    use chain::error::is_timeout;
    use chain::gateway::{CIRCUIT_OPEN, RpcGateway};
    use chain::governor::ConcurrencyGovernor;
    use chain::pool::EndpointPool;
    use chain::rpc::ChainRpc;
    use eyre::Result;
    use futures_util::future::join_all;

    #[derive(Default)]
    struct FakeRpc {
        failure: Option<&'static str>,
        delay: Duration,
        calls: AtomicUsize,
        running: AtomicUsize,
        peak: AtomicUsize,
    }

    impl FakeRpc {
        fn failing(message: &'static str) -> Self {
            Self { failure: Some(message), ..Default::default() }
        }

        fn slow(delay: Duration) -> Self {
            Self { delay, ..Default::default() }
        }
    }

    #[async_trait::async_trait]
    impl ChainRpc for FakeRpc {
        async fn get_head(&self) -> Result<BlockNumber, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let running = self.running.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(running, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.running.fetch_sub(1, Ordering::SeqCst);
            match self.failure {
                Some(message) => Err(TransportErrorKind::custom_str(message)),
                None => Ok(100),
            }
        }

        async fn get_block(&self, number: BlockNumber, _: bool) -> Result<ChainBlock, TransportError> {
            Err(TransportErrorKind::custom_str(&format!("block {number} not found")))
        }
    }

    fn pool_of(clients: Vec<Arc<FakeRpc>>) -> Result<EndpointPool> {
        EndpointPool::new(
            clients
                .into_iter()
                .enumerate()
                .map(|(i, c)| (format!("http://node-{i}"), c as Arc<dyn ChainRpc>))
                .collect(),
        )
    }

    #[test]
    fn test_empty_pool_is_rejected() {
        assert!(EndpointPool::new(Vec::new()).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_round_robin_skips_cooling_endpoint_for_exactly_the_cooldown() -> Result<()> {
        let pool = pool_of(vec![Arc::new(FakeRpc::default()), Arc::new(FakeRpc::default())])?;

        assert_eq!(pool.select().index, 0);
        assert_eq!(pool.select().index, 1);
        assert_eq!(pool.select().index, 0);

        assert!(!pool.mark_failure(0));
        assert!(!pool.mark_failure(0));
        assert!(pool.mark_failure(0));
        assert_eq!(pool.health(0).map(|h| h.consecutive_failures), Some(0));

        for _ in 0..4 {
            assert_eq!(pool.select().index, 1);
        }

        tokio::time::advance(Duration::from_millis(9_999)).await;
        assert_eq!(pool.select().index, 1);

        tokio::time::advance(Duration::from_millis(1)).await;
        let picked: Vec<usize> = (0..2).map(|_| pool.select().index).collect();
        assert!(picked.contains(&0));

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_cooling_still_selects_and_success_clears_cooldown() -> Result<()> {
        let pool = pool_of(vec![Arc::new(FakeRpc::default())])?;
        for _ in 0..3 {
            pool.mark_failure(0);
        }
        assert!(pool.health(0).is_some_and(|h| h.cooldown_until.is_some()));
        assert_eq!(pool.select().index, 0);

        pool.mark_success(0);
        assert!(pool.health(0).is_some_and(|h| h.cooldown_until.is_none()));
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_breaker_waits_for_full_window_then_trips() {
        let breaker = CircuitBreaker::default();

        for _ in 0..50 {
            assert!(!breaker.record(false));
        }
        assert!(!breaker.is_open());

        let breaker = CircuitBreaker::default();
        for _ in 0..89 {
            breaker.record(true);
        }
        for _ in 0..10 {
            breaker.record(false);
        }
        // 10 errors out of 100 is not above the 10% threshold.
        breaker.record(true);
        assert!(!breaker.is_open());

        assert!(breaker.record(false));
        assert!(breaker.is_open());
        assert_eq!(breaker.stats().errors, 11);
    }

    #[tokio::test(start_paused = true)]
    async fn test_breaker_stays_open_until_cooldown_elapses() {
        let breaker = CircuitBreaker::new(BreakerConfig {
            window_size: 10,
            error_threshold: 0.10,
            cooldown: Duration::from_secs(15),
        });
        for _ in 0..10 {
            breaker.record(false);
        }
        assert!(breaker.is_open());

        for _ in 0..10 {
            breaker.record(true);
        }
        tokio::time::advance(Duration::from_secs(15)).await;
        assert!(!breaker.try_close());
        assert!(breaker.is_open());

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(breaker.try_close());
        assert!(!breaker.is_open());
    }

    #[tokio::test(start_paused = true)]
    async fn test_governor_bounds_concurrent_calls() -> Result<()> {
        let client = Arc::new(FakeRpc::slow(Duration::from_millis(20)));
        let gateway = Arc::new(RpcGateway::new(
            pool_of(vec![Arc::clone(&client)])?,
            ConcurrencyGovernor::new(4),
            CircuitBreaker::default(),
        ));

        let calls = (0..32).map(|_| {
            let gateway = Arc::clone(&gateway);
            tokio::spawn(async move { gateway.head().await })
        });
        for result in join_all(calls).await {
            assert_eq!(result??, 100);
        }

        assert_eq!(client.calls.load(Ordering::SeqCst), 32);
        assert!(client.peak.load(Ordering::SeqCst) <= 4);
        assert_eq!(gateway.governor().in_flight(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_gateway_records_failures_and_counts_timeouts() -> Result<()> {
        let gateway = RpcGateway::new(
            pool_of(vec![
                Arc::new(FakeRpc::failing("request timed out")),
                Arc::new(FakeRpc::failing("connection refused")),
            ])?,
            ConcurrencyGovernor::new(8),
            CircuitBreaker::default(),
        );

        for _ in 0..4 {
            assert!(gateway.head().await.is_err());
        }

        assert_eq!(gateway.take_timeouts(), 2);
        assert_eq!(gateway.take_timeouts(), 0);
        let stats = gateway.breaker().stats();
        assert_eq!((stats.window, stats.errors), (4, 4));
        assert_eq!(gateway.pool().health(0).map(|h| h.consecutive_failures), Some(2));
        Ok(())
    }

    #[tokio::test]
    async fn test_open_breaker_short_circuits_calls() -> Result<()> {
        let client = Arc::new(FakeRpc::default());
        let gateway = RpcGateway::new(
            pool_of(vec![Arc::clone(&client)])?,
            ConcurrencyGovernor::new(8),
            CircuitBreaker::new(BreakerConfig {
                window_size: 4,
                error_threshold: 0.10,
                cooldown: Duration::from_secs(60),
            }),
        );
        for _ in 0..4 {
            gateway.breaker().record(false);
        }
        assert!(gateway.breaker().is_open());

        for _ in 0..50 {
            let err = gateway.head().await.err().map(|e| e.to_string()).unwrap_or_default();
            assert!(err.contains(CIRCUIT_OPEN));
        }

        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
        assert_eq!(gateway.breaker().stats().window, 4);
        assert_eq!(gateway.pool().health(0).map(|h| h.consecutive_failures), Some(0));
        assert_eq!(gateway.governor().in_flight(), 0);
        Ok(())
    }

    #[test]
    fn test_timeout_classification() {
        assert!(is_timeout(&TransportErrorKind::custom_str("The request took too long to respond")));
        assert!(is_timeout(&TransportErrorKind::custom_str("operation timed out")));
        assert!(!is_timeout(&TransportErrorKind::custom_str("connection reset by peer")));
    }
}
