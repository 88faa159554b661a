use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use alloy::primitives::BlockNumber;
use alloy::transports::{TransportError, TransportErrorKind};

use crate::block::ChainBlock;
use crate::breaker::CircuitBreaker;
use crate::error::is_timeout;
use crate::governor::ConcurrencyGovernor;
use crate::pool::EndpointPool;
use crate::rpc::ChainRpc;

pub const CIRCUIT_OPEN: &str = "circuit breaker open";

/// Single entry point for every chain call: slot, endpoint, call, bookkeeping, release.
/// While the breaker is open calls fail immediately without reaching an endpoint.
pub struct RpcGateway {
    pool: EndpointPool,
    governor: ConcurrencyGovernor,
    breaker: CircuitBreaker,
    timeouts: AtomicU64,
}

impl RpcGateway {
    pub fn new(pool: EndpointPool, governor: ConcurrencyGovernor, breaker: CircuitBreaker) -> Self {
        Self { pool, governor, breaker, timeouts: AtomicU64::new(0) }
    }

    pub async fn call<T, F, Fut>(&self, call: F) -> Result<T, TransportError>
    where
        F: FnOnce(Arc<dyn ChainRpc>) -> Fut,
        Fut: Future<Output = Result<T, TransportError>>,
    {
        if self.breaker.is_open() {
            return Err(TransportErrorKind::custom_str(CIRCUIT_OPEN));
        }
        let _slot = self.governor.acquire().await.map_err(TransportErrorKind::custom)?;
        // the breaker may have tripped while this call waited for a slot
        if self.breaker.is_open() {
            return Err(TransportErrorKind::custom_str(CIRCUIT_OPEN));
        }
        let endpoint = self.pool.select();

        match call(Arc::clone(&endpoint.client)).await {
            Ok(value) => {
                self.breaker.record(true);
                self.pool.mark_success(endpoint.index);
                Ok(value)
            }
            Err(e) => {
                self.breaker.record(false);
                self.pool.mark_failure(endpoint.index);
                if is_timeout(&e) {
                    self.timeouts.fetch_add(1, Ordering::SeqCst);
                }
                tracing::debug!("RPC call via {} failed: {e}", endpoint.url);
                Err(e)
            }
        }
    }

    pub async fn head(&self) -> Result<BlockNumber, TransportError> {
        self.call(|client| async move { client.get_head().await }).await
    }

    pub async fn block(
        &self,
        number: BlockNumber,
        include_transactions: bool,
    ) -> Result<ChainBlock, TransportError> {
        self.call(|client| async move { client.get_block(number, include_transactions).await })
            .await
    }

    /// Timeout-classified failures since the previous call.
    pub fn take_timeouts(&self) -> u64 {
        self.timeouts.swap(0, Ordering::SeqCst)
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    pub fn governor(&self) -> &ConcurrencyGovernor {
        &self.governor
    }

    pub fn pool(&self) -> &EndpointPool {
        &self.pool
    }

    pub fn endpoint_count(&self) -> usize {
        self.pool.len()
    }

    pub fn in_flight(&self) -> usize {
        self.governor.in_flight()
    }
}
