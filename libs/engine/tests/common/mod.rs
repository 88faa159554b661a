#![allow(dead_code)]

use alloy::primitives::BlockNumber;
use alloy::transports::{TransportError, TransportErrorKind};
use chain::block::{ChainBlock, ChainTransaction};
use chain::breaker::{BreakerConfig, CircuitBreaker};
use chain::gateway::RpcGateway;
use chain::governor::ConcurrencyGovernor;
use chain::pool::EndpointPool;
use chain::rpc::ChainRpc;
use eyre::{Result, eyre};
use feed::client::Feed;
use feed::model::PollResponse;
use parking_lot::Mutex;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use store::client::Client;

pub fn hash(n: u64) -> String {
    format!("0x{n:064x}")
}

pub fn chain_block(number: u64) -> ChainBlock {
    let transactions = vec![ChainTransaction {
        hash: hash((number << 16) | 1),
        from: "0x1111111111111111111111111111111111111111".to_string(),
        to: Some("0x2222222222222222222222222222222222222222".to_string()),
        value: "1000".to_string(),
        input: "0xa9059cbb000000000000000000000000".to_string(),
    }];
    ChainBlock {
        number,
        hash: hash(number),
        parent_hash: hash(number.saturating_sub(1)),
        timestamp: 1_700_000_000 + number,
        tx_count: transactions.len(),
        transactions,
    }
}

/// In-memory chain whose head and per-block failures are set by the test.
#[derive(Default)]
pub struct FakeChain {
    pub head: AtomicU64,
    pub failing: Mutex<HashSet<u64>>,
    pub timing_out: Mutex<HashSet<u64>>,
    pub head_calls: AtomicUsize,
    pub block_calls: AtomicUsize,
    /// Time each block fetch takes, in milliseconds.
    pub latency_ms: AtomicU64,
    pub running: AtomicUsize,
    pub peak_running: AtomicUsize,
}

impl FakeChain {
    pub fn at(head: u64) -> Arc<Self> {
        Arc::new(Self { head: AtomicU64::new(head), ..Default::default() })
    }

    pub fn fail(&self, numbers: impl IntoIterator<Item = u64>) {
        self.failing.lock().extend(numbers);
    }

    pub fn time_out(&self, numbers: impl IntoIterator<Item = u64>) {
        self.timing_out.lock().extend(numbers);
    }

    pub fn heal(&self) {
        self.failing.lock().clear();
        self.timing_out.lock().clear();
    }
}

#[async_trait::async_trait]
impl ChainRpc for FakeChain {
    async fn get_head(&self) -> Result<BlockNumber, TransportError> {
        self.head_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.head.load(Ordering::SeqCst))
    }

    async fn get_block(
        &self,
        number: BlockNumber,
        _include_transactions: bool,
    ) -> Result<ChainBlock, TransportError> {
        self.block_calls.fetch_add(1, Ordering::SeqCst);
        let running = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_running.fetch_max(running, Ordering::SeqCst);
        let latency = self.latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(latency)).await;
        }
        self.running.fetch_sub(1, Ordering::SeqCst);

        if self.timing_out.lock().contains(&number) {
            return Err(TransportErrorKind::custom_str("request timed out"));
        }
        if self.failing.lock().contains(&number) {
            return Err(TransportErrorKind::custom_str(&format!("block {number} unavailable")));
        }
        Ok(chain_block(number))
    }
}

pub fn gateway_with(chain: Arc<FakeChain>, breaker: BreakerConfig) -> Result<Arc<RpcGateway>> {
    let pool = EndpointPool::new(vec![("http://fake-node".to_string(), chain as Arc<dyn ChainRpc>)])?;
    Ok(Arc::new(RpcGateway::new(pool, ConcurrencyGovernor::new(16), CircuitBreaker::new(breaker))))
}

pub fn gateway(chain: Arc<FakeChain>) -> Result<Arc<RpcGateway>> {
    gateway_with(chain, BreakerConfig::default())
}

pub async fn memory_db() -> Result<Client> {
    Client::init("sqlite::memory:").await
}

/// Feed serving scripted pages and recording what it was told.
#[derive(Default)]
pub struct FakeFeed {
    pub pages: Mutex<VecDeque<Result<PollResponse, String>>>,
    pub acks: Mutex<Vec<i64>>,
    pub resets: Mutex<Vec<i64>>,
    pub reject_reset: bool,
    /// Polls never answer.
    pub hang: bool,
}

impl FakeFeed {
    pub fn serving(pages: Vec<PollResponse>) -> Arc<Self> {
        Arc::new(Self { pages: Mutex::new(pages.into_iter().map(Ok).collect()), ..Default::default() })
    }
}

#[async_trait::async_trait]
impl Feed for FakeFeed {
    async fn poll(&self, _limit: usize, _finalized_only: bool) -> Result<PollResponse> {
        if self.hang {
            std::future::pending::<()>().await;
        }
        match self.pages.lock().pop_front() {
            Some(Ok(page)) => Ok(page),
            Some(Err(message)) => Err(eyre!(message)),
            None => Ok(PollResponse::default()),
        }
    }

    async fn ack(&self, last_id: i64) -> Result<()> {
        self.acks.lock().push(last_id);
        Ok(())
    }

    async fn reset(&self, event_id: i64) -> Result<()> {
        if self.reject_reset {
            return Err(eyre!("reset rejected"));
        }
        self.resets.lock().push(event_id);
        Ok(())
    }
}
