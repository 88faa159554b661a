use crate::args::TailerArgs;
use crate::catchup::CatchUp;
use crate::metrics::{Phase, TailerMetrics};
use crate::retry::RetryQueue;
use crate::sink::block::BlockSink;
use crate::sink::handle::Sink;
use crate::throttle::{Adjustment, Throttle, adaptive_interval, dynamic_concurrency};
use chain::gateway::RpcGateway;
use eyre::Result;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use store::block::store::Store as BlockStore;
use store::client::Client;

/// Below this many pending blocks the tailer indexes one block at a time.
pub const CATCHUP_LAG_THRESHOLD: u64 = 50;
pub const CIRCUIT_OPEN_WAIT: Duration = Duration::from_secs(1);
pub const MIN_ERROR_BACKOFF: Duration = Duration::from_secs(3);

struct TailerState {
    throttle: Throttle,
    phase: Phase,
    lag: u64,
    effective_concurrency: usize,
    interval: Duration,
}

/// Follows the chain head: drains retries, catches up or indexes sequentially, adapts its own
/// concurrency ceiling and sleep interval to the observed lag and timeouts.
pub struct Tailer {
    args: TailerArgs,
    gateway: Arc<RpcGateway>,
    blocks: BlockStore,
    sink: Arc<BlockSink>,
    retries: Arc<RetryQueue>,
    catchup: CatchUp,
    state: Mutex<TailerState>,
}

impl Tailer {
    pub fn new(
        args: TailerArgs,
        gateway: Arc<RpcGateway>,
        client: Client,
        retries: Arc<RetryQueue>,
    ) -> Self {
        let args = args.clamped();
        let sink = Arc::new(BlockSink::new(client.clone()));
        let catchup = CatchUp::new(
            Arc::clone(&gateway),
            Arc::clone(&sink),
            Arc::clone(&retries),
            args.catchup_batch,
            args.slice_parallelism,
            args.slice_jitter,
        );
        let state = TailerState {
            throttle: Throttle::new(args.max_dynamic_concurrency),
            phase: Phase::default(),
            lag: 0,
            effective_concurrency: args.catchup_concurrency,
            interval: args.base_interval,
        };

        Self {
            args,
            gateway,
            blocks: BlockStore::new(client),
            sink,
            retries,
            catchup,
            state: Mutex::new(state),
        }
    }

    /// Runs one iteration and returns how long to pause before the next one.
    /// Errors never escape: they are logged and turned into a backoff.
    pub async fn tick(&self) -> Duration {
        match self.iterate().await {
            Ok(pause) => {
                tracing::debug!(metrics = ?self.metrics(), "Tailer iteration done");
                pause
            }
            Err(e) => {
                tracing::error!("Tailer iteration failed: {e:?}");
                MIN_ERROR_BACKOFF.max(self.args.base_interval)
            }
        }
    }

    async fn iterate(&self) -> Result<Duration> {
        let breaker = self.gateway.breaker();
        if !breaker.try_close() {
            self.set_phase(Phase::ClosedWait);
            return Ok(CIRCUIT_OPEN_WAIT);
        }

        let remote = self.gateway.head().await?;
        let local = self.blocks.get_latest_block_number().await?;

        let (next, lag) = match local {
            Some(local) => {
                let local = local.max(0) as u64;
                (local + 1, remote.saturating_sub(local))
            }
            None => {
                let backfill = self.args.backfill_blocks;
                (remote.saturating_sub(backfill), backfill.min(remote))
            }
        };

        let runtime_max = self.state.lock().throttle.runtime_max();
        let concurrency = dynamic_concurrency(lag, self.args.catchup_concurrency, runtime_max);

        self.set_phase(Phase::DrainRetry);
        self.drain_retries(concurrency).await;

        if next <= remote {
            if lag > CATCHUP_LAG_THRESHOLD && concurrency > 1 {
                self.set_phase(Phase::CatchUp);
                self.catchup.run(next, remote, concurrency).await;
            } else {
                self.set_phase(Phase::SequentialIndex);
                self.index_sequential(next, remote).await;
            }
        }

        self.set_phase(Phase::ThrottleAdjust);
        let timeouts = self.gateway.take_timeouts();
        let adjustment = self.state.lock().throttle.adjust(timeouts);
        match adjustment {
            Adjustment::Shrunk { from, to } => {
                tracing::warn!(timeouts, "Throttling catch-up concurrency {from} -> {to}")
            }
            Adjustment::Grown { from, to } => {
                tracing::info!("Raising catch-up concurrency {from} -> {to}")
            }
            Adjustment::Unchanged => {}
        }

        let interval = adaptive_interval(lag, self.args.base_interval);
        {
            let mut state = self.state.lock();
            state.phase = Phase::Sleep;
            state.lag = lag;
            state.effective_concurrency = concurrency;
            state.interval = interval;
        }

        Ok(interval)
    }

    /// Retries up to one batch of previously failed blocks.
    async fn drain_retries(&self, concurrency: usize) {
        let pending = self.retries.drain(self.args.catchup_batch);
        match pending.as_slice() {
            [] => {}
            [number] => {
                if let Err(e) = self.index_block(*number).await {
                    tracing::warn!(block = number, "Retry failed: {e}");
                    self.retries.enqueue(*number);
                }
            }
            numbers => {
                tracing::info!("Draining {} queued retries", numbers.len());
                let outcome = self.catchup.process_numbers(numbers, concurrency).await;
                if !outcome.skipped.is_empty() {
                    self.retries.requeue(&outcome.skipped);
                }
            }
        }
    }

    /// Indexes `[start, end]` in order, stopping at the first failure.
    async fn index_sequential(&self, start: u64, end: u64) {
        for number in start..=end {
            if let Err(e) = self.index_block(number).await {
                let attempt = self.retries.enqueue(number);
                tracing::warn!(block = number, ?attempt, "Indexing failed, will retry: {e}");
                break;
            }
        }
    }

    pub async fn index_block(&self, number: u64) -> Result<()> {
        let block = self.gateway.block(number, true).await?;
        self.sink.process(&block).await?;
        self.retries.resolve(&[number]);
        Ok(())
    }

    fn set_phase(&self, phase: Phase) {
        self.state.lock().phase = phase;
    }

    pub fn retries(&self) -> &RetryQueue {
        &self.retries
    }

    pub fn metrics(&self) -> TailerMetrics {
        let state = self.state.lock();
        let breaker = self.gateway.breaker().stats();
        TailerMetrics {
            lag: state.lag,
            effective_concurrency: state.effective_concurrency,
            adaptive_interval_ms: state.interval.as_millis() as u64,
            retry_queue_size: self.retries.len(),
            circuit_open: breaker.open,
            window_size: breaker.window,
            errors_in_window: breaker.errors,
            error_rate_pct: breaker.error_rate,
            configured_max_dynamic_concurrency: state.throttle.configured_max(),
            runtime_max_dynamic_concurrency: state.throttle.runtime_max(),
            rpc_timeout_ms: self.args.rpc_timeout.as_millis() as u64,
            endpoint_count: self.gateway.endpoint_count(),
            global_concurrency: self.gateway.governor().capacity(),
            in_flight: self.gateway.in_flight(),
            phase: state.phase,
        }
    }
}
