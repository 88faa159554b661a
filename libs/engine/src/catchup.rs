use crate::retry::RetryQueue;
use crate::sink::block::BlockSink;
use crate::sink::handle::Sink;
use chain::block::ChainBlock;
use chain::gateway::RpcGateway;
use eyre::Result;
use futures_util::future::join_all;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

const PROGRESS_EVERY: u64 = 1_000;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SliceOutcome {
    pub fetched: usize,
    pub failed: usize,
    /// Blocks never attempted because the circuit opened first.
    pub skipped: Vec<u64>,
}

/// Bulk backfill of block ranges.
///
/// A range is walked in batches; each batch is cut into slices of `concurrency` blocks and up
/// to `slice_parallelism` slices run at once. Every fetch still goes through the gateway, so the
/// global concurrency cap applies on top.
pub struct CatchUp {
    gateway: Arc<RpcGateway>,
    sink: Arc<BlockSink>,
    retries: Arc<RetryQueue>,
    batch_size: usize,
    slice_parallelism: usize,
    jitter: Duration,
}

impl CatchUp {
    pub fn new(
        gateway: Arc<RpcGateway>,
        sink: Arc<BlockSink>,
        retries: Arc<RetryQueue>,
        batch_size: usize,
        slice_parallelism: usize,
        jitter: Duration,
    ) -> Self {
        Self {
            gateway,
            sink,
            retries,
            batch_size: batch_size.max(1),
            slice_parallelism: slice_parallelism.max(1),
            jitter,
        }
    }

    /// Indexes `[start, end]`. Slice failures are logged and left to the retry queue.
    pub async fn run(&self, start: u64, end: u64, concurrency: usize) {
        if start > end {
            return;
        }
        let total = end - start + 1;
        let mut processed: u64 = 0;

        tracing::info!(start, end, total, concurrency, "Catch-up started");

        let mut batch_start = start;
        while batch_start <= end {
            if self.gateway.breaker().is_open() {
                tracing::warn!(
                    "Circuit open; stopping catch-up at block {batch_start} ({processed}/{total} done)"
                );
                return;
            }
            let batch_end = batch_start.saturating_add(self.batch_size as u64 - 1).min(end);
            let numbers: Vec<u64> = (batch_start..=batch_end).collect();

            let outcome = self.process_numbers(&numbers, concurrency).await;

            let before = processed;
            processed += (numbers.len() - outcome.skipped.len()) as u64;
            if processed / PROGRESS_EVERY > before / PROGRESS_EVERY || processed == total {
                let pct = processed as f64 / total as f64 * 100.0;
                tracing::info!(
                    "Catch-up progress: {processed}/{total} ({pct:.1}%), last batch {} fetched, {} failed",
                    outcome.fetched,
                    outcome.failed
                );
            }

            batch_start = batch_end + 1;
        }
    }

    /// Fetches and persists an arbitrary set of blocks, sliced like a catch-up batch.
    /// Slice groups not yet started when the circuit opens are skipped.
    pub async fn process_numbers(&self, numbers: &[u64], concurrency: usize) -> SliceOutcome {
        let slices: Vec<&[u64]> = numbers.chunks(concurrency.max(1)).collect();
        let mut total = SliceOutcome::default();

        for (i, group) in slices.chunks(self.slice_parallelism).enumerate() {
            if self.gateway.breaker().is_open() {
                let started = i * self.slice_parallelism * concurrency.max(1);
                total.skipped = numbers[started.min(numbers.len())..].to_vec();
                break;
            }
            let outcomes = join_all(group.iter().map(|slice| self.process_slice(slice))).await;
            for outcome in outcomes {
                match outcome {
                    Ok(outcome) => {
                        total.fetched += outcome.fetched;
                        total.failed += outcome.failed;
                    }
                    Err(e) => tracing::error!("Catch-up slice failed: {e:?}"),
                }
            }
        }

        total
    }

    /// Fetches every block of the slice in parallel and persists the ones that arrived.
    /// A failed fetch is queued for retry and does not affect the rest of the slice.
    pub async fn process_slice(&self, numbers: &[u64]) -> Result<SliceOutcome> {
        if numbers.is_empty() {
            return Ok(SliceOutcome::default());
        }

        let max_jitter = self.jitter.as_millis() as u64;
        if max_jitter > 0 {
            let delay = rand::rng().random_range(0..=max_jitter);
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        let fetches = numbers.iter().map(|&number| async move {
            (number, self.gateway.block(number, true).await)
        });

        let mut blocks: Vec<ChainBlock> = Vec::with_capacity(numbers.len());
        let mut failed = 0;
        for (number, result) in join_all(fetches).await {
            match result {
                Ok(block) => blocks.push(block),
                Err(e) => {
                    failed += 1;
                    let attempt = self.retries.enqueue(number);
                    tracing::warn!(block = number, ?attempt, "Block fetch failed: {e}");
                }
            }
        }

        self.sink.process_batch(&blocks).await?;

        let fetched: Vec<u64> = blocks.iter().map(|block| block.number).collect();
        self.retries.resolve(&fetched);

        Ok(SliceOutcome { fetched: fetched.len(), failed, skipped: Vec::new() })
    }
}
