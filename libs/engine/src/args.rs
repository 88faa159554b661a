use std::time::Duration;

/// Knobs of the chain tailer and its catch-up processor.
#[derive(Debug, Clone)]
pub struct TailerArgs {
    /// Floor for the idle sleep and the error backoff.
    pub base_interval: Duration,
    /// How far behind the remote head to start on an empty database.
    pub backfill_blocks: u64,
    pub catchup_concurrency: usize,
    pub catchup_batch: usize,
    pub max_dynamic_concurrency: usize,
    pub slice_parallelism: usize,
    /// Upper bound of the random delay before each slice; zero disables it.
    pub slice_jitter: Duration,
    /// Reported in metrics only; enforced by the node clients.
    pub rpc_timeout: Duration,
}

impl Default for TailerArgs {
    fn default() -> Self {
        Self {
            base_interval: Duration::from_millis(2_000),
            backfill_blocks: 50,
            catchup_concurrency: 5,
            catchup_batch: 200,
            max_dynamic_concurrency: 60,
            slice_parallelism: 4,
            slice_jitter: Duration::ZERO,
            rpc_timeout: Duration::from_millis(12_000),
        }
    }
}

impl TailerArgs {
    /// Brings every knob into its supported range.
    pub fn clamped(self) -> Self {
        Self {
            base_interval: self.base_interval.max(Duration::from_millis(1)),
            backfill_blocks: self.backfill_blocks.max(1),
            catchup_concurrency: self.catchup_concurrency.clamp(1, 25),
            catchup_batch: self.catchup_batch.clamp(1, 5_000),
            max_dynamic_concurrency: self.max_dynamic_concurrency.clamp(1, 200),
            slice_parallelism: self.slice_parallelism.clamp(1, 16),
            slice_jitter: self.slice_jitter.min(Duration::from_millis(2_000)),
            rpc_timeout: self.rpc_timeout,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PollerArgs {
    pub limit: usize,
    pub finalized_only: bool,
    /// Pause after a page that left nothing more to fetch.
    pub idle_interval: Duration,
    pub error_interval: Duration,
    /// Upper bound on a single feed call.
    pub request_timeout: Duration,
}

impl Default for PollerArgs {
    fn default() -> Self {
        Self {
            limit: 100,
            finalized_only: true,
            idle_interval: Duration::from_secs(2),
            error_interval: Duration::from_secs(5),
            request_timeout: Duration::from_secs(15),
        }
    }
}
