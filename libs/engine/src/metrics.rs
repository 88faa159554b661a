use serde::Serialize;

/// Where the tailer currently is within its iteration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// Circuit open; waiting for the cooldown.
    ClosedWait,
    DrainRetry,
    CatchUp,
    SequentialIndex,
    ThrottleAdjust,
    #[default]
    Sleep,
}

/// Point-in-time view of the tailer, for monitoring.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TailerMetrics {
    pub lag: u64,
    pub effective_concurrency: usize,
    pub adaptive_interval_ms: u64,
    pub retry_queue_size: usize,
    pub circuit_open: bool,
    pub window_size: usize,
    pub errors_in_window: usize,
    pub error_rate_pct: f64,
    pub configured_max_dynamic_concurrency: usize,
    pub runtime_max_dynamic_concurrency: usize,
    pub rpc_timeout_ms: u64,
    pub endpoint_count: usize,
    pub global_concurrency: usize,
    pub in_flight: usize,
    pub phase: Phase,
}
