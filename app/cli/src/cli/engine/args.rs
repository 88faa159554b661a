use clap::{ArgAction, Parser};
use clap::{arg, command};
use feed::client::DEFAULT_BASE_URL;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(about = "Start the indexer engine", long_about = None)]
pub struct Args {
    /// RPC endpoints (comma or space separated); required when the tailer runs
    #[arg(short, long, env = "RPC_URLS")]
    pub rpc_urls: Option<String>,

    /// SQLite connection string
    #[arg(short, long, env = "DATABASE_URL")]
    pub db_url: String,

    /// Per-request RPC timeout in milliseconds
    #[arg(long, env = "EXPLORER_RPC_TIMEOUT_MS", default_value_t = 12_000)]
    pub rpc_timeout_ms: u64,

    /// Transport retries per RPC call (at most 5)
    #[arg(long, env = "EXPLORER_RPC_RETRY_COUNT", default_value_t = 2)]
    pub rpc_retry_count: u32,

    /// Delay between transport retries in milliseconds (at most 5000)
    #[arg(long, env = "EXPLORER_RPC_RETRY_DELAY_MS", default_value_t = 200)]
    pub rpc_retry_delay_ms: u64,

    /// Process-wide cap on concurrent RPC calls (1-500)
    #[arg(long, env = "EXPLORER_GLOBAL_RPC_CONCURRENCY", default_value_t = 100)]
    pub global_rpc_concurrency: usize,

    /// Maximum random delay before each catch-up slice in milliseconds (at most 2000)
    #[arg(long, env = "EXPLORER_SLICE_JITTER_MS", default_value_t = 0)]
    pub slice_jitter_ms: u64,

    /// Base tailer interval in milliseconds
    #[arg(long, env = "EXPLORER_INTERVAL_MS", default_value_t = 2_000)]
    pub interval_ms: u64,

    /// Blocks behind the head to start from on an empty database
    #[arg(long, env = "EXPLORER_BACKFILL_BLOCKS", default_value_t = 50)]
    pub backfill_blocks: u64,

    /// Base catch-up concurrency (1-25)
    #[arg(long, env = "EXPLORER_CATCHUP_CONCURRENCY", default_value_t = 5)]
    pub catchup_concurrency: usize,

    /// Blocks per catch-up batch (1-5000)
    #[arg(long, env = "EXPLORER_CATCHUP_BATCH", default_value_t = 200)]
    pub catchup_batch: usize,

    /// Ceiling for lag-scaled catch-up concurrency (1-200)
    #[arg(long, env = "EXPLORER_MAX_DYNAMIC_CONCURRENCY", default_value_t = 60)]
    pub max_dynamic_concurrency: usize,

    /// Catch-up slices run at once (1-16)
    #[arg(long, env = "EXPLORER_SLICE_PARALLELISM", default_value_t = 4)]
    pub slice_parallelism: usize,

    /// Run the chain tailer
    #[arg(long, env = "ENABLE_EXPLORER", default_value_t = true, action = ArgAction::Set)]
    pub enable_explorer: bool,

    /// Run the event poller
    #[arg(long, env = "ENABLE_INGESTION", default_value_t = true, action = ArgAction::Set)]
    pub enable_ingestion: bool,

    #[command(flatten)]
    pub feed: FeedArgs,
}

#[derive(clap::Args, Debug, Clone)]
pub struct FeedArgs {
    /// Event feed base URL
    #[arg(long, env = "DOMA_API_BASE", default_value = DEFAULT_BASE_URL)]
    pub api_base: String,

    /// Event feed API key; the poller is skipped without one
    #[arg(long, env = "DOMA_API_KEY", default_value = "", hide_env_values = true)]
    pub api_key: String,

    /// Per-request feed timeout in milliseconds
    #[arg(long, env = "DOMA_API_TIMEOUT_MS", default_value_t = 15_000)]
    pub api_timeout_ms: u64,
}

impl FeedArgs {
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.api_timeout_ms.max(1))
    }
}
