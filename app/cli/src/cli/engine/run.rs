use alloy::transports::http::reqwest::Url;
use chain::breaker::CircuitBreaker;
use chain::gateway::RpcGateway;
use chain::governor::ConcurrencyGovernor;
use chain::pool::EndpointPool;
use chain::rpc::{ChainRpc, NodeClient, NodeClientOptions};
use engine::{
    args::{PollerArgs, TailerArgs},
    checkpointer::Checkpointer,
    engine::Engine,
    poller::Poller,
    retry::RetryQueue,
    tailer::Tailer,
};
use eyre::{Result, eyre};
use feed::client::HttpFeed;
use std::{sync::Arc, time::Duration};
use store::client::Client;

use crate::cli::engine::args::Args;
use crate::cli::read;

pub async fn start(args: &Args) -> Result<()> {
    let client = Client::init(&args.db_url).await?;
    Checkpointer::new(client.clone()).ensure().await?;

    let tailer = if args.enable_explorer {
        let gateway = build_gateway(args)?;
        tracing::info!(endpoints = gateway.endpoint_count(), "Chain tailer enabled");
        Some(Arc::new(Tailer::new(
            tailer_args(args),
            gateway,
            client.clone(),
            Arc::new(RetryQueue::default()),
        )))
    } else {
        tracing::info!("Chain tailer disabled (ENABLE_EXPLORER=false)");
        None
    };

    let poller = if !args.enable_ingestion {
        tracing::info!("Event poller disabled (ENABLE_INGESTION=false)");
        None
    } else if !args.feed.has_api_key() {
        tracing::warn!("DOMA_API_KEY is not set; event poller disabled");
        None
    } else {
        let feed = Arc::new(HttpFeed::new(
            &args.feed.api_base,
            args.feed.api_key.trim(),
            args.feed.timeout(),
        )?);
        let poller_args =
            PollerArgs { request_timeout: args.feed.timeout(), ..PollerArgs::default() };
        Some(Arc::new(Poller::new(poller_args, feed, client.clone())))
    };

    let engine = Engine::start(tailer, poller);
    if engine.is_idle() {
        return Ok(());
    }

    // Wait for user to request shutdown (SIGINT)
    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down engine...");

    // Gracefully shutdown
    engine.shutdown().await;

    Ok(())
}

fn build_gateway(args: &Args) -> Result<Arc<RpcGateway>> {
    let urls = args.rpc_urls.as_deref().map(read::parse_rpc_urls).unwrap_or_default();
    if urls.is_empty() {
        return Err(eyre!("No RPC endpoints configured (RPC_URLS)"));
    }

    let options = NodeClientOptions {
        timeout: Duration::from_millis(args.rpc_timeout_ms.max(1)),
        retry_count: args.rpc_retry_count.min(5),
        retry_delay: Duration::from_millis(args.rpc_retry_delay_ms.min(5_000)),
    };

    let endpoints = urls
        .into_iter()
        .map(|url| -> Result<(String, Arc<dyn ChainRpc>)> {
            let node_client = NodeClient::new(Url::parse(&url)?, options.clone())?;
            Ok((url, Arc::new(node_client) as Arc<dyn ChainRpc>))
        })
        .collect::<Result<Vec<_>>>()?;

    let pool = EndpointPool::new(endpoints)?;
    let governor = ConcurrencyGovernor::new(args.global_rpc_concurrency.clamp(1, 500));

    Ok(Arc::new(RpcGateway::new(pool, governor, CircuitBreaker::default())))
}

fn tailer_args(args: &Args) -> TailerArgs {
    TailerArgs {
        base_interval: Duration::from_millis(args.interval_ms),
        backfill_blocks: args.backfill_blocks,
        catchup_concurrency: args.catchup_concurrency,
        catchup_batch: args.catchup_batch,
        max_dynamic_concurrency: args.max_dynamic_concurrency,
        slice_parallelism: args.slice_parallelism,
        slice_jitter: Duration::from_millis(args.slice_jitter_ms),
        rpc_timeout: Duration::from_millis(args.rpc_timeout_ms),
    }
    .clamped()
}
