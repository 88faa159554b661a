use std::future::Future;
use std::time::Duration;

use alloy::eips::BlockNumberOrTag;
use alloy::primitives::BlockNumber;
use alloy::providers::{Provider, RootProvider};
use alloy::rpc::client::RpcClient;
use alloy::transports::http::{Http, reqwest};
use alloy::transports::{TransportError, TransportErrorKind};
use eyre::Result;
use reqwest::Url;

use crate::block::ChainBlock;

/// The two chain reads the indexer depends on.
#[async_trait::async_trait]
pub trait ChainRpc: Send + Sync {
    async fn get_head(&self) -> Result<BlockNumber, TransportError>;

    /// A block that the node does not know yet is reported as an error.
    async fn get_block(
        &self,
        number: BlockNumber,
        include_transactions: bool,
    ) -> Result<ChainBlock, TransportError>;
}

#[derive(Debug, Clone)]
pub struct NodeClientOptions {
    pub timeout: Duration,
    pub retry_count: u32,
    pub retry_delay: Duration,
}

impl Default for NodeClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(12_000),
            retry_count: 2,
            retry_delay: Duration::from_millis(200),
        }
    }
}

#[derive(Clone)]
pub struct NodeClient {
    provider: RootProvider,
    options: NodeClientOptions,
}

impl NodeClient {
    pub fn new(rpc_url: Url, options: NodeClientOptions) -> Result<Self> {
        let http_client = reqwest::Client::builder().timeout(options.timeout).build()?;
        let rpc_client = RpcClient::new(Http::with_client(http_client, rpc_url), false);
        let provider = RootProvider::new(rpc_client);
        Ok(Self { provider, options })
    }

    pub fn borrow_provider(&self) -> &RootProvider {
        &self.provider
    }

    // Transport-level retries stay inside one logical call.
    async fn with_retry<T, F, Fut>(&self, mut call: F) -> Result<T, TransportError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, TransportError>>,
    {
        let mut attempt = 0;
        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.options.retry_count && e.is_transport_error() => {
                    attempt += 1;
                    tracing::debug!("Transport error (attempt {attempt}): {e}");
                    tokio::time::sleep(self.options.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait::async_trait]
impl ChainRpc for NodeClient {
    async fn get_head(&self) -> Result<BlockNumber, TransportError> {
        self.with_retry(|| async { self.provider.get_block_number().await }).await
    }

    async fn get_block(
        &self,
        number: BlockNumber,
        include_transactions: bool,
    ) -> Result<ChainBlock, TransportError> {
        let block = self
            .with_retry(|| async {
                let request = self.provider.get_block_by_number(BlockNumberOrTag::Number(number));
                if include_transactions { request.full().await } else { request.hashes().await }
            })
            .await?
            .ok_or_else(|| TransportErrorKind::custom_str(&format!("block {number} not found")))?;

        Ok(ChainBlock::from(&block))
    }
}
