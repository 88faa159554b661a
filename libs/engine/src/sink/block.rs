use crate::sink::handle::Sink;
use chain::block::ChainBlock;
use eyre::{Result, eyre};
use store::block::{model::Block, store::Store as BlockStore};
use store::client::Client;
use store::transaction::{adapter, model::Transaction, store::Store as TransactionStore};

/// Blocks and their transactions.
///
/// Batches go through an insert that skips existing keys; when a batch fails as a whole the
/// rows are upserted one by one so a single bad row only costs itself.
pub struct BlockSink {
    blocks: BlockStore,
    transactions: TransactionStore,
}

impl BlockSink {
    pub fn new(client: Client) -> Self {
        Self { blocks: BlockStore::new(client.clone()), transactions: TransactionStore::new(client) }
    }

    async fn persist_blocks(&self, rows: &[Block]) -> usize {
        match self.blocks.insert_blocks_skip_duplicates(rows).await {
            Ok(inserted) => inserted as usize,
            Err(e) => {
                tracing::warn!(
                    "Batch insert of {} blocks failed, upserting one by one: {e}",
                    rows.len()
                );
                let mut written = 0;
                for row in rows {
                    match self.blocks.upsert_block(row).await {
                        Ok(()) => written += 1,
                        Err(e) => tracing::error!(block = row.number, "Block upsert failed: {e}"),
                    }
                }
                written
            }
        }
    }

    async fn persist_transactions(&self, rows: &[Transaction]) -> usize {
        match self.transactions.insert_transactions_skip_duplicates(rows).await {
            Ok(inserted) => inserted as usize,
            Err(e) => {
                tracing::warn!(
                    "Batch insert of {} transactions failed, upserting one by one: {e}",
                    rows.len()
                );
                let mut written = 0;
                for row in rows {
                    match self.transactions.upsert_transaction(row).await {
                        Ok(()) => written += 1,
                        Err(e) => tracing::error!(
                            tx = %row.hash,
                            block = row.block_number,
                            "Transaction upsert failed: {e}"
                        ),
                    }
                }
                written
            }
        }
    }
}

#[async_trait::async_trait]
impl Sink for BlockSink {
    type Item = ChainBlock;

    async fn process(&self, block: &ChainBlock) -> Result<()> {
        if let Err(e) = self.blocks.upsert_block(&Block::from(block)).await {
            tracing::error!(block = block.number, "Sink failed on [upsert_block]: {e:?}");
            return Err(eyre!(e));
        }
        self.persist_transactions(&adapter::from_block(block)).await;
        tracing::debug!(block = block.number, txs = block.transactions.len(), "Indexed block");
        Ok(())
    }

    async fn process_batch(&self, blocks: &[ChainBlock]) -> Result<usize> {
        if blocks.is_empty() {
            return Ok(0);
        }
        let block_rows: Vec<Block> = blocks.iter().map(Block::from).collect();
        let written = self.persist_blocks(&block_rows).await;

        let tx_rows: Vec<Transaction> = blocks.iter().flat_map(adapter::from_block).collect();
        let txs = self.persist_transactions(&tx_rows).await;

        tracing::debug!(blocks = written, txs, "Processed batch");
        Ok(written)
    }
}
