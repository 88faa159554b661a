use crate::block::model::Block;
use chain::block::ChainBlock;

impl From<&ChainBlock> for Block {
    fn from(block: &ChainBlock) -> Self {
        Block {
            number: block.number as i64,
            hash: block.hash.clone(),
            parent_hash: block.parent_hash.clone(),
            timestamp: block.timestamp as i64,
            tx_count: block.tx_count as i64,
        }
    }
}
