use alloy::consensus::Transaction as ConsensusTransaction;
use alloy::hex;
use alloy::network::TransactionResponse;
use alloy::primitives::BlockNumber;
use alloy::rpc::types::{Block, Transaction};

/// Block body as returned by a chain endpoint, detached from the RPC client types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainBlock {
    pub number: BlockNumber,
    pub hash: String,
    pub parent_hash: String,
    /// Seconds since the unix epoch.
    pub timestamp: u64,
    /// Number of transactions in the block, known even when bodies were not requested.
    pub tx_count: usize,
    pub transactions: Vec<ChainTransaction>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainTransaction {
    pub hash: String,
    pub from: String,
    pub to: Option<String>,
    /// Wei, as a decimal string.
    pub value: String,
    /// Calldata, `0x` prefixed.
    pub input: String,
}

impl From<&Block> for ChainBlock {
    fn from(block: &Block) -> Self {
        ChainBlock {
            number: block.header.number,
            hash: format!("{:#x}", block.header.hash),
            parent_hash: format!("{:#x}", block.header.parent_hash),
            timestamp: block.header.timestamp,
            tx_count: block.transactions.len(),
            transactions: block.transactions.txns().map(ChainTransaction::from).collect(),
        }
    }
}

impl From<&Transaction> for ChainTransaction {
    fn from(tx: &Transaction) -> Self {
        ChainTransaction {
            hash: format!("{:#x}", TransactionResponse::tx_hash(tx)),
            from: format!("{:#x}", TransactionResponse::from(tx)),
            to: ConsensusTransaction::to(tx).map(|to| format!("{to:#x}")),
            value: ConsensusTransaction::value(tx).to_string(),
            input: hex::encode_prefixed(ConsensusTransaction::input(tx)),
        }
    }
}
