use crate::transaction::model::Transaction;
use crate::utils::method_signature;
use chain::block::{ChainBlock, ChainTransaction};

pub fn from(tx: &ChainTransaction, block_number: i64) -> Transaction {
    Transaction {
        hash: tx.hash.clone(),
        block_number,
        from_address: tx.from.clone(),
        to_address: tx.to.clone(),
        value: tx.value.clone(),
        // receipts are not fetched
        success: true,
        method_sig: method_signature(&tx.input),
    }
}

pub fn from_block(block: &ChainBlock) -> Vec<Transaction> {
    block.transactions.iter().map(|tx| from(tx, block.number as i64)).collect()
}
