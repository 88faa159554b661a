use crate::block::model::Block;
use crate::client::Client;
use crate::utils::MAX_ROWS_PER_STATEMENT;
use eyre::Result;
use sqlx::{Error, QueryBuilder, Sqlite};

#[derive(Clone)]
pub struct Store {
    client: Client,
}

impl Store {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    // ---------------------------
    // BLOCKS
    // ---------------------------

    /// Inserts every block in one transaction, leaving existing rows untouched.
    /// Any other constraint violation aborts the whole batch.
    pub async fn insert_blocks_skip_duplicates(&self, blocks: &[Block]) -> Result<u64, Error> {
        if blocks.is_empty() {
            return Ok(0);
        }

        let mut tx = self.client.pool().begin().await?;
        let mut inserted = 0;
        for chunk in blocks.chunks(MAX_ROWS_PER_STATEMENT) {
            let mut builder = QueryBuilder::<Sqlite>::new(
                "INSERT INTO blocks (number, hash, parent_hash, timestamp, tx_count) ",
            );
            builder.push_values(chunk, |mut row, block| {
                row.push_bind(block.number)
                    .push_bind(block.hash.clone())
                    .push_bind(block.parent_hash.clone())
                    .push_bind(block.timestamp)
                    .push_bind(block.tx_count);
            });
            builder.push(" ON CONFLICT(number) DO NOTHING");
            inserted += builder.build().execute(&mut *tx).await?.rows_affected();
        }
        tx.commit().await?;

        Ok(inserted)
    }

    pub async fn upsert_block(&self, block: &Block) -> Result<(), Error> {
        let query = r#"
            INSERT INTO blocks (number, hash, parent_hash, timestamp, tx_count)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(number) DO UPDATE SET
                hash = excluded.hash,
                parent_hash = excluded.parent_hash,
                timestamp = excluded.timestamp,
                tx_count = excluded.tx_count
            "#;
        sqlx::query(query)
            .bind(block.number)
            .bind(&block.hash)
            .bind(&block.parent_hash)
            .bind(block.timestamp)
            .bind(block.tx_count)
            .execute(self.client.pool())
            .await?;
        Ok(())
    }

    pub async fn get_latest_block_number(&self) -> Result<Option<i64>, Error> {
        let query = "SELECT MAX(number) FROM blocks";
        let number = sqlx::query_scalar(query).fetch_one(self.client.pool()).await?;

        Ok(number)
    }

    pub async fn get_block(&self, number: i64) -> Result<Option<Block>, Error> {
        let query = r#"
            SELECT number, hash, parent_hash, timestamp, tx_count
            FROM blocks
            WHERE number = ?
            "#;
        let block = sqlx::query_as(query).bind(number).fetch_optional(self.client.pool()).await?;

        Ok(block)
    }

    pub async fn get_blocks_from(&self, from: i64, limit: i64) -> Result<Vec<Block>, Error> {
        let query = r#"
            SELECT number, hash, parent_hash, timestamp, tx_count
            FROM blocks
            WHERE number >= ?
            ORDER BY number ASC
            LIMIT ?
            "#;
        let blocks =
            sqlx::query_as(query).bind(from).bind(limit).fetch_all(self.client.pool()).await?;

        Ok(blocks)
    }

    pub async fn count_blocks(&self) -> Result<i64, Error> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM blocks")
            .fetch_one(self.client.pool())
            .await?;

        Ok(count)
    }
}
