use crate::client::Client;
use crate::transaction::model::Transaction;
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
    // TRANSACTIONS
    // ---------------------------

    /// Same contract as the block batch: duplicates are skipped, anything else fails the batch.
    pub async fn insert_transactions_skip_duplicates(
        &self,
        transactions: &[Transaction],
    ) -> Result<u64, Error> {
        if transactions.is_empty() {
            return Ok(0);
        }

        let mut tx = self.client.pool().begin().await?;
        let mut inserted = 0;
        for chunk in transactions.chunks(MAX_ROWS_PER_STATEMENT) {
            let mut builder = QueryBuilder::<Sqlite>::new(
                "INSERT INTO transactions \
                 (hash, block_number, from_address, to_address, value, success, method_sig) ",
            );
            builder.push_values(chunk, |mut row, t| {
                row.push_bind(t.hash.clone())
                    .push_bind(t.block_number)
                    .push_bind(t.from_address.clone())
                    .push_bind(t.to_address.clone())
                    .push_bind(t.value.clone())
                    .push_bind(t.success)
                    .push_bind(t.method_sig.clone());
            });
            builder.push(" ON CONFLICT(hash) DO NOTHING");
            inserted += builder.build().execute(&mut *tx).await?.rows_affected();
        }
        tx.commit().await?;

        Ok(inserted)
    }

    pub async fn upsert_transaction(&self, t: &Transaction) -> Result<(), Error> {
        let query = r#"
            INSERT INTO transactions
                (hash, block_number, from_address, to_address, value, success, method_sig)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(hash) DO UPDATE SET
                block_number = excluded.block_number,
                to_address = excluded.to_address,
                value = excluded.value,
                method_sig = excluded.method_sig
            "#;
        sqlx::query(query)
            .bind(&t.hash)
            .bind(t.block_number)
            .bind(&t.from_address)
            .bind(&t.to_address)
            .bind(&t.value)
            .bind(t.success)
            .bind(&t.method_sig)
            .execute(self.client.pool())
            .await?;
        Ok(())
    }

    pub async fn get_transaction(&self, hash: &str) -> Result<Option<Transaction>, Error> {
        let query = r#"
            SELECT hash, block_number, from_address, to_address, value, success, method_sig
            FROM transactions
            WHERE hash = ?
            "#;
        let t = sqlx::query_as(query).bind(hash).fetch_optional(self.client.pool()).await?;

        Ok(t)
    }

    pub async fn get_transactions_by_block(
        &self,
        block_number: i64,
    ) -> Result<Vec<Transaction>, Error> {
        let query = r#"
            SELECT hash, block_number, from_address, to_address, value, success, method_sig
            FROM transactions
            WHERE block_number = ?
            ORDER BY hash ASC
            "#;
        let transactions =
            sqlx::query_as(query).bind(block_number).fetch_all(self.client.pool()).await?;

        Ok(transactions)
    }

    pub async fn get_transactions_from_block(
        &self,
        from_block: i64,
        limit: i64,
    ) -> Result<Vec<Transaction>, Error> {
        let query = r#"
            SELECT hash, block_number, from_address, to_address, value, success, method_sig
            FROM transactions
            WHERE block_number >= ?
            ORDER BY block_number ASC, hash ASC
            LIMIT ?
            "#;
        let transactions = sqlx::query_as(query)
            .bind(from_block)
            .bind(limit)
            .fetch_all(self.client.pool())
            .await?;

        Ok(transactions)
    }

    pub async fn count_transactions(&self) -> Result<i64, Error> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(self.client.pool())
            .await?;

        Ok(count)
    }
}
