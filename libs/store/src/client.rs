use std::str::FromStr;

use eyre::Result;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

#[derive(Clone)]
pub struct Client {
    pool: SqlitePool,
}

impl Client {
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);
        // in-memory databases live in a shared cache; one connection avoids table-level locks
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };
        let pool =
            SqlitePoolOptions::new().max_connections(max_connections).connect_with(options).await?;

        Ok(Self { pool })
    }

    pub async fn init(database_url: &str) -> Result<Self> {
        let client = Client::new(database_url).await?;

        // Create tables on startup
        sqlx::query(include_str!("../resources/create_tables.sql")).execute(client.pool()).await?;

        Ok(client)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
