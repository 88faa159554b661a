use crate::client::Client;
use crate::cursor::model::{CURSOR_ID, EventCursor};
use eyre::Result;
use sqlx::sqlite::SqliteExecutor;
use sqlx::{Error, Sqlite, Transaction};

#[derive(Clone)]
pub struct Store {
    client: Client,
}

impl Store {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    // ---------------------------
    // EVENT CURSOR
    // ---------------------------

    pub async fn ensure_cursor(&self) -> Result<(), Error> {
        let query = r#"
            INSERT INTO event_cursor (id, last_id)
            VALUES (?, 0)
            ON CONFLICT(id) DO NOTHING
            "#;
        sqlx::query(query).bind(CURSOR_ID).execute(self.client.pool()).await?;
        Ok(())
    }

    pub async fn get_cursor(&self) -> Result<Option<EventCursor>, Error> {
        let query = "SELECT id, last_id FROM event_cursor WHERE id = ?";
        let cursor =
            sqlx::query_as(query).bind(CURSOR_ID).fetch_optional(self.client.pool()).await?;

        Ok(cursor)
    }

    /// Moves the cursor forward; a smaller id leaves it where it is.
    pub async fn advance_cursor(&self, last_id: i64) -> Result<(), Error> {
        let query = r#"
            INSERT INTO event_cursor (id, last_id)
            VALUES (?, ?)
            ON CONFLICT(id) DO UPDATE SET last_id = MAX(event_cursor.last_id, excluded.last_id)
            "#;
        sqlx::query(query).bind(CURSOR_ID).bind(last_id).execute(self.client.pool()).await?;
        Ok(())
    }

    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>, Error> {
        self.client.pool().begin().await
    }
}

/// Overwrites the cursor, in either direction.
pub async fn reset_cursor<'c>(
    executor: impl SqliteExecutor<'c>,
    last_id: i64,
) -> Result<(), Error> {
    let query = r#"
        INSERT INTO event_cursor (id, last_id)
        VALUES (?, ?)
        ON CONFLICT(id) DO UPDATE SET last_id = excluded.last_id
        "#;
    sqlx::query(query).bind(CURSOR_ID).bind(last_id).execute(executor).await?;
    Ok(())
}
