use eyre::{Result, eyre};
use feed::client::Feed;
use store::client::Client;
use store::cursor::store::{Store as CursorStore, reset_cursor};

/// Owner of the feed cursor: the last event id that has been persisted and acknowledged.
#[derive(Clone)]
pub struct Checkpointer {
    store: CursorStore,
}

impl Checkpointer {
    pub fn new(client: Client) -> Self {
        Self { store: CursorStore::new(client) }
    }

    pub async fn ensure(&self) -> Result<()> {
        self.store.ensure_cursor().await.map_err(|e| {
            tracing::error!("Checkpointer failed on [ensure_cursor]: {e:?}");
            eyre!(e)
        })
    }

    pub async fn last_id(&self) -> Result<i64> {
        let cursor = self.store.get_cursor().await?;
        Ok(cursor.map(|c| c.last_id).unwrap_or_default())
    }

    pub async fn checkpoint(&self, last_id: i64) -> Result<()> {
        match self.store.advance_cursor(last_id).await {
            Ok(()) => {
                tracing::debug!("Cursor advanced to {last_id}");
                Ok(())
            }
            Err(e) => {
                tracing::error!("Checkpointer failed on [advance_cursor]: {e:?}");
                Err(eyre!(e))
            }
        }
    }

    /// Rewinds (or forwards) both the feed and the local cursor to `event_id`.
    /// The local write is only committed once the feed has accepted the reset.
    pub async fn reset(&self, feed: &dyn Feed, event_id: i64) -> Result<()> {
        let mut tx = self.store.begin().await?;
        reset_cursor(&mut *tx, event_id).await?;

        if let Err(e) = feed.reset(event_id).await {
            tracing::error!("Feed rejected cursor reset to {event_id}: {e:?}");
            tx.rollback().await?;
            return Err(e);
        }

        tx.commit().await?;
        tracing::info!("Cursor reset to {event_id}");
        Ok(())
    }
}
