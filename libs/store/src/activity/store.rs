use crate::activity::model::{Activity, ActivityRecords};
use crate::client::Client;
use crate::{name, token};
use eyre::Result;
use sqlx::Error;

#[derive(Clone)]
pub struct Store {
    client: Client,
}

impl Store {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    // ---------------------------
    // ACTIVITIES
    // ---------------------------

    pub async fn activity_exists(&self, id: &str) -> Result<bool, Error> {
        let query = "SELECT EXISTS(SELECT 1 FROM activities WHERE id = ?)";
        let exists = sqlx::query_scalar(query).bind(id).fetch_one(self.client.pool()).await?;

        Ok(exists)
    }

    /// Writes names, token and activity in one transaction.
    /// Returns `false` when the activity was already recorded; nothing is changed then.
    pub async fn record(&self, records: &ActivityRecords) -> Result<bool, Error> {
        let mut tx = self.client.pool().begin().await?;

        let query = r#"
            INSERT INTO activities
                (id, token_id, scope_type, type, tx_hash, block_number, timestamp, payload)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO NOTHING
            "#;
        let activity = &records.activity;
        let inserted = sqlx::query(query)
            .bind(&activity.id)
            .bind(&activity.token_id)
            .bind(&activity.scope_type)
            .bind(&activity.activity_type)
            .bind(&activity.tx_hash)
            .bind(activity.block_number)
            .bind(activity.timestamp)
            .bind(&activity.payload)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if inserted == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        if let Some(label) = &records.name {
            name::store::upsert_name(&mut *tx, label).await?;
        }
        name::store::ensure_name(&mut *tx, &records.token_name).await?;
        if let Some(sighting) = &records.token {
            token::store::upsert_token(&mut *tx, sighting).await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    pub async fn get_activity(&self, id: &str) -> Result<Option<Activity>, Error> {
        let query = r#"
            SELECT id, token_id, scope_type, type, tx_hash, block_number, timestamp, payload
            FROM activities
            WHERE id = ?
            "#;
        let activity = sqlx::query_as(query).bind(id).fetch_optional(self.client.pool()).await?;

        Ok(activity)
    }

    pub async fn get_activities_for_token(
        &self,
        token_id: &str,
        limit: i64,
    ) -> Result<Vec<Activity>, Error> {
        let query = r#"
            SELECT id, token_id, scope_type, type, tx_hash, block_number, timestamp, payload
            FROM activities
            WHERE token_id = ?
            ORDER BY timestamp ASC, id ASC
            LIMIT ?
            "#;
        let activities = sqlx::query_as(query)
            .bind(token_id)
            .bind(limit)
            .fetch_all(self.client.pool())
            .await?;

        Ok(activities)
    }

    pub async fn get_activities_from(
        &self,
        from_timestamp: i64,
        limit: i64,
    ) -> Result<Vec<Activity>, Error> {
        let query = r#"
            SELECT id, token_id, scope_type, type, tx_hash, block_number, timestamp, payload
            FROM activities
            WHERE timestamp >= ?
            ORDER BY timestamp ASC, id ASC
            LIMIT ?
            "#;
        let activities = sqlx::query_as(query)
            .bind(from_timestamp)
            .bind(limit)
            .fetch_all(self.client.pool())
            .await?;

        Ok(activities)
    }

    pub async fn count_activities(&self) -> Result<i64, Error> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM activities")
            .fetch_one(self.client.pool())
            .await?;

        Ok(count)
    }
}
