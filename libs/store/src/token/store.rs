use crate::token::model::{Token, TokenSighting, ZERO_ADDRESS};
use eyre::Result;
use sqlx::Error;
use sqlx::sqlite::SqliteExecutor;

/// New tokens start unclaimed with a zero owner and no activity time.
/// Existing tokens take the sighting's chain, activity time and owner when one is given.
pub async fn upsert_token<'c>(
    executor: impl SqliteExecutor<'c>,
    sighting: &TokenSighting,
) -> Result<(), Error> {
    let query = r#"
        INSERT INTO tokens (id, name_id, owner, chain_id, claimed, synthetic, last_activity_at)
        VALUES (?1, ?2, COALESCE(?3, ?4), ?5, 0, 0, NULL)
        ON CONFLICT(id) DO UPDATE SET
            owner = COALESCE(?3, tokens.owner),
            chain_id = excluded.chain_id,
            last_activity_at = ?6
        "#;
    sqlx::query(query)
        .bind(&sighting.id)
        .bind(&sighting.name_id)
        .bind(&sighting.owner)
        .bind(ZERO_ADDRESS)
        .bind(&sighting.chain_id)
        .bind(sighting.seen_at)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn get_token<'c>(
    executor: impl SqliteExecutor<'c>,
    id: &str,
) -> Result<Option<Token>, Error> {
    let query = r#"
        SELECT id, name_id, owner, chain_id, claimed, synthetic, last_activity_at
        FROM tokens
        WHERE id = ?
        "#;
    sqlx::query_as(query).bind(id).fetch_optional(executor).await
}
