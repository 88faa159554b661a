use crate::name::model::Name;
use crate::token::model::TokenSighting;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Activity {
    /// Idempotency key of the event that produced this row.
    pub id: String,
    pub token_id: String,
    pub scope_type: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub activity_type: String,
    pub tx_hash: Option<String>,
    pub block_number: Option<i64>,
    pub timestamp: i64,
    /// The raw event, as JSON.
    pub payload: String,
}

/// Everything one feed event writes, persisted together or not at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityRecords {
    /// Present when the event names its domain; refreshes the labels.
    pub name: Option<Name>,
    /// The name the token hangs off, created if missing.
    pub token_name: Name,
    /// Absent when the event carries no token id.
    pub token: Option<TokenSighting>,
    pub activity: Activity,
}
