use serde::Serialize;
use sqlx::FromRow;

pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Token {
    pub id: String,
    pub name_id: String,
    pub owner: String,
    pub chain_id: String,
    pub claimed: bool,
    pub synthetic: bool,
    pub last_activity_at: Option<i64>,
}

/// What an event tells us about a token. `owner` is only known for some event types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSighting {
    pub id: String,
    pub name_id: String,
    pub owner: Option<String>,
    pub chain_id: String,
    pub seen_at: i64,
}
