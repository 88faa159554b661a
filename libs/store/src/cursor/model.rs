use serde::Serialize;
use sqlx::FromRow;

/// Singleton row recording the last acknowledged feed event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow, Serialize)]
pub struct EventCursor {
    pub id: i64,
    pub last_id: i64,
}

pub const CURSOR_ID: i64 = 1;
