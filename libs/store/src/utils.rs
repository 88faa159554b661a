use chrono::{DateTime, Utc};
use serde_json::Value;

/// Rows per multi-row INSERT, kept well under SQLite's bound-parameter limit.
pub const MAX_ROWS_PER_STATEMENT: usize = 100;

/// First four bytes of calldata as `0x`-prefixed hex, or `None` for plain transfers.
pub fn method_signature(input: &str) -> Option<String> {
    if input.is_empty() || input == "0x" {
        return None;
    }
    Some(input.get(..10).unwrap_or(input).to_string())
}

/// Seconds since epoch from an RFC 3339 string or epoch milliseconds, falling back to `now`.
pub fn parse_timestamp(value: Option<&Value>, now: DateTime<Utc>) -> i64 {
    let parsed = match value {
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.timestamp())
            .ok()
            .or_else(|| s.parse::<i64>().ok().map(|millis| millis / 1000)),
        Some(Value::Number(n)) => n.as_i64().map(|millis| millis / 1000),
        _ => None,
    };
    parsed.unwrap_or_else(|| now.timestamp())
}

pub fn parse_i64(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}
