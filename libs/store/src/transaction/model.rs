use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Transaction {
    pub hash: String,
    pub block_number: i64,
    pub from_address: String,
    pub to_address: Option<String>,
    /// Wei, as a decimal string.
    pub value: String,
    pub success: bool,
    pub method_sig: Option<String>,
}
