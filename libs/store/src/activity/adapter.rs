use crate::activity::model::{Activity, ActivityRecords};
use crate::name::model::Name;
use crate::token::model::TokenSighting;
use crate::utils::{parse_i64, parse_timestamp};
use chrono::{DateTime, Utc};
use eyre::Result;
use feed::model::{FeedEvent, scalar_to_string};

pub const DEFAULT_CHAIN_ID: &str = "eip155:97476";
pub const TOKEN_SCOPE: &str = "token";
pub const UNKNOWN_TYPE: &str = "UNKNOWN";

pub fn from(event: &FeedEvent, key: String, now: DateTime<Utc>) -> Result<ActivityRecords> {
    let data = &event.event_data;

    let token_id = data
        .token_id
        .as_ref()
        .or(event.token_id.as_ref())
        .or(event.id.as_ref())
        .filter(|value| !value.is_null())
        .map(scalar_to_string)
        .unwrap_or_default();
    let chain_id = data
        .network_id()
        .or_else(|| data.chain_id())
        .unwrap_or_else(|| DEFAULT_CHAIN_ID.to_string());

    let name = data.name().as_deref().map(Name::parse);
    let token_name = match &name {
        Some(name) => name.clone(),
        None => Name::parse(&format!("unknown.{chain_id}")),
    };

    let token = (!token_id.is_empty()).then(|| TokenSighting {
        id: token_id.clone(),
        name_id: token_name.id.clone(),
        owner: data.owner(),
        chain_id,
        seen_at: now.timestamp(),
    });

    let activity = Activity {
        id: key,
        token_id,
        scope_type: TOKEN_SCOPE.to_string(),
        activity_type: event.event_type().unwrap_or_else(|| UNKNOWN_TYPE.to_string()),
        tx_hash: data.tx_hash(),
        block_number: parse_i64(data.block_number.as_ref()),
        timestamp: parse_timestamp(data.timestamp.as_ref(), now),
        payload: serde_json::to_string(event)?,
    };

    Ok(ActivityRecords { name, token_name, token, activity })
}
