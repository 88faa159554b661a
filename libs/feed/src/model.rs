use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One page of the poll feed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollResponse {
    #[serde(default)]
    pub events: Vec<FeedEvent>,
    #[serde(default)]
    pub last_id: i64,
    #[serde(default)]
    pub has_more_events: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_id: Option<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub event_data: EventData,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_address: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Renders a JSON scalar the way it reads in the feed: strings unquoted, null empty.
pub fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A scalar field as text; absent and null both read as `None`.
fn text(value: &Option<Value>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_null()).map(scalar_to_string)
}

impl FeedEvent {
    pub fn unique_id(&self) -> Option<String> {
        text(&self.unique_id)
    }

    pub fn event_type(&self) -> Option<String> {
        text(&self.event_type)
    }

    /// Deduplication key: the feed's unique id, else `type:tokenAddress:tokenId:txHash`.
    pub fn idempotency_key(&self) -> String {
        if let Some(unique_id) = self.unique_id() {
            return unique_id;
        }
        let data = &self.event_data;
        format!(
            "{}:{}:{}:{}",
            self.event_type().unwrap_or_default(),
            data.token_address().unwrap_or_default(),
            text(&data.token_id).unwrap_or_default(),
            data.tx_hash().unwrap_or_default(),
        )
    }
}

impl EventData {
    pub fn token_address(&self) -> Option<String> {
        text(&self.token_address)
    }

    pub fn tx_hash(&self) -> Option<String> {
        text(&self.tx_hash)
    }

    pub fn name(&self) -> Option<String> {
        text(&self.name)
    }

    pub fn owner(&self) -> Option<String> {
        text(&self.owner)
    }

    pub fn network_id(&self) -> Option<String> {
        text(&self.network_id)
    }

    pub fn chain_id(&self) -> Option<String> {
        text(&self.chain_id)
    }
}
