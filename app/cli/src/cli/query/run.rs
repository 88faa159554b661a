use crate::cli::query::args::Query;
use crate::cli::query::read::Entity;
use eyre::Result;
use store::client::Client;

pub async fn select(query: &Query) -> Result<()> {
    let client = Client::init(&query.db_url).await?;
    let limit = query.limit.max(0);

    let rows = match query.entity {
        Entity::Block => {
            let block_store = store::block::store::Store::new(client);
            let blocks = block_store.get_blocks_from(query.from, limit).await?;
            serde_json::to_string_pretty(&blocks)?
        }
        Entity::Transaction => {
            let transaction_store = store::transaction::store::Store::new(client);
            let transactions =
                transaction_store.get_transactions_from_block(query.from, limit).await?;
            serde_json::to_string_pretty(&transactions)?
        }
        Entity::Activity => {
            let activity_store = store::activity::store::Store::new(client);
            let activities = activity_store.get_activities_from(query.from, limit).await?;
            serde_json::to_string_pretty(&activities)?
        }
    };

    println!("{rows}");

    Ok(())
}
