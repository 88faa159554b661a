use engine::checkpointer::Checkpointer;
use eyre::{Result, eyre};
use feed::client::HttpFeed;
use serde_json::json;
use store::client::Client;
use store::cursor::model::CURSOR_ID;

use crate::cli::cursor::args::CursorCommand;

pub async fn run(command: &CursorCommand) -> Result<()> {
    match command {
        CursorCommand::Show { db_url } => {
            let checkpointer = Checkpointer::new(Client::init(db_url).await?);
            let last_id = checkpointer.last_id().await?;
            let cursor = json!({ "id": CURSOR_ID, "lastId": last_id });
            println!("{}", serde_json::to_string_pretty(&cursor)?);
        }
        CursorCommand::Reset { db_url, event_id, feed } => {
            if !feed.has_api_key() {
                return Err(eyre!("DOMA_API_KEY is required to reset the feed cursor"));
            }
            let http_feed = HttpFeed::new(&feed.api_base, feed.api_key.trim(), feed.timeout())?;
            let checkpointer = Checkpointer::new(Client::init(db_url).await?);
            checkpointer.reset(&http_feed, *event_id).await?;
            let cursor = json!({ "id": CURSOR_ID, "lastId": event_id });
            println!("{}", serde_json::to_string_pretty(&cursor)?);
        }
    }

    Ok(())
}
