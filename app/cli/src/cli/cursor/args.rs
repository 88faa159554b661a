use clap::{Parser, Subcommand};

use crate::cli::engine::args::FeedArgs;

#[derive(Parser, Debug)]
#[command(about = "Inspect or reset the event feed cursor", long_about = None)]
pub struct CursorArgs {
    #[command(subcommand)]
    pub command: CursorCommand,
}

#[derive(Debug, Subcommand)]
pub enum CursorCommand {
    /// Print the persisted cursor
    Show {
        /// SQLite connection string
        #[arg(short, long, env = "DATABASE_URL")]
        db_url: String,
    },
    /// Move the feed and the local cursor to an event id
    Reset {
        /// SQLite connection string
        #[arg(short, long, env = "DATABASE_URL")]
        db_url: String,

        /// Event id to resume after
        #[arg(long, default_value_t = 0)]
        event_id: i64,

        #[command(flatten)]
        feed: FeedArgs,
    },
}
