use clap::command;
use clap::{Parser, Subcommand};

use crate::cli::cursor::args::CursorArgs;
use crate::cli::query::args::Query;

use super::engine::args::Args;

#[derive(Parser, Debug)]
#[command(name = "indexer")]
#[command(about = "Chain and event-feed ingestion engine", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the chain tailer and the event poller until interrupted
    Engine(Args),
    /// Print indexed rows as JSON
    Select(Query),
    /// Inspect or reset the event feed cursor
    Cursor(CursorArgs),
}
