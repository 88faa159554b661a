use clap::Parser;

use crate::cli::query::read::Entity;

#[derive(Parser, Debug)]
#[command(about = "Select indexed results", long_about = None)]
pub struct Query {
    /// SQLite connection string
    #[arg(short, long, env = "DATABASE_URL")]
    pub db_url: String,

    /// Entity to query
    #[arg(short, long, value_enum)]
    pub entity: Entity,

    /// Lower bound: block number for blocks and transactions, unix seconds for activities
    #[arg(long, default_value_t = 0)]
    pub from: i64,

    /// Maximum number of rows
    #[arg(long, default_value_t = 50)]
    pub limit: i64,
}
