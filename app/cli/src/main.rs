mod cli {
    pub mod cursor {
        pub mod args;
        pub mod run;
    }
    pub mod engine {
        pub mod args;
        pub mod run;
    }
    pub mod query {
        pub mod args;
        pub mod read;
        pub mod run;
    }
    pub mod cmd;
    pub mod read;
}

use clap::Parser;
use eyre::Result;
use tracing_subscriber::EnvFilter;

use crate::cli::cmd::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli);

    match &cli.command {
        Command::Engine(args) => {
            tracing::info!(
                db = %args.db_url,
                explorer = args.enable_explorer,
                ingestion = args.enable_ingestion,
                "Engine command"
            );
            cli::engine::run::start(args).await
        }
        Command::Select(query) => {
            tracing::info!("Engine Query: {:?}", query);
            cli::query::run::select(query).await
        }
        Command::Cursor(cursor) => cli::cursor::run::run(&cursor.command).await,
    }
}

fn init_tracing(cli: &Cli) {
    // RUST_LOG, defaulting to info
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match &cli.command {
        Command::Engine(_) => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
        // keep stdout for the JSON output
        Command::Select(_) | Command::Cursor(_) => {
            tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
        }
    }
}
