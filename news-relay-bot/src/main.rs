//! news-relay-bot entry point.

use anyhow::Result;
use clap::Parser;
use news_relay_bot::{load_config, run_relay_bot, Cli, Commands};
use telegram_bot::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => {
            let config = load_config(token)?;
            init_tracing(&config.base.log_file)?;
            run_relay_bot(config).await
        }
    }
}
