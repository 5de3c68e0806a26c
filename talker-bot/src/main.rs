//! talker: entry point.

use anyhow::Result;
use clap::Parser;
use talker_bot::{load_config, remove_webhook, run_bot, set_webhook, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => run_bot(load_config(token)?).await,
        Commands::SetWebhook { token } => set_webhook(load_config(token)?).await,
        Commands::DeleteWebhook { token } => remove_webhook(load_config(token)?).await,
    }
}
