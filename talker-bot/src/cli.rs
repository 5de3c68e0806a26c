//! CLI parser and config loading.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::BotConfig;

#[derive(Parser)]
#[command(name = "talker")]
#[command(about = "Talker Telegram bot", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Register the webhook and serve it (config from env; token can override BOT_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
    },
    /// Register WEBHOOK_URL with Telegram and exit.
    SetWebhook {
        #[arg(short, long)]
        token: Option<String>,
    },
    /// Remove the webhook registration and exit.
    DeleteWebhook {
        #[arg(short, long)]
        token: Option<String>,
    },
}

/// Load BotConfig from environment. If `token` is provided it overrides BOT_TOKEN.
pub fn load_config(token: Option<String>) -> Result<BotConfig> {
    BotConfig::load(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::try_parse_from(["talker", "run", "--token", "abc"]).unwrap();
        assert!(matches!(cli.command, Commands::Run { token: Some(ref t) } if t == "abc"));

        let cli = Cli::try_parse_from(["talker", "set-webhook"]).unwrap();
        assert!(matches!(cli.command, Commands::SetWebhook { token: None }));

        let cli = Cli::try_parse_from(["talker", "delete-webhook", "-t", "xyz"]).unwrap();
        assert!(matches!(cli.command, Commands::DeleteWebhook { token: Some(_) }));

        assert!(Cli::try_parse_from(["talker"]).is_err());
    }
}
