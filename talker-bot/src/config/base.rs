//! Base config: Telegram Bot connection, logging, database. Loaded from env.

use anyhow::{bail, Result};
use std::env;

/// Base config: Telegram-related, logging, database only.
#[derive(Debug, Clone)]
pub struct BaseConfig {
    /// BOT_TOKEN or TELEGRAM_BOT_TOKEN
    pub bot_token: String,
    /// TELEGRAM_API_URL or TELOXIDE_API_URL
    pub telegram_api_url: Option<String>,
    /// Log file path
    pub log_file: String,
    /// DATABASE_URL or DB_HOST: `memory`, `sqlite:…` / `file:…`, `mongodb://…`
    pub database_url: String,
    /// MongoDB database name
    pub database_name: String,
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.trim().is_empty())
}

impl BaseConfig {
    /// Load from environment variables. `token` overrides BOT_TOKEN if provided.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token
            .filter(|t| !t.trim().is_empty())
            .or_else(|| non_empty_var("BOT_TOKEN"))
            .or_else(|| non_empty_var("TELEGRAM_BOT_TOKEN"))
        {
            Some(t) => t,
            None => bail!("BOT_TOKEN not set (use BOT_TOKEN, TELEGRAM_BOT_TOKEN or --token)"),
        };
        let database_url = non_empty_var("DATABASE_URL")
            .or_else(|| non_empty_var("DB_HOST"))
            .unwrap_or_else(|| "memory".to_string());
        let database_name =
            non_empty_var("DATABASE_NAME").unwrap_or_else(|| "talkerbot".to_string());
        let log_file = non_empty_var("LOG_FILE").unwrap_or_else(|| "logs/talker.log".to_string());
        let telegram_api_url =
            non_empty_var("TELEGRAM_API_URL").or_else(|| non_empty_var("TELOXIDE_API_URL"));

        Ok(Self {
            bot_token,
            telegram_api_url,
            log_file,
            database_url,
            database_name,
        })
    }

    /// Validate config: API URL must parse, database URL must name a known backend.
    pub fn validate(&self) -> Result<()> {
        if let Some(ref url_str) = self.telegram_api_url {
            if reqwest::Url::parse(url_str).is_err() {
                bail!(
                    "TELEGRAM_API_URL (or TELOXIDE_API_URL) is set but not a valid URL: {}",
                    url_str
                );
            }
        }
        if let Err(e) = storage::StoreKind::from_url(&self.database_url) {
            bail!("DATABASE_URL: {}", e);
        }
        Ok(())
    }
}
