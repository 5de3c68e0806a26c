//! Bot API calls made outside the message path: client construction, getMe, setWebhook,
//! deleteWebhook.

use anyhow::{Context, Result};
use teloxide::prelude::*;
use teloxide::types::AllowedUpdate;
use tracing::{info, instrument, warn};

use crate::config::BotConfig;

/// teloxide client for the configured token, pointed at TELEGRAM_API_URL when set.
pub fn build_teloxide_bot(config: &BotConfig) -> Result<teloxide::Bot> {
    let bot = teloxide::Bot::new(config.bot_token());
    match config.telegram_api_url() {
        Some(url_str) => {
            let url = reqwest::Url::parse(url_str)
                .with_context(|| format!("Invalid TELEGRAM_API_URL: {}", url_str))?;
            Ok(bot.set_api_url(url))
        }
        None => Ok(bot),
    }
}

/// Bot username from getMe, used to recognise `/command@botname`. `None` if the call fails.
#[instrument(skip(bot))]
pub async fn fetch_bot_username(bot: &teloxide::Bot) -> Option<String> {
    match bot.get_me().await {
        Ok(me) => {
            let username = me.user.username.clone();
            info!(username = ?username, "Fetched bot identity");
            username
        }
        Err(e) => {
            warn!(error = %e, "getMe failed; commands addressed to other bots will not be filtered");
            None
        }
    }
}

/// Registers WEBHOOK_URL (and WEBHOOK_SECRET) with Telegram; only message updates are requested.
#[instrument(skip(bot, config))]
pub async fn register_webhook(bot: &teloxide::Bot, config: &BotConfig) -> Result<()> {
    let url = config.webhook.require_url()?;
    let mut request = bot
        .set_webhook(url.clone())
        .allowed_updates(vec![AllowedUpdate::Message]);
    if let Some(secret) = config.webhook.webhook_secret.clone() {
        request = request.secret_token(secret);
    }
    request.await.context("setWebhook failed")?;
    info!(url = %url, secret = config.webhook.webhook_secret.is_some(), "Webhook registered");
    Ok(())
}

/// Removes the webhook registration.
#[instrument(skip(bot))]
pub async fn delete_webhook(bot: &teloxide::Bot) -> Result<()> {
    bot.delete_webhook().await.context("deleteWebhook failed")?;
    info!("Webhook deleted");
    Ok(())
}
