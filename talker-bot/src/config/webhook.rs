//! Webhook receiver config: public URL, route, secret, listen address.

use anyhow::{bail, Result};
use std::env;
use std::net::SocketAddr;

pub const HEALTH_PATH: &str = "/health";

#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// WEBHOOK_URL: public URL registered with Telegram. Required for `run` and `set-webhook`.
    pub webhook_url: Option<String>,
    /// WEBHOOK_PATH: route the receiver listens on.
    pub webhook_path: String,
    /// WEBHOOK_SECRET: sent by Telegram in `X-Telegram-Bot-Api-Secret-Token`.
    pub webhook_secret: Option<String>,
    /// LISTEN_ADDR
    pub listen_addr: String,
}

impl WebhookConfig {
    pub fn from_env() -> Result<Self> {
        let var = |key: &str| env::var(key).ok().filter(|s| !s.trim().is_empty());
        Ok(Self {
            webhook_url: var("WEBHOOK_URL"),
            webhook_path: var("WEBHOOK_PATH").unwrap_or_else(|| "/".to_string()),
            webhook_secret: var("WEBHOOK_SECRET"),
            listen_addr: var("LISTEN_ADDR").unwrap_or_else(|| "0.0.0.0:8000".to_string()),
        })
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(ref url) = self.webhook_url {
            if reqwest::Url::parse(url).is_err() {
                bail!("WEBHOOK_URL is set but not a valid URL: {}", url);
            }
        }
        if !self.webhook_path.starts_with('/') {
            bail!("WEBHOOK_PATH must start with '/': {}", self.webhook_path);
        }
        if self.webhook_path == HEALTH_PATH {
            bail!("WEBHOOK_PATH cannot be {}", HEALTH_PATH);
        }
        if let Some(ref secret) = self.webhook_secret {
            // Telegram accepts 1-256 characters from A-Z, a-z, 0-9, '_' and '-'.
            let valid_chars = secret
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
            if secret.len() > 256 || !valid_chars {
                bail!("WEBHOOK_SECRET must be 1-256 characters of A-Z, a-z, 0-9, '_' or '-'");
            }
        }
        if self.listen_addr.parse::<SocketAddr>().is_err() {
            bail!("LISTEN_ADDR is not a socket address: {}", self.listen_addr);
        }
        Ok(())
    }

    /// Public webhook URL, or an error naming the missing variable.
    pub fn require_url(&self) -> Result<reqwest::Url> {
        match self.webhook_url.as_deref() {
            Some(url) => Ok(reqwest::Url::parse(url)?),
            None => bail!("WEBHOOK_URL not set"),
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(self.listen_addr.parse()?)
    }
}
