//! BotConfig: BaseConfig + WebhookConfig + LLM config. Use load() for env-based loading.

use anyhow::{bail, Result};
use llm_client::EnvLlmConfig;
use std::env;

use super::{BaseConfig, WebhookConfig};

/// Bot config. Use BotConfig::load() for env-based loading, then validate().
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub base: BaseConfig,
    pub webhook: WebhookConfig,
    pub llm: EnvLlmConfig,
    /// HISTORY_LIMIT: newest active turns sent with each prompt (0 = all).
    pub history_limit: usize,
}

impl BotConfig {
    /// Load full config from environment variables. If `token` is provided it overrides BOT_TOKEN.
    pub fn load(token: Option<String>) -> Result<Self> {
        let base = BaseConfig::load(token)?;
        let webhook = WebhookConfig::from_env()?;
        let llm = EnvLlmConfig::from_env()?;
        let history_limit = match env::var("HISTORY_LIMIT") {
            Ok(raw) if !raw.trim().is_empty() => match raw.trim().parse::<usize>() {
                Ok(n) => n,
                Err(_) => bail!("HISTORY_LIMIT must be a non-negative integer, got {:?}", raw),
            },
            _ => 0,
        };
        Ok(Self {
            base,
            webhook,
            llm,
            history_limit,
        })
    }

    /// Validate config. Call after load() to fail fast before init.
    pub fn validate(&self) -> Result<()> {
        self.base.validate()?;
        self.webhook.validate()?;
        if reqwest::Url::parse(&self.llm.openai_base_url).is_err() {
            bail!("OPENAI_BASE_URL is not a valid URL: {}", self.llm.openai_base_url);
        }
        let t = self.llm.temperature as f64;
        if !(storage::MIN_TEMPERATURE..=storage::MAX_TEMPERATURE).contains(&t) {
            bail!(
                "TEMPERATURE must be within {}..={}, got {}",
                storage::MIN_TEMPERATURE,
                storage::MAX_TEMPERATURE,
                self.llm.temperature
            );
        }
        Ok(())
    }

    pub fn bot_token(&self) -> &str {
        &self.base.bot_token
    }
    pub fn database_url(&self) -> &str {
        &self.base.database_url
    }
    pub fn database_name(&self) -> &str {
        &self.base.database_name
    }
    pub fn log_file(&self) -> &str {
        &self.base.log_file
    }
    pub fn telegram_api_url(&self) -> Option<&str> {
        self.base.telegram_api_url.as_deref()
    }

    /// LLM_SYSTEM_PROMPT, else the built-in persona.
    pub fn system_prompt(&self) -> &str {
        self.llm
            .llm_system_prompt
            .as_deref()
            .unwrap_or(storage::DEFAULT_PROMPT)
    }
}
