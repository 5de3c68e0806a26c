//! Per-user LLM settings (`openai_config` collection / `user_settings` table).

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::StorageError;

pub const DEFAULT_GPT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f64 = 0.0;
pub const MIN_TEMPERATURE: f64 = 0.0;
pub const MAX_TEMPERATURE: f64 = 2.0;
pub const DEFAULT_PROMPT: &str = "You are a friendly and funny version of Frida Kahlo (the Mexican painter). You provide short but funny answers. You are interested in knowing more about the person you're talking to.";

/// Settings for one Telegram user. `token` is empty until the user sends `/token`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    pub telegram_user_id: String,
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_gpt_model")]
    pub gpt_model: String,
    #[serde(default, deserialize_with = "number_or_string")]
    pub temperature: f64,
    #[serde(default = "default_prompt")]
    pub prompt: String,
}

fn default_gpt_model() -> String {
    DEFAULT_GPT_MODEL.to_string()
}

fn default_prompt() -> String {
    DEFAULT_PROMPT.to_string()
}

/// Older documents stored the temperature as a string ("0.7").
fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

impl UserSettings {
    /// Default settings for a user: no token, default model, temperature and prompt.
    pub fn defaults_for(telegram_user_id: impl Into<String>) -> Self {
        Self {
            telegram_user_id: telegram_user_id.into(),
            token: String::new(),
            gpt_model: DEFAULT_GPT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }

    /// Token if one was stored.
    pub fn api_key(&self) -> Option<&str> {
        let token = self.token.trim();
        (!token.is_empty()).then_some(token)
    }

    /// Applies the set fields of `update`. Validate first with [`SettingsUpdate::validate`].
    pub fn apply(&mut self, update: &SettingsUpdate) {
        if let Some(token) = update.token.as_deref().filter(|s| !s.is_empty()) {
            self.token = token.to_string();
        }
        if let Some(model) = update.gpt_model.as_deref().filter(|s| !s.is_empty()) {
            self.gpt_model = model.to_string();
        }
        if let Some(t) = update.temperature {
            self.temperature = t;
        }
        if let Some(prompt) = update.prompt.as_deref().filter(|s| !s.is_empty()) {
            self.prompt = prompt.to_string();
        }
    }
}

/// Partial update; `None` and empty strings leave the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsUpdate {
    pub token: Option<String>,
    pub gpt_model: Option<String>,
    pub temperature: Option<f64>,
    pub prompt: Option<String>,
}

impl SettingsUpdate {
    pub fn token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Default::default()
        }
    }

    pub fn gpt_model(model: impl Into<String>) -> Self {
        Self {
            gpt_model: Some(model.into()),
            ..Default::default()
        }
    }

    pub fn temperature(temperature: f64) -> Self {
        Self {
            temperature: Some(temperature),
            ..Default::default()
        }
    }

    pub fn prompt(prompt: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
            ..Default::default()
        }
    }

    /// Rejects a temperature outside `MIN_TEMPERATURE..=MAX_TEMPERATURE` (or NaN).
    pub fn validate(&self) -> Result<(), StorageError> {
        if let Some(t) = self.temperature {
            if !(MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&t) {
                return Err(StorageError::InvalidValue(format!(
                    "temperature {} is outside {}..={}",
                    t, MIN_TEMPERATURE, MAX_TEMPERATURE
                )));
            }
        }
        Ok(())
    }
}
